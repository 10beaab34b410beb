#[cfg(test)]
mod tests {
    use crate::directory::{AudioSourceCache, DirectoryListing};
    use crate::pipeline::AudioResolutionPipeline;
    use crate::selector::RandomAudioSelector;
    use crate::storage::{ObjectKey, ObjectStore, ObjectStoreUploader};
    use crate::tts::{SpeechEngine, TtsSynthesizer};
    use crate::{Error, ErrorContext, Result};
    use async_trait::async_trait;
    use base64::Engine as _;
    use bytes::Bytes;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    struct FixedListing {
        names: Option<Vec<String>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DirectoryListing for FixedListing {
        async fn list_names(&self) -> Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.names
                .clone()
                .ok_or_else(|| Error::fetch_failed("connection refused", ErrorContext::new()))
        }
        fn file_url(&self, name: &str) -> String {
            format!("https://raw.example.com/audio/{}", crate::directory::encode_file_name(name))
        }
        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    fn cache(names: Option<&[&str]>) -> Arc<AudioSourceCache> {
        Arc::new(AudioSourceCache::new(Arc::new(FixedListing {
            names: names.map(|n| n.iter().map(|s| s.to_string()).collect()),
            calls: AtomicUsize::new(0),
        })))
    }

    enum Behavior {
        Audio(Vec<u8>),
        Fail(&'static str),
        Hang,
    }

    struct FakeEngine {
        behavior: Behavior,
        calls: AtomicUsize,
    }

    impl FakeEngine {
        fn new(behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl SpeechEngine for FakeEngine {
        async fn synthesize_to(&self, _text: &str, _voice: &str, output: &Path) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                Behavior::Audio(data) => {
                    tokio::fs::write(output, data).await?;
                    Ok(())
                }
                Behavior::Fail(msg) => Err(Error::configuration(*msg)),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(())
                }
            }
        }
        fn describe(&self) -> String {
            "fake engine".to_string()
        }
    }

    #[derive(Default)]
    struct RecordingStore {
        fail: bool,
        hang: bool,
        puts: Mutex<Vec<(String, usize, String)>>,
    }

    #[async_trait]
    impl ObjectStore for RecordingStore {
        async fn put_public(
            &self,
            key: &ObjectKey,
            body: Bytes,
            content_type: &str,
        ) -> Result<String> {
            if self.hang {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            if self.fail {
                return Err(Error::upload_failed("access denied", ErrorContext::new()));
            }
            self.puts
                .lock()
                .unwrap()
                .push((key.to_string(), body.len(), content_type.to_string()));
            Ok(format!("https://bucket.s3.us-east-1.amazonaws.com/{}", key))
        }
        fn name(&self) -> &'static str {
            "recording"
        }
    }

    fn synthesizer(engine: Arc<FakeEngine>, scratch: &Path) -> TtsSynthesizer {
        TtsSynthesizer::new(engine, Duration::from_millis(200)).with_scratch_dir(scratch)
    }

    #[tokio::test]
    async fn test_static_url_short_circuits() {
        let engine = FakeEngine::new(Behavior::Audio(vec![1, 2, 3]));
        let scratch = tempfile::tempdir().unwrap();
        let pipeline = AudioResolutionPipeline::builder()
            .static_url("https://raw.githubusercontent.com/o/r/main/speech.mp3")
            .directory(cache(Some(&["1.mp3"])))
            .synthesizer(synthesizer(engine.clone(), scratch.path()))
            .build();

        for text in ["Hello", "Goodbye for now!", "anything & everything"] {
            let out = pipeline.resolve(text, false).await;
            assert_eq!(
                out.audio,
                r#"<audio src="https://raw.githubusercontent.com/o/r/main/speech.mp3"/>"#
            );
            assert_eq!(out.card_text, text);
        }
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_directory_pick_is_percent_encoded() {
        let pipeline = AudioResolutionPipeline::builder()
            .directory(cache(Some(&["my file (1).mp3", "notes.txt"])))
            .selector(RandomAudioSelector::with_seed(1))
            .build();
        let out = pipeline.resolve("Hello", false).await;
        assert_eq!(
            out.audio,
            r#"<audio src="https://raw.example.com/audio/my%20file%20%281%29.mp3"/>"#
        );
    }

    #[tokio::test]
    async fn test_directory_failure_falls_through_to_synthesis_inline() {
        let scratch = tempfile::tempdir().unwrap();
        let engine = FakeEngine::new(Behavior::Audio(b"ID3fake".to_vec()));
        let pipeline = AudioResolutionPipeline::builder()
            .directory(cache(None))
            .synthesizer(synthesizer(engine, scratch.path()))
            .build();

        let out = pipeline.resolve("Hello", false).await;
        let expected = base64::engine::general_purpose::STANDARD.encode(b"ID3fake");
        assert_eq!(
            out.audio,
            format!(r#"<audio src="data:audio/mpeg;base64,{}"/>"#, expected)
        );
    }

    #[tokio::test]
    async fn test_bundled_file_is_uploaded_with_speech_key() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.mp3");
        let bundled = dir.path().join("speech.mp3");
        std::fs::write(&empty, b"").unwrap();
        std::fs::write(&bundled, vec![7u8; 250_000]).unwrap();

        let store = Arc::new(RecordingStore::default());
        let pipeline = AudioResolutionPipeline::builder()
            .bundled_paths(vec![dir.path().join("missing.mp3"), empty, bundled])
            .uploader(ObjectStoreUploader::new(Some(store.clone())))
            .build();

        let out = pipeline.resolve("Hello", false).await;
        let puts = store.puts.lock().unwrap().clone();
        assert_eq!(puts.len(), 1);
        let (key, size, content_type) = &puts[0];
        assert!(key.starts_with("tts/speech_"), "unexpected key {}", key);
        assert_eq!(*size, 250_000);
        assert_eq!(content_type, "audio/mpeg");
        assert_eq!(
            out.audio,
            format!(r#"<audio src="https://bucket.s3.us-east-1.amazonaws.com/{}"/>"#, key)
        );
    }

    #[tokio::test]
    async fn test_bundled_file_without_store_is_skipped_for_synthesis() {
        let dir = tempfile::tempdir().unwrap();
        let bundled = dir.path().join("speech.mp3");
        std::fs::write(&bundled, vec![7u8; 10]).unwrap();
        let engine = FakeEngine::new(Behavior::Audio(vec![9u8; 16]));

        let pipeline = AudioResolutionPipeline::builder()
            .bundled_paths(vec![bundled])
            .synthesizer(synthesizer(engine.clone(), dir.path()))
            .build();

        let out = pipeline.resolve("Hello", false).await;
        assert!(out.audio.contains("data:audio/mpeg;base64,"));
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_synthesized_audio_upload_failure_inlines() {
        let scratch = tempfile::tempdir().unwrap();
        let store = Arc::new(RecordingStore {
            fail: true,
            ..Default::default()
        });
        let pipeline = AudioResolutionPipeline::builder()
            .uploader(ObjectStoreUploader::new(Some(store)))
            .synthesizer(synthesizer(
                FakeEngine::new(Behavior::Audio(vec![1u8; 64])),
                scratch.path(),
            ))
            .build();

        let out = pipeline.resolve("Hello", false).await;
        assert!(out.audio.starts_with(r#"<audio src="data:audio/mpeg;base64,"#));
    }

    #[tokio::test]
    async fn test_hanging_store_is_abandoned_and_audio_inlined() {
        let scratch = tempfile::tempdir().unwrap();
        let store = Arc::new(RecordingStore {
            hang: true,
            ..Default::default()
        });
        let pipeline = AudioResolutionPipeline::builder()
            .uploader(
                ObjectStoreUploader::new(Some(store)).with_timeout(Duration::from_millis(50)),
            )
            .synthesizer(synthesizer(
                FakeEngine::new(Behavior::Audio(vec![1u8; 64])),
                scratch.path(),
            ))
            .build();

        let out = tokio::time::timeout(Duration::from_secs(5), pipeline.resolve("Hello", false))
            .await
            .expect("resolve must not wait on a hanging store");
        let expected = base64::engine::general_purpose::STANDARD.encode(vec![1u8; 64]);
        assert_eq!(
            out.audio,
            format!(r#"<audio src="data:audio/mpeg;base64,{}"/>"#, expected)
        );
    }

    #[tokio::test]
    async fn test_hanging_store_fails_bundled_tier() {
        let dir = tempfile::tempdir().unwrap();
        let bundled = dir.path().join("speech.mp3");
        std::fs::write(&bundled, vec![7u8; 1_000]).unwrap();
        let store = Arc::new(RecordingStore {
            hang: true,
            ..Default::default()
        });
        let pipeline = AudioResolutionPipeline::builder()
            .bundled_paths(vec![bundled])
            .uploader(
                ObjectStoreUploader::new(Some(store)).with_timeout(Duration::from_millis(50)),
            )
            .build();

        let out = pipeline.resolve("Hello", true).await;
        assert!(
            out.audio
                .starts_with("<speak>Hello. Error: Bundled audio error: Upload failed: upload timed out"),
            "{}",
            out.audio
        );
        assert!(out.card_text.contains("source: recording"), "{}", out.card_text);
    }

    #[tokio::test]
    async fn test_synthesized_audio_uploaded_when_store_present() {
        let scratch = tempfile::tempdir().unwrap();
        let store = Arc::new(RecordingStore::default());
        let pipeline = AudioResolutionPipeline::builder()
            .uploader(ObjectStoreUploader::new(Some(store.clone())))
            .synthesizer(synthesizer(
                FakeEngine::new(Behavior::Audio(vec![1u8; 200_000])),
                scratch.path(),
            ))
            .build();

        let out = pipeline.resolve("Hello", false).await;
        let puts = store.puts.lock().unwrap().clone();
        assert_eq!(puts.len(), 1);
        assert!(!puts[0].0.starts_with("tts/speech_"));
        assert!(out.audio.contains("https://bucket.s3.us-east-1.amazonaws.com/tts/"));
    }

    #[tokio::test]
    async fn test_oversized_synthesis_without_store_falls_back_to_native() {
        let scratch = tempfile::tempdir().unwrap();
        let pipeline = AudioResolutionPipeline::builder()
            .synthesizer(synthesizer(
                FakeEngine::new(Behavior::Audio(vec![1u8; 100_001])),
                scratch.path(),
            ))
            .build();

        let out = pipeline.resolve("Hello", false).await;
        assert_eq!(out.audio, "<speak>Hello</speak>");
    }

    #[tokio::test]
    async fn test_everything_unavailable_speaks_natively() {
        let scratch = tempfile::tempdir().unwrap();
        let pipeline = AudioResolutionPipeline::builder()
            .directory(cache(None))
            .bundled_paths(vec![scratch.path().join("speech.mp3")])
            .synthesizer(synthesizer(
                FakeEngine::new(Behavior::Fail("engine unavailable")),
                scratch.path(),
            ))
            .build();

        let out = pipeline.resolve("Goodbye for now!", false).await;
        assert_eq!(out.audio, "<speak>Goodbye for now!</speak>");
        assert_eq!(out.card_text, "Goodbye for now!");
    }

    #[tokio::test]
    async fn test_diagnostics_append_truncated_cause() {
        let scratch = tempfile::tempdir().unwrap();
        let long_cause: &'static str = Box::leak("x".repeat(300).into_boxed_str());
        let pipeline = AudioResolutionPipeline::builder()
            .synthesizer(synthesizer(
                FakeEngine::new(Behavior::Fail(long_cause)),
                scratch.path(),
            ))
            .build();

        let out = pipeline.resolve("Hi", true).await;
        assert!(out.audio.starts_with("<speak>Hi. Error: TTS error: Synthesis failed: "));
        // Cause is cut to 100 characters in speech but kept whole on the card.
        let spoken_cause = out
            .audio
            .trim_start_matches("<speak>Hi. Error: TTS error: ")
            .trim_end_matches("</speak>");
        assert_eq!(spoken_cause.chars().count(), 100);
        assert!(out.card_text.starts_with("Hi - ERROR: Synthesis failed: "));
        assert!(out.card_text.contains(long_cause));
    }

    #[tokio::test]
    async fn test_directory_fetch_failure_is_reported_as_such() {
        let pipeline = AudioResolutionPipeline::builder()
            .directory(cache(None))
            .build();
        let out = pipeline.resolve("Hi", true).await;
        assert_eq!(
            out.audio,
            "<speak>Hi. Error: Directory error: Directory fetch failed: connection refused</speak>"
        );

        let pipeline = AudioResolutionPipeline::builder()
            .directory(cache(Some(&["readme.txt"])))
            .build();
        let out = pipeline.resolve("Hi", true).await;
        assert_eq!(out.card_text, "Hi - ERROR: Candidate set is empty");
    }

    #[tokio::test]
    async fn test_diagnostics_without_failure_is_plain() {
        let pipeline = AudioResolutionPipeline::builder().build();
        let out = pipeline.resolve("Hi", true).await;
        assert_eq!(out.audio, "<speak>Hi</speak>");
        assert_eq!(out.card_text, "Hi");
    }

    #[tokio::test]
    async fn test_hanging_engine_times_out_and_falls_back() {
        let scratch = tempfile::tempdir().unwrap();
        let pipeline = AudioResolutionPipeline::builder()
            .synthesizer(
                TtsSynthesizer::new(FakeEngine::new(Behavior::Hang), Duration::from_millis(50))
                    .with_scratch_dir(scratch.path()),
            )
            .build();

        let out = pipeline.resolve("Hello", true).await;
        assert!(out.card_text.contains("timed out after 50 ms"));
        assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
    }
}

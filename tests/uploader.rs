//! Upload-or-inline behavior of the object store front.

use async_trait::async_trait;
use base64::Engine as _;
use bytes::Bytes;
use custom_tts_skill::audio::{AudioFormat, AudioLocation};
use custom_tts_skill::storage::{
    KeyKind, ObjectKey, ObjectKeyGenerator, ObjectStore, ObjectStoreUploader, INLINE_LIMIT_BYTES,
};
use custom_tts_skill::{Error, Result};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct MemoryStore {
    puts: Mutex<Vec<(String, usize, String)>>,
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put_public(&self, key: &ObjectKey, body: Bytes, content_type: &str) -> Result<String> {
        self.puts
            .lock()
            .unwrap()
            .push((key.to_string(), body.len(), content_type.to_string()));
        Ok(format!("https://bucket.s3.us-east-1.amazonaws.com/{}", key))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

struct StalledStore;

#[async_trait]
impl ObjectStore for StalledStore {
    async fn put_public(&self, _key: &ObjectKey, _body: Bytes, _ct: &str) -> Result<String> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok("https://never.example.com".to_string())
    }

    fn name(&self) -> &'static str {
        "stalled"
    }
}

fn key() -> ObjectKey {
    ObjectKeyGenerator::new().generate_at(KeyKind::Synthesized, "hello", AudioFormat::Mp3, 42)
}

#[test]
fn test_inline_at_limit_round_trips() {
    let uploader = ObjectStoreUploader::inline_only();
    let payload: Vec<u8> = (0..INLINE_LIMIT_BYTES).map(|i| (i % 251) as u8).collect();

    let location = uploader
        .inline(Bytes::from(payload.clone()), AudioFormat::Mp3)
        .unwrap();
    let src = location.src();
    let encoded = src.strip_prefix("data:audio/mpeg;base64,").expect("data URI");
    let decoded = base64::engine::general_purpose::STANDARD.decode(encoded).unwrap();
    assert_eq!(decoded, payload);
    assert!(location.to_markup().starts_with("<audio src=\"data:audio/mpeg;base64,"));
}

#[test]
fn test_inline_over_limit_is_rejected() {
    let uploader = ObjectStoreUploader::inline_only();
    let err = uploader
        .inline(Bytes::from(vec![0u8; INLINE_LIMIT_BYTES + 1]), AudioFormat::Mp3)
        .unwrap_err();
    match err {
        Error::PayloadTooLargeForInline { size, limit } => {
            assert_eq!(size, 100_001);
            assert_eq!(limit, 100_000);
        }
        other => panic!("expected PayloadTooLargeForInline, got {other:?}"),
    }
}

#[tokio::test]
async fn test_upload_without_store_fails() {
    let uploader = ObjectStoreUploader::inline_only();
    assert!(!uploader.has_store());
    let err = uploader
        .upload(Bytes::from_static(b"abc"), &key(), AudioFormat::Mp3)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::StoreNotConfigured));
}

#[tokio::test]
async fn test_upload_passes_key_and_content_type() {
    let store = Arc::new(MemoryStore::default());
    let uploader = ObjectStoreUploader::new(Some(store.clone()));
    let key = key();

    let location = uploader
        .upload(Bytes::from(vec![7u8; 250_000]), &key, AudioFormat::Mp3)
        .await
        .unwrap();
    assert_eq!(
        location,
        AudioLocation::ObjectStoreUrl(format!(
            "https://bucket.s3.us-east-1.amazonaws.com/{}",
            key
        ))
    );

    let puts = store.puts.lock().unwrap();
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].0, key.key);
    assert_eq!(puts[0].1, 250_000);
    assert_eq!(puts[0].2, "audio/mpeg");
}

#[tokio::test]
async fn test_stalled_upload_times_out() {
    let uploader = ObjectStoreUploader::new(Some(Arc::new(StalledStore)))
        .with_timeout(Duration::from_millis(50));
    let err = uploader
        .upload(Bytes::from_static(b"abc"), &key(), AudioFormat::Mp3)
        .await
        .unwrap_err();
    match &err {
        Error::UploadFailed { message, context } => {
            assert!(message.contains("timed out after 50 ms"), "{message}");
            assert_eq!(context.source.as_deref(), Some("stalled"));
        }
        other => panic!("expected UploadFailed, got {other:?}"),
    }
}

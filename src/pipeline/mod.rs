//! 音频解析流水线：按优先级逐层尝试音频来源，最终保证返回可播报的响应。
//!
//! # Audio Resolution Pipeline
//!
//! Turns response text into a markup string that always plays *something*.
//! Tiers are tried strictly in order until one yields an [`AudioLocation`]:
//!
//! ```text
//! StaticUrl → DirectoryRandom → BundledUpload → LiveSynthesis → NativeFallback
//!  (config)    (cached listing)   (file → store)  (TTS → store     (<speak>text</speak>)
//!                                                  or inline)
//! ```
//!
//! Tier failures are logged and swallowed; [`AudioResolutionPipeline::resolve`]
//! cannot fail.

mod tier;

#[cfg(test)]
mod tests;

pub use tier::Tier;

use crate::audio::{AudioFormat, AudioLocation, SynthesizedResponse};
use crate::config::DEFAULT_VOICE;
use crate::directory::AudioSourceCache;
use crate::selector::RandomAudioSelector;
use crate::storage::{KeyKind, ObjectKeyGenerator, ObjectStoreUploader};
use crate::tts::TtsSynthesizer;
use crate::{ssml, Error};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Characters of the failure cause spoken in diagnostics mode.
pub const DIAGNOSTIC_CAUSE_CHARS: usize = 100;

enum TierOutcome {
    Resolved(AudioLocation),
    Skipped(&'static str),
    Failed(Error),
}

pub struct AudioResolutionPipeline {
    static_url: Option<String>,
    directory: Option<Arc<AudioSourceCache>>,
    selector: RandomAudioSelector,
    bundled_paths: Vec<PathBuf>,
    uploader: ObjectStoreUploader,
    synthesizer: Option<TtsSynthesizer>,
    voice: String,
    keys: ObjectKeyGenerator,
}

impl AudioResolutionPipeline {
    pub fn builder() -> AudioResolutionPipelineBuilder {
        AudioResolutionPipelineBuilder::new()
    }

    /// Resolve `text` into playable markup.
    ///
    /// With `diagnostics` set, a native fallback carries the last tier
    /// failure in both the spoken and the card text.
    pub async fn resolve(&self, text: &str, diagnostics: bool) -> SynthesizedResponse {
        let mut last_failure: Option<(Tier, Error)> = None;
        let mut tier = Some(Tier::first());

        while let Some(current) = tier {
            if current.is_terminal() {
                break;
            }
            match self.attempt(current, text).await {
                TierOutcome::Resolved(location) => {
                    info!(tier = %current, location = location.variant_name(), "resolved audio");
                    return SynthesizedResponse::new(location.to_markup(), text);
                }
                TierOutcome::Skipped(reason) => {
                    debug!(tier = %current, reason, "tier skipped");
                }
                TierOutcome::Failed(error) => {
                    warn!(tier = %current, kind = error.kind(), error = %error, "tier failed");
                    last_failure = Some((current, error));
                }
            }
            tier = current.next();
        }

        info!(tier = %Tier::NativeFallback, "falling back to native speech");
        native_fallback(text, diagnostics, last_failure.as_ref())
    }

    async fn attempt(&self, tier: Tier, text: &str) -> TierOutcome {
        match tier {
            Tier::StaticUrl => self.static_url(),
            Tier::DirectoryRandom => self.directory_random().await,
            Tier::BundledUpload => self.bundled_upload(text).await,
            Tier::LiveSynthesis => self.live_synthesis(text).await,
            Tier::NativeFallback => TierOutcome::Skipped("terminal tier"),
        }
    }

    fn static_url(&self) -> TierOutcome {
        match &self.static_url {
            Some(url) => TierOutcome::Resolved(AudioLocation::RemoteStaticUrl(url.clone())),
            None => TierOutcome::Skipped("no static URL configured"),
        }
    }

    async fn directory_random(&self) -> TierOutcome {
        let Some(cache) = &self.directory else {
            return TierOutcome::Skipped("no directory configured");
        };
        let names = match cache.try_list().await {
            Ok(names) => names,
            Err(e) => return TierOutcome::Failed(e),
        };
        match self.selector.select(names.as_slice()) {
            Ok(name) => {
                debug!(file = %name, candidates = names.len(), "picked directory audio");
                TierOutcome::Resolved(AudioLocation::RemoteDirectoryUrl(cache.file_url(name)))
            }
            Err(e) => TierOutcome::Failed(e),
        }
    }

    async fn bundled_upload(&self, text: &str) -> TierOutcome {
        if self.bundled_paths.is_empty() {
            return TierOutcome::Skipped("no bundled paths configured");
        }
        let Some(path) = find_bundled(&self.bundled_paths).await else {
            return TierOutcome::Failed(Error::BundledAudioMissing {
                searched: self.bundled_paths.len(),
            });
        };
        // Bundled audio is assumed too large to inline.
        if !self.uploader.has_store() {
            return TierOutcome::Failed(Error::StoreNotConfigured);
        }
        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(e) => return TierOutcome::Failed(Error::Io(e)),
        };
        info!(path = %path.display(), size = data.len(), "found bundled audio");

        let format = format_of(&path);
        let key = self.keys.generate(KeyKind::Bundled, text, format);
        match self.uploader.upload(data.into(), &key, format).await {
            Ok(location) => TierOutcome::Resolved(location),
            Err(e) => TierOutcome::Failed(e),
        }
    }

    async fn live_synthesis(&self, text: &str) -> TierOutcome {
        let Some(synthesizer) = &self.synthesizer else {
            return TierOutcome::Skipped("no synthesizer configured");
        };
        let audio = match synthesizer.synthesize(text, &self.voice).await {
            Ok(audio) => audio,
            Err(e) => return TierOutcome::Failed(e),
        };
        let format = synthesizer.format();

        if self.uploader.has_store() {
            let key = self.keys.generate(KeyKind::Synthesized, text, format);
            match self.uploader.upload(audio.clone(), &key, format).await {
                Ok(location) => return TierOutcome::Resolved(location),
                Err(e) => {
                    warn!(tier = %Tier::LiveSynthesis, error = %e, "upload failed, trying inline");
                }
            }
        }
        match self.uploader.inline(audio, format) {
            Ok(location) => TierOutcome::Resolved(location),
            Err(e) => TierOutcome::Failed(e),
        }
    }

    /// Status line of the synthesis engine, for the help intent.
    pub fn synthesis_status(&self) -> String {
        match &self.synthesizer {
            Some(s) => format!("TTS is available via {}", s.describe()),
            None => "TTS is not configured".to_string(),
        }
    }

    pub fn voice(&self) -> &str {
        &self.voice
    }
}

fn native_fallback(
    text: &str,
    diagnostics: bool,
    failure: Option<&(Tier, Error)>,
) -> SynthesizedResponse {
    match failure {
        Some((tier, error)) if diagnostics => {
            let cause = error.to_string();
            let spoken = format!(
                "{}. Error: {} error: {}",
                text,
                tier.label(),
                ssml::truncate_chars(&cause, DIAGNOSTIC_CAUSE_CHARS)
            );
            SynthesizedResponse::new(ssml::speak(&spoken), format!("{} - ERROR: {}", text, cause))
        }
        _ => SynthesizedResponse::new(ssml::speak(text), text),
    }
}

/// First existing, non-empty regular file among `paths`.
async fn find_bundled(paths: &[PathBuf]) -> Option<PathBuf> {
    for path in paths {
        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_file() && meta.len() > 0 => return Some(path.clone()),
            Ok(_) => debug!(path = %path.display(), "bundled candidate is empty or not a file"),
            Err(_) => {}
        }
    }
    None
}

fn format_of(path: &Path) -> AudioFormat {
    path.extension()
        .and_then(|e| e.to_str())
        .map(AudioFormat::parse_lossy)
        .unwrap_or_default()
}

pub struct AudioResolutionPipelineBuilder {
    static_url: Option<String>,
    directory: Option<Arc<AudioSourceCache>>,
    selector: Option<RandomAudioSelector>,
    bundled_paths: Vec<PathBuf>,
    uploader: Option<ObjectStoreUploader>,
    synthesizer: Option<TtsSynthesizer>,
    voice: Option<String>,
}

impl AudioResolutionPipelineBuilder {
    pub fn new() -> Self {
        Self {
            static_url: None,
            directory: None,
            selector: None,
            bundled_paths: Vec::new(),
            uploader: None,
            synthesizer: None,
            voice: None,
        }
    }

    pub fn static_url(mut self, url: impl Into<String>) -> Self {
        self.static_url = Some(url.into());
        self
    }

    pub fn directory(mut self, cache: Arc<AudioSourceCache>) -> Self {
        self.directory = Some(cache);
        self
    }

    pub fn selector(mut self, selector: RandomAudioSelector) -> Self {
        self.selector = Some(selector);
        self
    }

    pub fn bundled_paths(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.bundled_paths = paths.into_iter().collect();
        self
    }

    pub fn uploader(mut self, uploader: ObjectStoreUploader) -> Self {
        self.uploader = Some(uploader);
        self
    }

    pub fn synthesizer(mut self, synthesizer: TtsSynthesizer) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    pub fn voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }

    pub fn build(self) -> AudioResolutionPipeline {
        AudioResolutionPipeline {
            static_url: self.static_url,
            directory: self.directory,
            selector: self.selector.unwrap_or_default(),
            bundled_paths: self.bundled_paths,
            uploader: self.uploader.unwrap_or_else(ObjectStoreUploader::inline_only),
            synthesizer: self.synthesizer,
            voice: self.voice.unwrap_or_else(|| DEFAULT_VOICE.to_string()),
            keys: ObjectKeyGenerator::new(),
        }
    }
}

impl Default for AudioResolutionPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//! Timeout-bounded synthesis with scratch-file cleanup.

use super::SpeechEngine;
use crate::audio::AudioFormat;
use crate::{Error, ErrorContext, Result};
use bytes::Bytes;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct TtsSynthesizer {
    engine: Arc<dyn SpeechEngine>,
    scratch_dir: PathBuf,
    timeout: Duration,
    format: AudioFormat,
}

impl TtsSynthesizer {
    pub fn new(engine: Arc<dyn SpeechEngine>, timeout: Duration) -> Self {
        Self {
            engine,
            scratch_dir: std::env::temp_dir(),
            timeout,
            format: AudioFormat::Mp3,
        }
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    pub fn with_format(mut self, format: AudioFormat) -> Self {
        self.format = format;
        self
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn describe(&self) -> String {
        self.engine.describe()
    }

    pub async fn synthesize(&self, text: &str, voice: &str) -> Result<Bytes> {
        self.synthesize_with_timeout(text, voice, self.timeout).await
    }

    /// Synthesize `text`, failing with [`Error::SynthesisTimeout`] once
    /// `timeout` elapses. The scratch file is removed on every exit path
    /// because it is owned by this frame.
    pub async fn synthesize_with_timeout(
        &self,
        text: &str,
        voice: &str,
        timeout: Duration,
    ) -> Result<Bytes> {
        if text.trim().is_empty() {
            return Err(Error::validation_with_context(
                "text cannot be empty",
                ErrorContext::new().with_source("tts"),
            ));
        }

        let scratch = tempfile::Builder::new()
            .prefix("tts_")
            .suffix(self.format.extension())
            .tempfile_in(&self.scratch_dir)
            .map_err(|e| {
                Error::synthesis_failed(
                    format!("failed to create scratch file: {}", e),
                    ErrorContext::new()
                        .with_source("tts")
                        .with_details(self.scratch_dir.display().to_string()),
                )
            })?;
        let path = scratch.path().to_path_buf();

        match tokio::time::timeout(timeout, self.engine.synthesize_to(text, voice, &path)).await {
            Err(_) => {
                return Err(Error::SynthesisTimeout {
                    timeout_ms: timeout.as_millis() as u64,
                })
            }
            Ok(Err(e @ Error::SynthesisFailed { .. })) => return Err(e),
            Ok(Err(e)) => {
                return Err(Error::synthesis_failed(
                    e.to_string(),
                    ErrorContext::new().with_source("tts"),
                ))
            }
            Ok(Ok(())) => {}
        }

        let data = tokio::fs::read(&path).await.map_err(|e| {
            Error::synthesis_failed(
                format!("failed to read synthesized audio: {}", e),
                ErrorContext::new().with_source("tts"),
            )
        })?;
        if let Err(e) = scratch.close() {
            warn!(path = %path.display(), error = %e, "failed to remove scratch file");
        }
        if data.is_empty() {
            return Err(Error::SynthesisEmptyResult);
        }
        debug!(bytes = data.len(), voice, "synthesis complete");
        Ok(Bytes::from(data))
    }
}

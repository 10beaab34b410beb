//! TTS（文字转语音）模块：在硬超时内把文本合成为音频字节。
//!
//! [`SpeechEngine`] is the seam to the external synthesis service;
//! [`HttpSpeechEngine`] talks to an OpenAI-compatible speech endpoint.
//! [`TtsSynthesizer`] wraps any engine with the timeout, the scratch file and
//! the payload checks, mapping every failure into the crate error taxonomy.

mod client;
mod synthesizer;

pub use client::{HttpSpeechEngine, HttpSpeechEngineBuilder};
pub use synthesizer::TtsSynthesizer;

use crate::Result;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Synthesize `text` with `voice`, writing the audio to `output`.
    async fn synthesize_to(&self, text: &str, voice: &str, output: &Path) -> Result<()>;

    /// Human-readable status, surfaced by the help intent.
    fn describe(&self) -> String;
}

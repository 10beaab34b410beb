//! # custom-tts-skill
//!
//! 语音助手技能后端：用外部托管或实时合成的音频替代平台内置语音。
//!
//! Voice-assistant skill backend that answers every request with externally
//! hosted or freshly synthesized audio, delivered through an SSML `<audio>`
//! tag, instead of the platform's built-in voice.
//!
//! ## Overview
//!
//! The heart of the crate is the [`pipeline::AudioResolutionPipeline`], a
//! layered fallback that tries, in order:
//!
//! 1. a static, pre-configured audio URL
//! 2. a random file from a cached remote directory listing
//! 3. a bundled local file re-uploaded to object storage
//! 4. live text-to-speech with a hard timeout (uploaded, or inlined as a data URI)
//! 5. the platform's own speech markup, which always succeeds
//!
//! Each tier maps its failures into [`Error`] and the pipeline moves on;
//! resolution itself never fails.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use custom_tts_skill::skill::{IntentKind, SkillContext};
//!
//! #[tokio::main]
//! async fn main() -> custom_tts_skill::Result<()> {
//!     let ctx = SkillContext::from_env().await?;
//!     let envelope = ctx.skill.handle(IntentKind::Launch).await;
//!     println!("{}", envelope.to_platform_json());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Environment-driven configuration |
//! | [`audio`] | Audio locations, formats and the resolved response |
//! | [`directory`] | Remote directory listing and its process-wide cache |
//! | [`selector`] | Uniform random choice among candidates |
//! | [`tts`] | Speech engine seam and timeout-bounded synthesizer |
//! | [`storage`] | Object-store upload and inline data-URI fallback |
//! | [`pipeline`] | The tiered resolution pipeline |
//! | [`skill`] | Intent routing and the platform response envelope |
//! | [`ssml`] | Markup helpers |

pub mod audio;
pub mod config;
pub mod directory;
pub mod pipeline;
pub mod selector;
pub mod skill;
pub mod ssml;
pub mod storage;
pub mod tts;

pub use audio::{AudioLocation, SynthesizedResponse};
pub use config::SkillConfig;
pub use pipeline::{AudioResolutionPipeline, Tier};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};

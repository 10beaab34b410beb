//! Audio types.

use crate::ssml;
use base64::Engine as _;
use bytes::Bytes;
use serde::Serialize;

/// Supported audio formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioFormat {
    #[default]
    Mp3,
    Opus,
    Wav,
}

impl AudioFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Opus => "audio/opus",
            Self::Wav => "audio/wav",
        }
    }

    /// Value for the `response_format` field of speech requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Opus => "opus",
            Self::Wav => "wav",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => ".mp3",
            Self::Opus => ".opus",
            Self::Wav => ".wav",
        }
    }

    /// Unknown names fall back to mp3.
    pub fn parse_lossy(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "opus" => Self::Opus,
            "wav" => Self::Wav,
            _ => Self::Mp3,
        }
    }
}

/// Where the audio for a response lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioLocation {
    /// Fixed, pre-configured URL.
    RemoteStaticUrl(String),
    /// File picked from the remote directory listing.
    RemoteDirectoryUrl(String),
    /// Object uploaded to the store during this request.
    ObjectStoreUrl(String),
    /// Audio embedded directly as a data URI.
    InlineDataUri { bytes: Bytes, mime: &'static str },
}

impl AudioLocation {
    pub fn inline(bytes: Bytes, format: AudioFormat) -> Self {
        AudioLocation::InlineDataUri {
            bytes,
            mime: format.mime_type(),
        }
    }

    /// The `src` value for the audio tag.
    pub fn src(&self) -> String {
        match self {
            AudioLocation::RemoteStaticUrl(url)
            | AudioLocation::RemoteDirectoryUrl(url)
            | AudioLocation::ObjectStoreUrl(url) => url.clone(),
            AudioLocation::InlineDataUri { bytes, mime } => format!(
                "data:{};base64,{}",
                mime,
                base64::engine::general_purpose::STANDARD.encode(bytes)
            ),
        }
    }

    pub fn to_markup(&self) -> String {
        ssml::audio_tag(&self.src())
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            AudioLocation::RemoteStaticUrl(_) => "remote_static_url",
            AudioLocation::RemoteDirectoryUrl(_) => "remote_directory_url",
            AudioLocation::ObjectStoreUrl(_) => "object_store_url",
            AudioLocation::InlineDataUri { .. } => "inline_data_uri",
        }
    }
}

/// The only value returned across the resolution pipeline's boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizedResponse {
    /// Markup: an audio tag or speak-wrapped text.
    pub audio: String,
    /// Text displayed on the card.
    pub card_text: String,
}

impl SynthesizedResponse {
    pub fn new(audio: impl Into<String>, card_text: impl Into<String>) -> Self {
        Self {
            audio: audio.into(),
            card_text: card_text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_variants_render_audio_tag() {
        let loc = AudioLocation::ObjectStoreUrl(
            "https://bucket.s3.us-east-1.amazonaws.com/tts/1_abcdef12.mp3".into(),
        );
        assert_eq!(
            loc.to_markup(),
            r#"<audio src="https://bucket.s3.us-east-1.amazonaws.com/tts/1_abcdef12.mp3"/>"#
        );
    }

    #[test]
    fn test_inline_renders_data_uri() {
        let loc = AudioLocation::inline(Bytes::from_static(b"abc"), AudioFormat::Mp3);
        assert_eq!(loc.src(), "data:audio/mpeg;base64,YWJj");
        assert_eq!(loc.variant_name(), "inline_data_uri");
    }

    #[test]
    fn test_format_parsing_defaults_to_mp3() {
        assert_eq!(AudioFormat::parse_lossy("WAV"), AudioFormat::Wav);
        assert_eq!(AudioFormat::parse_lossy("flac"), AudioFormat::Mp3);
        assert_eq!(AudioFormat::default().mime_type(), "audio/mpeg");
    }
}

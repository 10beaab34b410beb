//! Object key derivation.

use crate::audio::AudioFormat;
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

/// Which tier the object belongs to; selects the key layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// `tts/{timestamp}_{hash8}.mp3`
    Synthesized,
    /// `tts/speech_{timestamp}_{hash8}.mp3`
    Bundled,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey {
    pub key: String,
    pub hash: String,
    pub timestamp: u64,
}

impl ObjectKey {
    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl std::fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key)
    }
}

/// Keys are a coarse timestamp plus a short hash of the response text, so
/// identical texts only overwrite each other within the same second.
pub struct ObjectKeyGenerator {
    prefix: String,
    hash_len: usize,
}

impl ObjectKeyGenerator {
    pub fn new() -> Self {
        Self {
            prefix: "tts".to_string(),
            hash_len: 8,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into().trim_matches('/').to_string();
        self
    }

    pub fn generate(&self, kind: KeyKind, text: &str, format: AudioFormat) -> ObjectKey {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.generate_at(kind, text, format, timestamp)
    }

    pub fn generate_at(
        &self,
        kind: KeyKind,
        text: &str,
        format: AudioFormat,
        timestamp: u64,
    ) -> ObjectKey {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        let digest: String = hasher.finalize().iter().map(|b| format!("{:02x}", b)).collect();
        let hash = digest[..self.hash_len].to_string();
        let stem = match kind {
            KeyKind::Synthesized => format!("{}_{}", timestamp, hash),
            KeyKind::Bundled => format!("speech_{}_{}", timestamp, hash),
        };
        let key = if self.prefix.is_empty() {
            format!("{}{}", stem, format.extension())
        } else {
            format!("{}/{}{}", self.prefix, stem, format.extension())
        };
        ObjectKey {
            key,
            hash,
            timestamp,
        }
    }
}

impl Default for ObjectKeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

//! Resolution tiers, in priority order.

use std::fmt;

/// One fallback stage of the resolution pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    StaticUrl,
    DirectoryRandom,
    BundledUpload,
    LiveSynthesis,
    NativeFallback,
}

impl Tier {
    pub const ORDER: [Tier; 5] = [
        Tier::StaticUrl,
        Tier::DirectoryRandom,
        Tier::BundledUpload,
        Tier::LiveSynthesis,
        Tier::NativeFallback,
    ];

    pub fn first() -> Tier {
        Tier::ORDER[0]
    }

    /// The tier tried after this one fails, `None` past the terminal tier.
    pub fn next(self) -> Option<Tier> {
        let idx = Tier::ORDER.iter().position(|t| *t == self)?;
        Tier::ORDER.get(idx + 1).copied()
    }

    pub fn is_terminal(self) -> bool {
        self == Tier::NativeFallback
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::StaticUrl => "static_url",
            Tier::DirectoryRandom => "directory_random",
            Tier::BundledUpload => "bundled_upload",
            Tier::LiveSynthesis => "live_synthesis",
            Tier::NativeFallback => "native_fallback",
        }
    }

    /// Spoken/displayed name used in diagnostics text.
    pub fn label(self) -> &'static str {
        match self {
            Tier::StaticUrl => "Static URL",
            Tier::DirectoryRandom => "Directory",
            Tier::BundledUpload => "Bundled audio",
            Tier::LiveSynthesis => "TTS",
            Tier::NativeFallback => "Native speech",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_walk_in_priority_order() {
        let mut walked = vec![Tier::first()];
        while let Some(next) = walked.last().and_then(|t| t.next()) {
            walked.push(next);
        }
        assert_eq!(walked, Tier::ORDER.to_vec());
        assert!(Tier::NativeFallback.is_terminal());
        assert_eq!(Tier::NativeFallback.next(), None);
    }
}

//! Environment-driven skill configuration.
//!
//! Every knob has a default so an empty environment still yields a working
//! skill: no static URL, no directory, no object store, and synthesis against
//! a local OpenAI-compatible speech endpoint.

use crate::audio::AudioFormat;
use crate::{Error, ErrorContext, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SKILL_NAME: &str = "Custom TTS Voice";
pub const DEFAULT_RESPONSE: &str =
    "You're good enough, you're smart enough, and dog gone it, people like you!";
pub const DEFAULT_VOICE: &str = "en-CA-LiamNeural";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_SYNTHESIS_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_LISTING_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 5;

/// Bundled-file locations searched by the bundled-upload tier, in order.
pub const DEFAULT_BUNDLED_AUDIO_PATHS: &[&str] = &[
    "/var/task/speech.mp3",
    "/var/task/lambda/speech.mp3",
    "speech.mp3",
];

/// Coordinates of the remote folder holding candidate audio files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub folder: String,
    pub api_base_url: String,
    pub raw_base_url: String,
    pub timeout: Duration,
}

impl RepositoryConfig {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: "main".to_string(),
            folder: "audio".to_string(),
            api_base_url: "https://api.github.com".to_string(),
            raw_base_url: "https://raw.githubusercontent.com".to_string(),
            timeout: Duration::from_secs(DEFAULT_LISTING_TIMEOUT_SECS),
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into().trim_matches('/').to_string();
        self
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_raw_base_url(mut self, url: impl Into<String>) -> Self {
        self.raw_base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Object-store settings. Absent bucket means no store is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub bucket: String,
    pub region: String,
    /// Hard limit on a single upload, enforced by the caller.
    pub timeout: Duration,
}

/// Speech endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisConfig {
    pub base_url: String,
    pub endpoint_path: String,
    pub model: String,
    pub api_key: Option<String>,
    pub voice: String,
    pub format: AudioFormat,
    pub timeout: Duration,
    pub scratch_dir: PathBuf,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5050".to_string(),
            endpoint_path: "/v1/audio/speech".to_string(),
            model: "tts-1".to_string(),
            api_key: None,
            voice: DEFAULT_VOICE.to_string(),
            format: AudioFormat::Mp3,
            timeout: Duration::from_millis(DEFAULT_SYNTHESIS_TIMEOUT_MS),
            scratch_dir: std::env::temp_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillConfig {
    pub skill_name: String,
    pub response_text: String,
    pub static_audio_url: Option<String>,
    pub repository: Option<RepositoryConfig>,
    pub store: Option<StoreConfig>,
    pub synthesis: SynthesisConfig,
    pub bundled_audio_paths: Vec<PathBuf>,
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            skill_name: DEFAULT_SKILL_NAME.to_string(),
            response_text: DEFAULT_RESPONSE.to_string(),
            static_audio_url: None,
            repository: None,
            store: None,
            synthesis: SynthesisConfig::default(),
            bundled_audio_paths: default_bundled_paths(),
        }
    }
}

fn default_bundled_paths() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = DEFAULT_BUNDLED_AUDIO_PATHS
        .iter()
        .map(PathBuf::from)
        .collect();
    // Next to the executable, before the bare relative path.
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
    {
        let idx = paths.len() - 1;
        paths.insert(idx, dir.join("speech.mp3"));
    }
    paths
}

impl SkillConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let repository = match get("GITHUB_REPO") {
            Some(coords) => {
                let (owner, repo) = coords
                    .split_once('/')
                    .filter(|(o, r)| !o.is_empty() && !r.is_empty() && !r.contains('/'))
                    .ok_or_else(|| {
                        Error::configuration_with_context(
                            format!("expected owner/repo, got '{}'", coords),
                            ErrorContext::new().with_field_path("GITHUB_REPO"),
                        )
                    })?;
                let mut repo_cfg = RepositoryConfig::new(owner, repo).with_timeout(
                    Duration::from_secs(parse_or(
                        get("GITHUB_TIMEOUT_SECS"),
                        "GITHUB_TIMEOUT_SECS",
                        DEFAULT_LISTING_TIMEOUT_SECS,
                    )?),
                );
                if let Some(branch) = get("GITHUB_BRANCH") {
                    repo_cfg = repo_cfg.with_branch(branch);
                }
                if let Some(folder) = get("GITHUB_AUDIO_FOLDER") {
                    repo_cfg = repo_cfg.with_folder(folder);
                }
                if let Some(api) = get("GITHUB_API_URL") {
                    repo_cfg = repo_cfg.with_api_base_url(api);
                }
                if let Some(raw) = get("GITHUB_RAW_URL") {
                    repo_cfg = repo_cfg.with_raw_base_url(raw);
                }
                Some(repo_cfg)
            }
            None => None,
        };

        let store = match get("S3_BUCKET") {
            Some(bucket) => Some(StoreConfig {
                bucket,
                region: get("S3_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
                timeout: Duration::from_secs(parse_or(
                    get("S3_TIMEOUT_SECS"),
                    "S3_TIMEOUT_SECS",
                    DEFAULT_UPLOAD_TIMEOUT_SECS,
                )?),
            }),
            None => None,
        };

        let synth_defaults = SynthesisConfig::default();
        let synthesis = SynthesisConfig {
            base_url: get("TTS_BASE_URL").unwrap_or(synth_defaults.base_url),
            endpoint_path: get("TTS_ENDPOINT_PATH").unwrap_or(synth_defaults.endpoint_path),
            model: get("TTS_MODEL").unwrap_or(synth_defaults.model),
            api_key: get("TTS_API_KEY"),
            voice: get("TTS_VOICE").unwrap_or(synth_defaults.voice),
            format: get("TTS_FORMAT")
                .map(|f| AudioFormat::parse_lossy(&f))
                .unwrap_or(synth_defaults.format),
            timeout: Duration::from_millis(parse_or(
                get("TTS_TIMEOUT_MS"),
                "TTS_TIMEOUT_MS",
                DEFAULT_SYNTHESIS_TIMEOUT_MS,
            )?),
            scratch_dir: get("TTS_SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or(synth_defaults.scratch_dir),
        };

        let mut bundled_audio_paths = defaults.bundled_audio_paths;
        if let Some(extra) = get("BUNDLED_AUDIO_PATH") {
            bundled_audio_paths.insert(0, PathBuf::from(extra));
        }

        Ok(Self {
            skill_name: get("SKILL_NAME").unwrap_or(defaults.skill_name),
            response_text: get("SKILL_RESPONSE").unwrap_or(defaults.response_text),
            static_audio_url: get("GITHUB_AUDIO_URL"),
            repository,
            store,
            synthesis,
            bundled_audio_paths,
        })
    }
}

fn parse_or(value: Option<String>, key: &str, default: u64) -> Result<u64> {
    match value {
        Some(raw) => raw.parse::<u64>().map_err(|e| {
            Error::configuration_with_context(
                format!("invalid number '{}': {}", raw, e),
                ErrorContext::new().with_field_path(key),
            )
        }),
        None => Ok(default),
    }
}

//! One-time construction of every collaborator.

use super::handler::Skill;
use super::intent::IntentRouter;
use crate::config::SkillConfig;
use crate::directory::{AudioSourceCache, GitHubDirectory};
use crate::pipeline::AudioResolutionPipeline;
use crate::storage::{ObjectStore, ObjectStoreUploader, S3ObjectStore};
use crate::tts::{HttpSpeechEngine, TtsSynthesizer};
use crate::Result;
use std::sync::Arc;
use tracing::info;

/// Built at startup and shared by every invocation in the process.
pub struct SkillContext {
    pub config: SkillConfig,
    pub skill: Skill,
}

impl SkillContext {
    pub async fn from_env() -> Result<Self> {
        Self::build(SkillConfig::from_env()?).await
    }

    pub async fn build(config: SkillConfig) -> Result<Self> {
        let mut builder = AudioResolutionPipeline::builder()
            .voice(config.synthesis.voice.clone())
            .bundled_paths(config.bundled_audio_paths.clone());

        if let Some(url) = &config.static_audio_url {
            builder = builder.static_url(url.clone());
        }

        if let Some(repo) = &config.repository {
            let listing = GitHubDirectory::new(repo.clone())?;
            builder = builder.directory(Arc::new(AudioSourceCache::new(Arc::new(listing))));
        }

        let store: Option<Arc<dyn ObjectStore>> = match &config.store {
            Some(store_cfg) => Some(Arc::new(S3ObjectStore::new(store_cfg).await)),
            None => None,
        };
        let mut uploader = ObjectStoreUploader::new(store);
        if let Some(store_cfg) = &config.store {
            uploader = uploader.with_timeout(store_cfg.timeout);
        }
        builder = builder.uploader(uploader);

        let engine = HttpSpeechEngine::from_config(&config.synthesis)?;
        builder = builder.synthesizer(
            TtsSynthesizer::new(Arc::new(engine), config.synthesis.timeout)
                .with_scratch_dir(config.synthesis.scratch_dir.clone())
                .with_format(config.synthesis.format),
        );

        let pipeline = Arc::new(builder.build());
        let router = IntentRouter::new(config.response_text.clone())
            .with_engine_status(pipeline.synthesis_status());
        info!(
            static_url = config.static_audio_url.is_some(),
            directory = config.repository.is_some(),
            store = config.store.is_some(),
            voice = %config.synthesis.voice,
            "skill context ready"
        );

        let skill = Skill::new(config.skill_name.clone(), router, pipeline);
        Ok(Self { config, skill })
    }
}

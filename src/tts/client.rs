//! OpenAI-compatible speech endpoint client.

use super::SpeechEngine;
use crate::audio::AudioFormat;
use crate::config::SynthesisConfig;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use futures::StreamExt;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Speech engine reached over HTTP; the response body is streamed to disk.
pub struct HttpSpeechEngine {
    http_client: reqwest::Client,
    model: String,
    base_url: String,
    endpoint_path: String,
    api_key: Option<String>,
    format: AudioFormat,
}

impl HttpSpeechEngine {
    pub fn builder() -> HttpSpeechEngineBuilder {
        HttpSpeechEngineBuilder::new()
    }

    pub fn from_config(config: &SynthesisConfig) -> Result<Self> {
        let mut builder = Self::builder()
            .model(config.model.clone())
            .base_url(config.base_url.clone())
            .endpoint_path(config.endpoint_path.clone())
            .format(config.format);
        if let Some(key) = &config.api_key {
            builder = builder.api_key(key.clone());
        }
        builder.build()
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.endpoint_path)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl SpeechEngine for HttpSpeechEngine {
    async fn synthesize_to(&self, text: &str, voice: &str, output: &Path) -> Result<()> {
        let endpoint = self.endpoint();
        let body = serde_json::json!({
            "model": self.model,
            "input": text,
            "voice": voice,
            "response_format": self.format.as_str(),
        });
        let mut request = self
            .http_client
            .post(&endpoint)
            .header("Content-Type", "application/json")
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await.map_err(|e| {
            Error::synthesis_failed(
                format!("TTS request failed: {}", e),
                ErrorContext::new().with_source("tts").with_details(endpoint.clone()),
            )
        })?;

        let status = response.status();
        if !status.is_success() {
            let body_str = response.text().await.unwrap_or_default();
            return Err(Error::synthesis_failed(
                format!("TTS API error ({}): {}", status, body_str),
                ErrorContext::new().with_source("tts"),
            ));
        }

        let mut file = tokio::fs::File::create(output).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                Error::synthesis_failed(
                    format!("Failed to read TTS response: {}", e),
                    ErrorContext::new().with_source("tts"),
                )
            })?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("speech endpoint {} (model {})", self.endpoint(), self.model)
    }
}

pub struct HttpSpeechEngineBuilder {
    model: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    endpoint_path: Option<String>,
    format: AudioFormat,
}

impl HttpSpeechEngineBuilder {
    pub fn new() -> Self {
        Self {
            model: None,
            api_key: None,
            base_url: None,
            endpoint_path: None,
            format: AudioFormat::Mp3,
        }
    }
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }
    pub fn endpoint_path(mut self, path: impl Into<String>) -> Self {
        self.endpoint_path = Some(path.into());
        self
    }
    pub fn format(mut self, format: AudioFormat) -> Self {
        self.format = format;
        self
    }

    /// The hard timeout is enforced by [`super::TtsSynthesizer`], not here.
    pub fn build(self) -> Result<HttpSpeechEngine> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::configuration("TTS base URL must be specified"))?;
        url::Url::parse(&base_url).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid TTS base URL '{}': {}", base_url, e),
                ErrorContext::new().with_field_path("TTS_BASE_URL"),
            )
        })?;
        let model = self.model.unwrap_or_else(|| "tts-1".to_string());
        let endpoint_path = self
            .endpoint_path
            .unwrap_or_else(|| "/v1/audio/speech".to_string());
        let endpoint_path = if endpoint_path.starts_with('/') {
            endpoint_path
        } else {
            format!("/{}", endpoint_path)
        };
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;
        Ok(HttpSpeechEngine {
            http_client,
            model,
            base_url,
            endpoint_path,
            api_key: self.api_key,
            format: self.format,
        })
    }
}

impl Default for HttpSpeechEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

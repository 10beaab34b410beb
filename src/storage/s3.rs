//! Amazon S3 object store.

use super::{ObjectKey, ObjectStore};
use crate::config::StoreConfig;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use bytes::Bytes;

pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    region: String,
}

impl S3ObjectStore {
    /// Load credentials from the default provider chain.
    pub async fn new(config: &StoreConfig) -> Self {
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;
        Self::with_client(Client::new(&aws_config), config)
    }

    pub fn with_client(client: Client, config: &StoreConfig) -> Self {
        Self {
            client,
            bucket: config.bucket.clone(),
            region: config.region.clone(),
        }
    }

    pub fn public_url(&self, key: &ObjectKey) -> String {
        format!(
            "https://{}.s3.{}.amazonaws.com/{}",
            self.bucket, self.region, key
        )
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_public(&self, key: &ObjectKey, body: Bytes, content_type: &str) -> Result<String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .body(ByteStream::from(body))
            .content_type(content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| {
                Error::upload_failed(
                    DisplayErrorContext(&e).to_string(),
                    ErrorContext::new()
                        .with_source("s3")
                        .with_details(format!("s3://{}/{}", self.bucket, key)),
                )
            })?;
        Ok(self.public_url(key))
    }

    fn name(&self) -> &'static str {
        "s3"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioFormat;
    use crate::storage::{KeyKind, ObjectKeyGenerator};

    #[test]
    fn test_public_url_layout() {
        let sdk_config = aws_sdk_s3::Config::builder()
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .region(Region::new("eu-west-1"))
            .build();
        let store = S3ObjectStore::with_client(
            Client::from_conf(sdk_config),
            &StoreConfig {
                bucket: "skill-audio".to_string(),
                region: "eu-west-1".to_string(),
                timeout: std::time::Duration::from_secs(5),
            },
        );
        let key =
            ObjectKeyGenerator::new().generate_at(KeyKind::Synthesized, "hi", AudioFormat::Mp3, 42);
        assert_eq!(
            store.public_url(&key),
            format!("https://skill-audio.s3.eu-west-1.amazonaws.com/tts/42_{}.mp3", key.hash)
        );
    }
}

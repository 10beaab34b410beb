//! Upload-or-inline front for the object store.

use super::{ObjectKey, ObjectStore};
use crate::audio::{AudioFormat, AudioLocation};
use crate::config::DEFAULT_UPLOAD_TIMEOUT_SECS;
use crate::{Error, ErrorContext, Result};
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Largest payload, in source bytes, that may be inlined as a data URI.
pub const INLINE_LIMIT_BYTES: usize = 100_000;

pub struct ObjectStoreUploader {
    store: Option<Arc<dyn ObjectStore>>,
    inline_limit: usize,
    timeout: Duration,
}

impl ObjectStoreUploader {
    pub fn new(store: Option<Arc<dyn ObjectStore>>) -> Self {
        Self {
            store,
            inline_limit: INLINE_LIMIT_BYTES,
            timeout: Duration::from_secs(DEFAULT_UPLOAD_TIMEOUT_SECS),
        }
    }

    /// Uploader with no store: every upload fails, inlining still works.
    pub fn inline_only() -> Self {
        Self::new(None)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Upload `bytes` under `key`. A store that does not answer within the
    /// timeout is abandoned and reported as [`Error::UploadFailed`].
    pub async fn upload(
        &self,
        bytes: Bytes,
        key: &ObjectKey,
        format: AudioFormat,
    ) -> Result<AudioLocation> {
        let store = self.store.as_ref().ok_or(Error::StoreNotConfigured)?;
        let size = bytes.len();
        let put = store.put_public(key, bytes, format.mime_type());
        let url = match tokio::time::timeout(self.timeout, put).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(Error::upload_failed(
                    format!("upload timed out after {} ms", self.timeout.as_millis()),
                    ErrorContext::new()
                        .with_source(store.name())
                        .with_details(format!("key={}", key)),
                ))
            }
        };
        info!(store = store.name(), key = %key, size, "uploaded audio");
        Ok(AudioLocation::ObjectStoreUrl(url))
    }

    pub fn inline(&self, bytes: Bytes, format: AudioFormat) -> Result<AudioLocation> {
        if bytes.len() > self.inline_limit {
            return Err(Error::PayloadTooLargeForInline {
                size: bytes.len(),
                limit: self.inline_limit,
            });
        }
        Ok(AudioLocation::inline(bytes, format))
    }
}

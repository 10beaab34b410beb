//! 对象存储模块：上传音频并返回公开 URL，存储不可用时内联为 data URI。
//!
//! # Object Storage
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`ObjectStore`] | Trait for a store that persists bytes publicly and returns their URL |
//! | [`S3ObjectStore`] | Amazon S3 implementation (public-read ACL) |
//! | [`ObjectKeyGenerator`] | Timestamp + content-hash object keys |
//! | [`ObjectStoreUploader`] | Upload when a store is configured, inline otherwise |

mod key;
mod s3;
mod uploader;

pub use key::{KeyKind, ObjectKey, ObjectKeyGenerator};
pub use s3::S3ObjectStore;
pub use uploader::{ObjectStoreUploader, INLINE_LIMIT_BYTES};

use crate::Result;
use async_trait::async_trait;
use bytes::Bytes;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `body` under `key`, publicly readable, and return its HTTPS URL.
    async fn put_public(&self, key: &ObjectKey, body: Bytes, content_type: &str) -> Result<String>;

    fn name(&self) -> &'static str;
}

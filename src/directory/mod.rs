//! 远程音频目录模块：列出仓库文件夹中的候选音频文件并按进程缓存。
//!
//! # Remote Audio Directory
//!
//! Candidate audio files live in a folder of a remote repository. The
//! [`DirectoryListing`] trait abstracts the content-listing API, and
//! [`AudioSourceCache`] memoizes the filtered, sorted listing for the lifetime
//! of the process.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`DirectoryListing`] | Trait for listing a remote folder and addressing its files |
//! | [`GitHubDirectory`] | Listing via the GitHub contents API, files served from the raw host |
//! | [`AudioSourceCache`] | Get-or-populate cache; only non-empty successful listings are kept |

mod cache;
mod client;

pub use cache::{AudioSourceCache, AUDIO_SUFFIX};
pub use client::{encode_file_name, GitHubDirectory};

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait DirectoryListing: Send + Sync {
    /// Raw names of every entry in the folder.
    async fn list_names(&self) -> Result<Vec<String>>;

    /// Public URL of a file in the folder. The name is percent-encoded here.
    fn file_url(&self, name: &str) -> String;

    fn name(&self) -> &'static str;
}

//! Process-wide memo of the remote audio listing.

use super::DirectoryListing;
use crate::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Only entries ending in this suffix (case-sensitive) are candidates.
pub const AUDIO_SUFFIX: &str = ".mp3";

/// Get-or-populate cache over a [`DirectoryListing`].
///
/// A non-empty successful listing is kept forever. Failures and empty
/// listings are not cached, so the next call fetches again. Concurrent first
/// calls may each fetch; the last writer wins with an identical value.
pub struct AudioSourceCache {
    source: Arc<dyn DirectoryListing>,
    entries: RwLock<Option<Arc<Vec<String>>>>,
    fetches: AtomicU64,
}

impl AudioSourceCache {
    pub fn new(source: Arc<dyn DirectoryListing>) -> Self {
        Self {
            source,
            entries: RwLock::new(None),
            fetches: AtomicU64::new(0),
        }
    }

    /// Sorted candidate names, or empty when none could be fetched.
    pub async fn list(&self) -> Arc<Vec<String>> {
        match self.try_list().await {
            Ok(names) => names,
            Err(e) => {
                warn!(source = self.source.name(), error = %e, "audio listing fetch failed");
                Arc::new(Vec::new())
            }
        }
    }

    /// Like [`list`](Self::list), but a failed fetch is returned as the
    /// error instead of an empty listing. Nothing is cached on failure.
    pub async fn try_list(&self) -> Result<Arc<Vec<String>>> {
        if let Some(cached) = self.cached() {
            debug!(count = cached.len(), "audio listing cache hit");
            return Ok(cached);
        }

        self.fetches.fetch_add(1, Ordering::Relaxed);
        let names = self.source.list_names().await?;

        let mut audio: Vec<String> = names
            .into_iter()
            .filter(|n| n.ends_with(AUDIO_SUFFIX))
            .collect();
        audio.sort();
        if audio.is_empty() {
            warn!(source = self.source.name(), "audio listing has no candidate files");
            return Ok(Arc::new(audio));
        }

        let audio = Arc::new(audio);
        let mut guard = self.entries.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(Arc::clone(&audio));
        debug!(count = audio.len(), "audio listing cached");
        Ok(audio)
    }

    fn cached(&self) -> Option<Arc<Vec<String>>> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(Arc::clone)
    }

    pub fn file_url(&self, name: &str) -> String {
        self.source.file_url(name)
    }

    /// Number of remote fetches issued so far.
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }

    pub fn is_populated(&self) -> bool {
        self.cached().is_some()
    }
}

//! GitHub contents API listing.

use super::DirectoryListing;
use crate::config::RepositoryConfig;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;

/// Everything except RFC 3986 unreserved characters is encoded.
const FILE_NAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a file name for use as a single URL path segment.
pub fn encode_file_name(name: &str) -> String {
    utf8_percent_encode(name, FILE_NAME_ENCODE_SET).to_string()
}

/// Encode each `/`-separated segment of a path, keeping the separators.
fn encode_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(encode_file_name)
        .collect::<Vec<_>>()
        .join("/")
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    name: String,
}

/// Lists a repository folder through the contents API.
pub struct GitHubDirectory {
    http_client: reqwest::Client,
    config: RepositoryConfig,
}

impl GitHubDirectory {
    pub fn new(config: RepositoryConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            http_client,
            config,
        })
    }

    fn listing_url(&self) -> String {
        let base = self.config.api_base_url.trim_end_matches('/');
        if self.config.folder.is_empty() {
            format!("{}/repos/{}/{}/contents", base, self.config.owner, self.config.repo)
        } else {
            format!(
                "{}/repos/{}/{}/contents/{}",
                base,
                self.config.owner,
                self.config.repo,
                encode_path(&self.config.folder)
            )
        }
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }
}

#[async_trait]
impl DirectoryListing for GitHubDirectory {
    async fn list_names(&self) -> Result<Vec<String>> {
        let url = self.listing_url();
        let context = || {
            ErrorContext::new()
                .with_source("directory")
                .with_details(url.clone())
        };
        let response = self
            .http_client
            .get(&url)
            .query(&[("ref", self.config.branch.as_str())])
            .header("Accept", "application/vnd.github.v3+json")
            .send()
            .await
            .map_err(|e| Error::fetch_failed(format!("listing request failed: {}", e), context()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::fetch_failed(format!("failed to read listing: {}", e), context()))?;
        if !status.is_success() {
            return Err(Error::fetch_failed(format!("HTTP {}", status), context()));
        }

        let entries: Vec<ContentEntry> = serde_json::from_slice(&body)
            .map_err(|e| Error::fetch_failed(format!("malformed listing: {}", e), context()))?;
        Ok(entries.into_iter().map(|e| e.name).collect())
    }

    fn file_url(&self, name: &str) -> String {
        let base = self.config.raw_base_url.trim_end_matches('/');
        let mut url = format!(
            "{}/{}/{}/{}",
            base,
            self.config.owner,
            self.config.repo,
            encode_path(&self.config.branch)
        );
        if !self.config.folder.is_empty() {
            url.push('/');
            url.push_str(&encode_path(&self.config.folder));
        }
        url.push('/');
        url.push_str(&encode_file_name(name));
        url
    }

    fn name(&self) -> &'static str {
        "github"
    }
}

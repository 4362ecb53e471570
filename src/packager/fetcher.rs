//! Best-effort artifact fetching for the download packager.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};
use url::Url;

use crate::resolver::FileDescriptor;

use super::cache::AssetCache;

/// One successfully fetched artifact.
#[derive(Debug, Clone)]
pub struct FetchedFile {
    pub descriptor: FileDescriptor,
    pub bytes: Vec<u8>,
}

/// One artifact that could not be fetched.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FailedFetch {
    pub path: String,
    pub reason: String,
}

/// Outcome of fetching a file manifest: per-item failures never abort the
/// rest, they accumulate here for the partial-success report.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub fetched: Vec<FetchedFile>,
    pub failed: Vec<FailedFetch>,
}

enum AssetBase {
    Remote(Url),
    Local(PathBuf),
}

/// Fetches artifact bytes from a remote asset root over HTTP or from a
/// local directory.
pub struct AssetFetcher {
    base: AssetBase,
    client: reqwest::Client,
}

impl AssetFetcher {
    /// Create a fetcher for the given asset root. Roots with an http(s)
    /// scheme fetch over the network; anything else is a local directory.
    pub fn new(base: &str) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .user_agent("xol-configurator/0.1")
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build reqwest client");

        let base = if base.starts_with("http://") || base.starts_with("https://") {
            // A trailing slash matters: Url::join replaces the last path
            // segment of a slash-less base.
            let normalized = if base.ends_with('/') {
                base.to_string()
            } else {
                format!("{}/", base)
            };
            let url = Url::parse(&normalized)
                .map_err(|e| format!("Invalid asset base URL '{}': {}", base, e))?;
            AssetBase::Remote(url)
        } else {
            AssetBase::Local(PathBuf::from(base))
        };

        Ok(Self { base, client })
    }

    /// Fetch one artifact's bytes.
    pub async fn fetch(&self, path: &str) -> Result<Vec<u8>, String> {
        match &self.base {
            AssetBase::Remote(base) => {
                let url = base
                    .join(path)
                    .map_err(|e| format!("Invalid artifact path '{}': {}", path, e))?;
                info!("Fetching {}", url);
                let response = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| format!("Failed to fetch '{}': {}", path, e))?;
                if !response.status().is_success() {
                    return Err(format!(
                        "HTTP {} fetching '{}'",
                        response.status().as_u16(),
                        path
                    ));
                }
                response
                    .bytes()
                    .await
                    .map(|b| b.to_vec())
                    .map_err(|e| format!("Failed to read body of '{}': {}", path, e))
            }
            AssetBase::Local(dir) => {
                let full = dir.join(path);
                std::fs::read(&full).map_err(|e| format!("Failed to read '{}': {}", path, e))
            }
        }
    }

    /// Fetch every file in the manifest, best-effort. Cached paths are
    /// served from `cache` without touching the source; fresh fetches are
    /// stored back. A failed item is logged, recorded, and skipped; it
    /// never blocks the others.
    pub async fn fetch_all(&self, files: &[FileDescriptor], cache: &mut AssetCache) -> FetchOutcome {
        let mut outcome = FetchOutcome::default();
        for descriptor in files {
            if let Some(bytes) = cache.get(&descriptor.path) {
                outcome.fetched.push(FetchedFile {
                    descriptor: descriptor.clone(),
                    bytes: bytes.to_vec(),
                });
                continue;
            }
            match self.fetch(&descriptor.path).await {
                Ok(bytes) => {
                    cache.store(&descriptor.path, bytes.clone());
                    outcome.fetched.push(FetchedFile {
                        descriptor: descriptor.clone(),
                        bytes,
                    });
                }
                Err(reason) => {
                    warn!("Skipping '{}': {}", descriptor.path, reason);
                    outcome.failed.push(FailedFetch {
                        path: descriptor.path.clone(),
                        reason,
                    });
                }
            }
        }
        outcome
    }
}

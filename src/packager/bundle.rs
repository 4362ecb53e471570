//! Bundle assembly: fetched artifacts -> a download directory on disk.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use tracing::info;

use crate::resolver::FileDescriptor;

use super::cache::AssetCache;
use super::fetcher::{AssetFetcher, FailedFetch, FetchedFile};

/// Summary of one bundle operation: what landed on disk, what could not be
/// fetched, and when.
#[derive(Debug)]
pub struct BundleReport {
    pub dest: PathBuf,
    pub written: Vec<String>,
    pub failed: Vec<FailedFetch>,
    pub created_at: String,
}

impl BundleReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Write fetched artifacts under `dest`, creating subdirectories as needed.
/// A write error is fatal for the bundle operation (the report is not
/// produced) but touches nothing outside `dest`.
pub fn write_bundle(dest: &Path, files: &[FetchedFile]) -> Result<Vec<String>> {
    std::fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create bundle directory {:?}", dest))?;

    let mut written = Vec::new();
    for file in files {
        let target = dest.join(&file.descriptor.path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }
        std::fs::write(&target, &file.bytes)
            .with_context(|| format!("Failed to write {:?}", target))?;
        written.push(file.descriptor.path.clone());
    }
    Ok(written)
}

/// Fetch a file manifest and assemble the bundle. Per-item fetch failures
/// are carried in the report; only a total fetch failure or a write error
/// aborts the operation, and neither touches the caller's resolved state.
pub async fn bundle(
    fetcher: &AssetFetcher,
    files: &[FileDescriptor],
    dest: &Path,
    cache: &mut AssetCache,
) -> Result<BundleReport> {
    let outcome = fetcher.fetch_all(files, cache).await;
    if outcome.fetched.is_empty() && !files.is_empty() {
        bail!(
            "None of the {} files could be fetched; bundle aborted",
            files.len()
        );
    }

    let written = write_bundle(dest, &outcome.fetched)?;
    info!(
        "Bundled {} of {} files into {:?} ({} failed)",
        written.len(),
        files.len(),
        dest,
        outcome.failed.len()
    );

    Ok(BundleReport {
        dest: dest.to_path_buf(),
        written,
        failed: outcome.failed,
        created_at: Utc::now().to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::FileFormat;

    fn fetched(path: &str, bytes: &[u8]) -> FetchedFile {
        FetchedFile {
            descriptor: FileDescriptor {
                name: path.to_string(),
                path: path.to_string(),
                format: FileFormat::Stl,
                cosmetic: false,
            },
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn test_write_bundle_creates_nested_directories() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let dest = dir.path().join("xol-parts");

        let files = [
            fetched("Cowlings/Body.stl", b"solid body"),
            fetched("Misc/Wire Comb.stl", b"solid comb"),
        ];
        let written = write_bundle(&dest, &files).unwrap();

        assert_eq!(written.len(), 2);
        assert_eq!(
            std::fs::read(dest.join("Cowlings/Body.stl")).unwrap(),
            b"solid body"
        );
        assert_eq!(
            std::fs::read(dest.join("Misc/Wire Comb.stl")).unwrap(),
            b"solid comb"
        );
    }

    #[tokio::test]
    async fn test_bundle_reports_partial_failure() {
        let assets = tempfile::tempdir().expect("Failed to create temp dir");
        std::fs::write(assets.path().join("present.stl"), b"ok").unwrap();
        let dest = tempfile::tempdir().expect("Failed to create temp dir");

        let fetcher = AssetFetcher::new(assets.path().to_str().unwrap()).unwrap();
        let files = [
            FileDescriptor {
                name: "present".to_string(),
                path: "present.stl".to_string(),
                format: FileFormat::Stl,
                cosmetic: false,
            },
            FileDescriptor {
                name: "missing".to_string(),
                path: "missing.stl".to_string(),
                format: FileFormat::Stl,
                cosmetic: false,
            },
        ];

        let report = bundle(&fetcher, &files, dest.path(), &mut AssetCache::new())
            .await
            .unwrap();
        assert!(!report.is_complete());
        assert_eq!(report.written, vec!["present.stl".to_string()]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].path, "missing.stl");
    }

    #[tokio::test]
    async fn test_bundle_aborts_when_nothing_fetches() {
        let assets = tempfile::tempdir().expect("Failed to create temp dir");
        let dest = tempfile::tempdir().expect("Failed to create temp dir");

        let fetcher = AssetFetcher::new(assets.path().to_str().unwrap()).unwrap();
        let files = [FileDescriptor {
            name: "missing".to_string(),
            path: "missing.stl".to_string(),
            format: FileFormat::Stl,
            cosmetic: false,
        }];

        assert!(bundle(&fetcher, &files, dest.path(), &mut AssetCache::new())
            .await
            .is_err());
    }
}

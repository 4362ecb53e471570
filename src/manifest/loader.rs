//! Manifest loading and asset auditing.
//!
//! Provides two loading methods:
//! - `default_manifest()` - the embedded manifest compiled into the binary
//! - `load_manifest(path)` - a custom manifest from a file path
//!
//! Both run the full integrity validation; a manifest that references
//! unknown options or categories never reaches the resolver.

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use super::types::Manifest;
use crate::error::ManifestError;

/// Default part manifest embedded in the binary at compile time.
const DEFAULT_MANIFEST: &str = include_str!("../../config/parts_manifest.toml");

/// Extensions considered mesh assets by the audit sweep.
const MESH_EXTENSIONS: &[&str] = &["glb", "gltf", "stl", "3mf"];

/// Get the default manifest embedded in the binary.
///
/// # Panics
/// Panics if the embedded TOML is invalid or fails integrity validation
/// (either would be a compile-time bug).
pub fn default_manifest() -> Manifest {
    let manifest: Manifest =
        toml::from_str(DEFAULT_MANIFEST).expect("embedded parts_manifest.toml must be valid TOML");
    manifest
        .validate()
        .expect("embedded parts_manifest.toml must pass integrity checks");
    manifest
}

/// Load and validate a manifest from a TOML file at the given path.
pub fn load_manifest(path: &Path) -> Result<Manifest, ManifestError> {
    let content = std::fs::read_to_string(path)?;
    let manifest: Manifest = toml::from_str(&content)?;
    manifest.validate()?;
    Ok(manifest)
}

/// Result of sweeping a local asset directory against the manifest.
#[derive(Debug, Default)]
pub struct AssetAudit {
    /// Paths the manifest references that are missing on disk.
    pub missing: Vec<String>,
    /// Mesh files on disk that no variant references.
    pub orphaned: Vec<String>,
}

impl AssetAudit {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.orphaned.is_empty()
    }
}

/// Sweep `dir` for mesh files and compare against the asset and file
/// references in the manifest. Paths are compared with forward slashes,
/// relative to `dir`.
pub fn audit_assets(manifest: &Manifest, dir: &Path) -> AssetAudit {
    let mut referenced: HashSet<String> = HashSet::new();
    for category in &manifest.categories {
        for variant in &category.variants {
            referenced.extend(variant.asset.iter().cloned());
            referenced.extend(variant.file.iter().cloned());
        }
    }

    let mut on_disk: HashSet<String> = HashSet::new();
    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let is_mesh = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| MESH_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if !is_mesh {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(dir) {
            let normalized = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            on_disk.insert(normalized);
        }
    }

    let mut missing: Vec<String> = referenced.difference(&on_disk).cloned().collect();
    let mut orphaned: Vec<String> = on_disk.difference(&referenced).cloned().collect();
    missing.sort();
    orphaned.sort();
    debug!(
        "Asset audit: {} referenced, {} on disk, {} missing, {} orphaned",
        referenced.len(),
        on_disk.len(),
        missing.len(),
        orphaned.len()
    );

    AssetAudit { missing, orphaned }
}

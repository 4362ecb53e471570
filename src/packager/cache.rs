//! Content-addressed byte cache for fetched artifacts.
//!
//! Keyed by source path. The original configurator cached loaded assets in
//! a module-level map with no invalidation story; this one is owned by the
//! caller and cleared explicitly when the manifest changes, since asset
//! paths are only meaningful relative to the manifest that named them.

use std::collections::HashMap;

use tracing::debug;

/// In-memory cache of artifact bytes, keyed by source path.
#[derive(Debug, Default)]
pub struct AssetCache {
    entries: HashMap<String, Vec<u8>>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    pub fn store(&mut self, path: &str, bytes: Vec<u8>) {
        self.entries.insert(path.to_string(), bytes);
    }

    /// Drop every entry. Call when a different manifest becomes current;
    /// cached paths from the old manifest must not leak into the new one.
    pub fn invalidate_all(&mut self) {
        debug!("Invalidating {} cached assets", self.entries.len());
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

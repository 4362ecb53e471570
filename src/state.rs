//! Controller-owned application state.
//!
//! The original configurator kept the current configuration and the set of
//! parts in the scene as module-level singletons mutated from event
//! callbacks. Here both live in one explicit struct with a single writer:
//! every configuration change goes through [`ConfiguratorState::apply`],
//! which re-resolves and reports the minimal scene diff. A concurrent host
//! must serialize calls (the `&mut` receiver enforces that in safe Rust);
//! resolution itself reads the whole configuration atomically.

use std::collections::HashMap;

use crate::config::{snapshot, Configuration};
use crate::error::SnapshotError;
use crate::manifest::Manifest;
use crate::resolver::{resolve, ResolvedPart, ResolvedParts, Resolution, HEX_CATEGORY};

/// Scene update produced by applying a configuration change: remove these
/// variant ids, then add these parts. Unchanged parts are untouched so the
/// render collaborator keeps their loaded assets.
#[derive(Debug, Clone, Default)]
pub struct PartDiff {
    pub removed: Vec<String>,
    pub added: Vec<ResolvedPart>,
}

/// The current configuration plus the active (rendered) part set.
#[derive(Debug)]
pub struct ConfiguratorState {
    config: Configuration,
    /// Variant id -> the hex flag the part was activated with. A cowling
    /// whose flag flipped must be removed and re-added even though its id
    /// is unchanged (its material and mesh source differ).
    active: HashMap<String, bool>,
}

impl ConfiguratorState {
    pub fn new(manifest: &Manifest) -> Self {
        Self {
            config: Configuration::defaults(manifest),
            active: HashMap::new(),
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Apply a new configuration: resolve it, diff the renderable set
    /// against the active scene, and make the new configuration current.
    pub fn apply(&mut self, manifest: &Manifest, config: Configuration) -> (Resolution, PartDiff) {
        let resolution = resolve(manifest, &config);
        let diff = self.diff_active(&resolution.parts, config.hex_multicolour);
        self.config = config;
        (resolution, diff)
    }

    /// Decode and apply a shared snapshot. All-or-nothing: on decode
    /// failure the active configuration and part set are left untouched
    /// and the error is surfaced for the caller to report.
    pub fn apply_snapshot(
        &mut self,
        manifest: &Manifest,
        encoded: &str,
    ) -> Result<(Resolution, PartDiff), SnapshotError> {
        let config = snapshot::decode(manifest, encoded)?;
        Ok(self.apply(manifest, config))
    }

    fn diff_active(&mut self, parts: &ResolvedParts, hex: bool) -> PartDiff {
        let mut next: HashMap<String, bool> = HashMap::new();
        let mut added = Vec::new();
        for part in &parts.renderable {
            let flag = hex && part.category == HEX_CATEGORY;
            next.insert(part.variant.id.clone(), flag);
            match self.active.get(&part.variant.id) {
                Some(previous) if *previous == flag => {}
                _ => added.push(part.clone()),
            }
        }

        let mut removed = Vec::new();
        for (id, previous) in &self.active {
            match next.get(id) {
                Some(flag) if flag == previous => {}
                _ => removed.push(id.clone()),
            }
        }
        removed.sort();

        self.active = next;
        PartDiff { removed, added }
    }
}

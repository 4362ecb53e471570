//! The part resolver: manifest categories -> matching part set.

use tracing::debug;

use crate::config::Configuration;
use crate::manifest::{Manifest, EXTRUDER_AXIS, HOTEND_AXIS};

use super::predicate;
use super::types::{ResolvedPart, ResolvedParts};

/// Resolve the matching part set for a configuration.
///
/// Categories and variants are walked in manifest insertion order, so the
/// output is stable and resolution is idempotent: the downstream UI groups
/// parts in exactly this order, and the incremental diff in the application
/// state relies on equal inputs producing equal outputs.
///
/// Category suppression (UHF hotends mount directly and need no extruder
/// adapter) is looked up on the selected extruder and hotend rules and
/// applies to the renderable pass only.
pub fn resolve_parts(manifest: &Manifest, config: &Configuration) -> ResolvedParts {
    let suppressed: Vec<&str> = [config.get(EXTRUDER_AXIS), config.get(HOTEND_AXIS)]
        .into_iter()
        .flatten()
        .filter_map(|key| manifest.rule(key))
        .filter_map(|rule| rule.suppresses.as_deref())
        .collect();

    let mut parts = ResolvedParts::default();
    for category in &manifest.categories {
        if !category.download_only && suppressed.contains(&category.id.as_str()) {
            debug!("Skipping suppressed category '{}'", category.id);
            continue;
        }
        let bucket = if category.download_only {
            &mut parts.download_only
        } else {
            &mut parts.renderable
        };
        for variant in &category.variants {
            if predicate::matches(variant, config) {
                bucket.push(ResolvedPart {
                    category: category.id.clone(),
                    category_label: category.label.clone(),
                    variant: variant.clone(),
                });
            }
        }
    }

    debug!(
        "Resolved {} renderable and {} download-only parts",
        parts.renderable.len(),
        parts.download_only.len()
    );
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::manifest::default_manifest;

    fn ids(parts: &[ResolvedPart]) -> Vec<&str> {
        parts.iter().map(|p| p.variant.id.as_str()).collect()
    }

    #[test]
    fn test_default_configuration_resolves_one_variant_per_exclusive_category() {
        let manifest = default_manifest();
        let config = Configuration::defaults(&manifest);
        let parts = resolve_parts(&manifest, &config);

        for category in ["cowlings", "hotend-ducts", "extruder-adapters", "carriage-mounts"] {
            let count = parts
                .renderable
                .iter()
                .filter(|p| p.category == category)
                .count();
            assert_eq!(count, 1, "Expected exactly one '{}' part", category);
        }
    }

    #[test]
    fn test_uhf_hotend_skips_the_adapter_category_entirely() {
        let manifest = default_manifest();
        let mut config = Configuration::defaults(&manifest);
        config.select(&manifest, "hotend", "dragon-uhf").unwrap();

        let parts = resolve_parts(&manifest, &config);
        assert!(
            !parts.renderable.iter().any(|p| p.category == "extruder-adapters"),
            "UHF hotends must suppress the whole adapter category"
        );
        // The suppression does not touch download-only categories.
        assert!(ids(&parts.download_only).contains(&"wire-comb"));
    }

    #[test]
    fn test_board_selection_swaps_strain_relief() {
        let manifest = default_manifest();
        let mut config = Configuration::defaults(&manifest);

        let parts = resolve_parts(&manifest, &config);
        assert!(ids(&parts.renderable).contains(&"sr-umbilical"));
        assert!(!ids(&parts.renderable).contains(&"sr-board"));

        config.select(&manifest, "toolhead_board", "ebb36").unwrap();
        let parts = resolve_parts(&manifest, &config);
        assert!(ids(&parts.renderable).contains(&"sr-board"));
        assert!(!ids(&parts.renderable).contains(&"sr-umbilical"));
        assert!(ids(&parts.renderable).contains(&"bm-ebb36"));
    }

    #[test]
    fn test_accent_toggle_gates_download_only_parts() {
        let manifest = default_manifest();
        let mut config = Configuration::defaults(&manifest);

        let parts = resolve_parts(&manifest, &config);
        assert!(!ids(&parts.download_only).contains(&"badge-hex"));

        config.accent_parts = true;
        let parts = resolve_parts(&manifest, &config);
        assert!(ids(&parts.download_only).contains(&"badge-hex"));
        assert!(ids(&parts.download_only).contains(&"plate-logo"));
    }

    #[test]
    fn test_resolution_is_deterministic_and_idempotent() {
        let manifest = default_manifest();
        let mut config = Configuration::defaults(&manifest);
        config.select(&manifest, "carriage", "voron-tap").unwrap();
        config.select(&manifest, "extruder", "orbiter2").unwrap();
        config.select(&manifest, "toolhead_board", "sht36v2").unwrap();

        let first = resolve_parts(&manifest, &config);
        let second = resolve_parts(&manifest, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_renderable_order_follows_the_manifest() {
        let manifest = default_manifest();
        let config = Configuration::defaults(&manifest);
        let parts = resolve_parts(&manifest, &config);

        let category_order: Vec<&str> =
            parts.renderable.iter().map(|p| p.category.as_str()).collect();
        let mut deduped = category_order.clone();
        deduped.dedup();
        let manifest_order: Vec<&str> = manifest
            .categories
            .iter()
            .filter(|c| !c.download_only)
            .map(|c| c.id.as_str())
            .filter(|id| deduped.contains(id))
            .collect();
        assert_eq!(deduped, manifest_order);
    }
}

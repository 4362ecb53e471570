//! Compatibility checks: user-facing warnings and the disabled-option set.
//!
//! Both passes read the manifest's single compatibility table. The
//! original configurator kept a second, hardcoded disabling table in the
//! UI layer that drifted from the manifest rules; unifying them here makes
//! the two outputs consistent by construction.

use std::collections::BTreeSet;

use crate::config::Configuration;
use crate::manifest::{Manifest, EXTRUDER_AXIS, HOTEND_AXIS};

use super::types::DisabledOption;

/// Collect warning messages for the current configuration.
///
/// Rules are consulted for exactly two keys: the selected extruder id and
/// the selected hotend id. For each rule found, every triggering axis
/// appends the rule's message. Duplicates are kept, so a rule tripped by
/// two axes reports twice. That mirrors how the messages are surfaced (one
/// line per conflict), and callers must not assume uniqueness.
pub fn check_warnings(manifest: &Manifest, config: &Configuration) -> Vec<String> {
    let mut warnings = Vec::new();

    let keys = [config.get(EXTRUDER_AXIS), config.get(HOTEND_AXIS)];
    for key in keys.into_iter().flatten() {
        let Some(rule) = manifest.rule(key) else {
            continue;
        };
        for (axis, forbidden) in &rule.incompatible {
            let triggered = config
                .get(axis)
                .map(|value| forbidden.iter().any(|f| f == value))
                .unwrap_or(false);
            if triggered {
                if let Some(message) = &rule.warning {
                    warnings.push(message.clone());
                }
            }
        }
    }

    warnings
}

/// Derive the (axis, option) pairs the UI should disable.
///
/// Unlike the warning pass, this consults the rule of every currently
/// selected option, and applies each rule symmetrically: while rule key
/// `k` is selected its forbidden options are disabled, and while any of
/// its forbidden options is selected `k` itself is disabled. The result
/// is sorted for stable presentation.
pub fn disabled_options(manifest: &Manifest, config: &Configuration) -> Vec<DisabledOption> {
    let mut disabled = BTreeSet::new();

    for (key, rule) in &manifest.compatibility {
        // Validated at load: every rule key belongs to some domain.
        let Some(owner) = manifest.axis_of(key) else {
            continue;
        };
        let key_selected = config.get(&owner.id) == Some(key.as_str());

        for (axis, forbidden) in &rule.incompatible {
            if key_selected {
                for option in forbidden {
                    disabled.insert(DisabledOption {
                        axis: axis.clone(),
                        option: option.clone(),
                    });
                }
            }
            let counterpart_selected = config
                .get(axis)
                .map(|value| forbidden.iter().any(|f| f == value))
                .unwrap_or(false);
            if counterpart_selected {
                disabled.insert(DisabledOption {
                    axis: owner.id.clone(),
                    option: key.clone(),
                });
            }
        }
    }

    disabled.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::manifest::default_manifest;

    #[test]
    fn test_sherpa_crossbow_produces_a_warning() {
        let manifest = default_manifest();
        let mut config = Configuration::defaults(&manifest);
        config.select(&manifest, "extruder", "sherpa-mini").unwrap();
        config.select(&manifest, "filament_cutter", "crossbow").unwrap();

        let warnings = check_warnings(&manifest, &config);
        assert!(!warnings.is_empty());
        assert!(
            warnings.iter().any(|w| w.contains("Sherpa Mini")),
            "Expected the Sherpa Mini message, got: {:?}",
            warnings
        );
    }

    #[test]
    fn test_compatible_configuration_has_no_warnings() {
        let manifest = default_manifest();
        let config = Configuration::defaults(&manifest);
        assert!(check_warnings(&manifest, &config).is_empty());
    }

    #[test]
    fn test_warnings_only_consult_hotend_and_extruder_keys() {
        let manifest = default_manifest();
        let mut config = Configuration::defaults(&manifest);
        // The boop rule forbids the SHT36 V2, but carriage keys are never
        // consulted for warnings, only for option disabling.
        config.select(&manifest, "carriage", "boop").unwrap();
        config.select(&manifest, "toolhead_board", "sht36v2").unwrap();

        assert!(check_warnings(&manifest, &config).is_empty());
        let disabled = disabled_options(&manifest, &config);
        assert!(disabled.contains(&DisabledOption {
            axis: "toolhead_board".to_string(),
            option: "sht36v2".to_string(),
        }));
    }

    #[test]
    fn test_duplicate_warnings_are_preserved() {
        // A rule tripped on two axes reports its message twice.
        let toml = r#"
            [[options]]
            id = "hotend"
            label = "Hotend"
            default = "dragon"
            choices = ["dragon"]

            [[options]]
            id = "extruder"
            label = "Extruder"
            default = "grabby"
            choices = ["grabby"]

            [[options]]
            id = "filament_cutter"
            label = "Filament cutter"
            default = "snips"
            choices = ["snips"]

            [compatibility.grabby]
            warning = "Grabby fits nothing."
            [compatibility.grabby.incompatible]
            hotend = ["dragon"]
            filament_cutter = ["snips"]

            [[categories]]
            id = "ducts"
            label = "Duct"
            variants = []
        "#;
        let manifest: Manifest = toml::from_str(toml).unwrap();
        manifest.validate().unwrap();
        let config = Configuration::defaults(&manifest);

        let warnings = check_warnings(&manifest, &config);
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0], warnings[1]);
    }

    #[test]
    fn test_disabling_is_symmetric() {
        let manifest = default_manifest();

        // UHF hotend selected: the Sherpa Mini is disabled.
        let mut config = Configuration::defaults(&manifest);
        config.select(&manifest, "hotend", "dragon-uhf").unwrap();
        let disabled = disabled_options(&manifest, &config);
        assert!(disabled.contains(&DisabledOption {
            axis: "extruder".to_string(),
            option: "sherpa-mini".to_string(),
        }));

        // Sherpa Mini selected: both UHF hotends are disabled.
        let mut config = Configuration::defaults(&manifest);
        config.select(&manifest, "extruder", "sherpa-mini").unwrap();
        let disabled = disabled_options(&manifest, &config);
        for hotend in ["dragon-uhf", "rapido-uhf"] {
            assert!(
                disabled.contains(&DisabledOption {
                    axis: "hotend".to_string(),
                    option: hotend.to_string(),
                }),
                "Expected '{}' to be disabled, got: {:?}",
                hotend,
                disabled
            );
        }
    }

    #[test]
    fn test_disabled_set_is_sorted_and_deduplicated() {
        let manifest = default_manifest();
        let mut config = Configuration::defaults(&manifest);
        config.select(&manifest, "extruder", "sherpa-mini").unwrap();

        let disabled = disabled_options(&manifest, &config);
        let mut sorted = disabled.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(disabled, sorted);
    }
}

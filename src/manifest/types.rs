//! Schema types for the part manifest.
//!
//! The manifest is a TOML document loaded once at startup and treated as
//! immutable for the process lifetime. `Manifest::validate` enforces the
//! integrity rules that the matching engine relies on (unique ids, no
//! orphan option references) so that resolution itself never has to fail.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::TOGGLE_KEYS;
use crate::error::ManifestError;

/// Axis consulted by the compatibility rule lookups.
pub const HOTEND_AXIS: &str = "hotend";
/// Axis consulted by the compatibility rule lookups.
pub const EXTRUDER_AXIS: &str = "extruder";

/// Root manifest document.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Configuration axes in display order.
    pub options: Vec<OptionDomain>,
    /// Compatibility rules keyed by option id.
    #[serde(default)]
    pub compatibility: HashMap<String, CompatRule>,
    /// Part categories in display order.
    pub categories: Vec<PartCategory>,
}

/// A named configuration axis with its enumerated choices.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionDomain {
    pub id: String,
    pub label: String,
    /// The choice selected at startup. Must be a member of `choices`.
    pub default: String,
    pub choices: Vec<String>,
}

/// Per-option compatibility rule: warning text, forbidden cross-axis
/// combinations, and an optional category to drop from the renderable pass.
///
/// This is the single rule table; both the warning pass and the
/// option-disabling pass read it.
#[derive(Debug, Clone, Deserialize)]
pub struct CompatRule {
    /// Category id skipped in the renderable pass while this option is
    /// selected (e.g. UHF hotends need no extruder adapter).
    #[serde(default)]
    pub suppresses: Option<String>,
    /// Message surfaced when one of the incompatible pairs is selected.
    #[serde(default)]
    pub warning: Option<String>,
    /// Axis -> forbidden option ids.
    #[serde(default)]
    pub incompatible: BTreeMap<String, Vec<String>>,
}

/// A named grouping of part variants.
#[derive(Debug, Clone, Deserialize)]
pub struct PartCategory {
    pub id: String,
    pub label: String,
    /// Download-only categories have no 3D assets and never render.
    #[serde(default)]
    pub download_only: bool,
    /// Placement applied by the render collaborator to every variant in
    /// this category. Carried opaque; the resolver never interprets it.
    #[serde(default)]
    pub transform: Option<RenderTransform>,
    pub variants: Vec<PartVariant>,
}

/// Category-level placement for the render collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderTransform {
    #[serde(default)]
    pub translation: [f32; 3],
    #[serde(default)]
    pub rotation_deg: [f32; 3],
}

/// One concrete option within a category, with its matching predicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartVariant {
    /// Unique across the whole manifest, not just the owning category.
    pub id: String,
    /// Render mesh reference. Required for renderable categories.
    #[serde(default)]
    pub asset: Option<String>,
    /// Explicit output path, used verbatim instead of deriving from `asset`.
    #[serde(default)]
    pub file: Option<String>,
    /// Matches every configuration, overriding all other predicates
    /// including `exclude_if`.
    #[serde(default)]
    pub always: bool,
    /// Axis -> exact expected value.
    #[serde(default)]
    pub requires: BTreeMap<String, PredValue>,
    /// Axis -> candidate values. Every listed axis must hit one candidate.
    #[serde(default)]
    pub requires_any: BTreeMap<String, Vec<PredValue>>,
    /// Axis -> forbidden values. Any hit excludes the variant.
    #[serde(default)]
    pub exclude_if: BTreeMap<String, Vec<PredValue>>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Print note shown alongside the part.
    #[serde(default)]
    pub note: Option<String>,
    /// Shown in the 3D preview but never part of the download list.
    #[serde(default)]
    pub visual_only: bool,
}

fn default_quantity() -> u32 {
    1
}

/// A predicate value: an option id on a regular axis, or a boolean on one
/// of the toggle axes. Comparison is type-strict; a boolean never equals
/// the string spelling of that boolean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredValue {
    Bool(bool),
    Id(String),
}

/// A configuration value seen through the predicate evaluator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigValue<'a> {
    Id(&'a str),
    Bool(bool),
}

impl PredValue {
    /// Type-strict equality against a configuration value.
    pub fn matches(&self, value: ConfigValue<'_>) -> bool {
        match (self, value) {
            (PredValue::Id(expected), ConfigValue::Id(actual)) => expected == actual,
            (PredValue::Bool(expected), ConfigValue::Bool(actual)) => *expected == actual,
            _ => false,
        }
    }
}

impl Manifest {
    /// Look up an option domain by axis id.
    pub fn domain(&self, axis: &str) -> Option<&OptionDomain> {
        self.options.iter().find(|d| d.id == axis)
    }

    /// Find the domain that enumerates the given option id. Choices may
    /// repeat across axes ("none"), so callers resolving rule keys rely on
    /// validation having proven those keys unambiguous.
    pub fn axis_of(&self, option_id: &str) -> Option<&OptionDomain> {
        self.options
            .iter()
            .find(|d| d.choices.iter().any(|c| c == option_id))
    }

    /// Look up a category by id.
    pub fn category(&self, id: &str) -> Option<&PartCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Look up the compatibility rule for an option id.
    pub fn rule(&self, option_id: &str) -> Option<&CompatRule> {
        self.compatibility.get(option_id)
    }

    /// Enforce manifest integrity. The original web configurator tolerated
    /// orphan references (the predicate simply never matched); here they
    /// are load-time errors.
    pub fn validate(&self) -> Result<(), ManifestError> {
        let mut axis_ids = HashSet::new();
        for domain in &self.options {
            if !axis_ids.insert(domain.id.as_str()) {
                return Err(ManifestError::DuplicateAxis(domain.id.clone()));
            }
            if !domain.choices.contains(&domain.default) {
                return Err(ManifestError::BadDefault {
                    axis: domain.id.clone(),
                    default: domain.default.clone(),
                });
            }
        }

        for (key, rule) in &self.compatibility {
            // Rule keys are looked up via `axis_of`, so each must belong to
            // exactly one domain. Plain choices may repeat across axes
            // ("none" exists on both the board and the cutter axis).
            let owners = self
                .options
                .iter()
                .filter(|d| d.choices.iter().any(|c| c == key))
                .count();
            match owners {
                0 => return Err(ManifestError::UnknownRuleKey(key.clone())),
                1 => {}
                _ => return Err(ManifestError::AmbiguousRuleKey(key.clone())),
            }
            for (axis, forbidden) in &rule.incompatible {
                let Some(domain) = self.domain(axis) else {
                    return Err(ManifestError::UnknownRuleAxis {
                        rule: key.clone(),
                        axis: axis.clone(),
                    });
                };
                for option in forbidden {
                    if !domain.choices.contains(option) {
                        return Err(ManifestError::UnknownOption {
                            variant: key.clone(),
                            axis: axis.clone(),
                            value: option.clone(),
                        });
                    }
                }
            }
            if let Some(category) = &rule.suppresses {
                if self.category(category).is_none() {
                    return Err(ManifestError::UnknownSuppressedCategory {
                        rule: key.clone(),
                        category: category.clone(),
                    });
                }
            }
        }

        let mut variant_ids = HashSet::new();
        for category in &self.categories {
            for variant in &category.variants {
                if !variant_ids.insert(variant.id.as_str()) {
                    return Err(ManifestError::DuplicateVariant(variant.id.clone()));
                }
                self.validate_predicates(variant)?;
                if !category.download_only && variant.asset.is_none() {
                    return Err(ManifestError::MissingAsset(variant.id.clone()));
                }
                if category.download_only && !variant.visual_only && variant.file.is_none() {
                    return Err(ManifestError::MissingFile(variant.id.clone()));
                }
                for path in variant.asset.iter().chain(variant.file.iter()) {
                    if path.starts_with('/') || path.split('/').any(|seg| seg == "..") {
                        return Err(ManifestError::UnsafePath {
                            variant: variant.id.clone(),
                            path: path.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    fn validate_predicates(&self, variant: &PartVariant) -> Result<(), ManifestError> {
        let single = variant.requires.iter().map(|(axis, v)| (axis, vec![v]));
        let listed = variant
            .requires_any
            .iter()
            .chain(variant.exclude_if.iter())
            .map(|(axis, vs)| (axis, vs.iter().collect()));

        for (axis, values) in single.chain(listed) {
            if TOGGLE_KEYS.contains(&axis.as_str()) {
                for value in values {
                    if !matches!(value, PredValue::Bool(_)) {
                        return Err(ManifestError::NonBooleanToggle {
                            variant: variant.id.clone(),
                            axis: axis.clone(),
                        });
                    }
                }
                continue;
            }
            let Some(domain) = self.domain(axis) else {
                return Err(ManifestError::UnknownAxis {
                    variant: variant.id.clone(),
                    axis: axis.clone(),
                });
            };
            for value in values {
                match value {
                    PredValue::Id(id) if domain.choices.contains(id) => {}
                    PredValue::Id(id) => {
                        return Err(ManifestError::UnknownOption {
                            variant: variant.id.clone(),
                            axis: axis.clone(),
                            value: id.clone(),
                        });
                    }
                    PredValue::Bool(_) => {
                        return Err(ManifestError::UnknownOption {
                            variant: variant.id.clone(),
                            axis: axis.clone(),
                            value: value_spelling(value),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

fn value_spelling(value: &PredValue) -> String {
    match value {
        PredValue::Bool(b) => b.to_string(),
        PredValue::Id(id) => id.clone(),
    }
}

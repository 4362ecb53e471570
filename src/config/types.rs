//! The live configuration: one selected option per axis plus the two
//! cosmetic toggles.

use std::collections::HashMap;

use crate::manifest::{ConfigValue, Manifest};

/// Toggle axis driving the multi-colour cowling file transformation.
pub const HEX_TOGGLE: &str = "hex_multicolour";
/// Toggle axis gating the accent part category.
pub const ACCENT_TOGGLE: &str = "accent_parts";
/// All boolean toggle axes, in snapshot order.
pub const TOGGLE_KEYS: &[&str] = &[HEX_TOGGLE, ACCENT_TOGGLE];

/// A full configuration. Every axis holds exactly one value at all times;
/// the toggles default to off.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    axes: HashMap<String, String>,
    pub hex_multicolour: bool,
    pub accent_parts: bool,
}

impl Configuration {
    /// Build the startup configuration from the manifest defaults.
    pub fn defaults(manifest: &Manifest) -> Self {
        let axes = manifest
            .options
            .iter()
            .map(|domain| (domain.id.clone(), domain.default.clone()))
            .collect();
        Self {
            axes,
            hex_multicolour: false,
            accent_parts: false,
        }
    }

    /// The selected option id for an axis, if the axis exists.
    pub fn get(&self, axis: &str) -> Option<&str> {
        self.axes.get(axis).map(String::as_str)
    }

    /// Select an option on an axis, validating both against the manifest.
    pub fn select(&mut self, manifest: &Manifest, axis: &str, option: &str) -> Result<(), String> {
        let Some(domain) = manifest.domain(axis) else {
            return Err(format!("Unknown configuration axis '{}'", axis));
        };
        if !domain.choices.iter().any(|c| c == option) {
            return Err(format!(
                "'{}' is not a valid choice for {} (expected one of: {})",
                option,
                domain.label,
                domain.choices.join(", ")
            ));
        }
        self.axes.insert(axis.to_string(), option.to_string());
        Ok(())
    }

    /// The value of any axis as seen by the predicate evaluator. Toggle
    /// axes read as booleans; unknown keys read as `None` and simply fail
    /// equality and membership checks downstream.
    pub fn value(&self, key: &str) -> Option<ConfigValue<'_>> {
        match key {
            HEX_TOGGLE => Some(ConfigValue::Bool(self.hex_multicolour)),
            ACCENT_TOGGLE => Some(ConfigValue::Bool(self.accent_parts)),
            _ => self.axes.get(key).map(|v| ConfigValue::Id(v)),
        }
    }
}

//! Shareable configuration snapshots.
//!
//! A snapshot is the allowlisted configuration keys serialized as JSON and
//! wrapped in URL-safe base64, compact enough for a URL fragment. Decoding
//! is defensive: unknown keys are dropped, values that fail validation fall
//! back to the axis default, and only a malformed envelope is an error.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::types::{Configuration, ACCENT_TOGGLE, HEX_TOGGLE};
use crate::error::SnapshotError;
use crate::manifest::Manifest;

/// Encode a configuration as a URL-safe snapshot string. Keys are emitted
/// in manifest order (axes first, then toggles) so equal configurations
/// produce identical snapshots.
pub fn encode(manifest: &Manifest, config: &Configuration) -> String {
    let mut object = Map::new();
    for domain in &manifest.options {
        if let Some(value) = config.get(&domain.id) {
            object.insert(domain.id.clone(), Value::String(value.to_string()));
        }
    }
    object.insert(HEX_TOGGLE.to_string(), Value::Bool(config.hex_multicolour));
    object.insert(ACCENT_TOGGLE.to_string(), Value::Bool(config.accent_parts));

    let json = Value::Object(object).to_string();
    URL_SAFE_NO_PAD.encode(json.as_bytes())
}

/// Decode a snapshot into a fresh configuration, starting from the manifest
/// defaults. All-or-nothing for the envelope: a malformed snapshot returns
/// an error and no partially-applied configuration.
pub fn decode(manifest: &Manifest, encoded: &str) -> Result<Configuration, SnapshotError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded.trim())
        .map_err(|e| SnapshotError::Encoding(e.to_string()))?;
    let object: Map<String, Value> = serde_json::from_slice(&bytes)
        .map_err(|e| SnapshotError::Payload(e.to_string()))?;

    let mut config = Configuration::defaults(manifest);
    for (key, value) in &object {
        if key == HEX_TOGGLE || key == ACCENT_TOGGLE {
            match value.as_bool() {
                Some(flag) if key == HEX_TOGGLE => config.hex_multicolour = flag,
                Some(flag) => config.accent_parts = flag,
                None => warn!("Snapshot toggle '{}' is not a boolean; keeping default", key),
            }
            continue;
        }
        if manifest.domain(key).is_none() {
            debug!("Dropping unrecognized snapshot key '{}'", key);
            continue;
        }
        match value.as_str() {
            Some(option) => {
                if let Err(e) = config.select(manifest, key, option) {
                    warn!("Snapshot value rejected, keeping default: {}", e);
                }
            }
            None => warn!("Snapshot key '{}' is not a string; keeping default", key),
        }
    }
    Ok(config)
}

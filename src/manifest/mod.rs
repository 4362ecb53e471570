//! The part manifest: option domains, compatibility rules, and part
//! variants with their matching predicates.
//!
//! Loaded once at startup (embedded default or a custom TOML file),
//! validated for integrity, then treated as immutable for the process
//! lifetime. There is no hot-reload contract.

mod loader;
mod types;

pub use loader::{audit_assets, default_manifest, load_manifest, AssetAudit};
pub use types::{
    CompatRule, ConfigValue, Manifest, OptionDomain, PartCategory, PartVariant, PredValue,
    RenderTransform, EXTRUDER_AXIS, HOTEND_AXIS,
};

//! The resolution engine: configuration -> parts, warnings, disabled
//! options, and the output file manifest.
//!
//! # Architecture
//!
//! - **Predicate evaluation**: pure variant-vs-configuration matching
//! - **Part resolution**: manifest walk in insertion order, with
//!   rule-driven category suppression
//! - **Compatibility**: warnings and disabled options from the one rule table
//! - **File resolution**: path derivation plus the multi-colour transform
//!
//! Everything in this module is synchronous, deterministic, and total:
//! given a validated manifest, no resolution step can fail. The
//! event-handling shell calls [`resolve`] on every configuration change
//! and hands the result to the render, UI, and packaging collaborators.

mod compat;
mod files;
mod parts;
mod predicate;
mod types;

pub use compat::{check_warnings, disabled_options};
pub use files::{printable_parts, resolve_files, DISPLAY_ONLY_CATEGORIES, HEX_CATEGORY};
pub use parts::resolve_parts;
pub use predicate::matches;
pub use types::{
    DisabledOption, FileDescriptor, FileFormat, ResolvedPart, ResolvedParts, Resolution,
};

use crate::config::Configuration;
use crate::manifest::Manifest;

/// Resolve one configuration completely.
pub fn resolve(manifest: &Manifest, config: &Configuration) -> Resolution {
    let parts = resolve_parts(manifest, config);
    let warnings = check_warnings(manifest, config);
    let disabled = disabled_options(manifest, config);
    let files = resolve_files(&parts, config);
    Resolution {
        parts,
        warnings,
        disabled,
        files,
    }
}

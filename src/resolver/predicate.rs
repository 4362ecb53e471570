//! The predicate evaluator: does a variant match a configuration?

use crate::config::Configuration;
use crate::manifest::PartVariant;

/// Evaluate a variant's predicates against a configuration.
///
/// Pure and total: a missing configuration key fails equality and
/// membership checks, producing `false`, never an error.
///
/// Contract, in evaluation order:
/// 1. `always` matches unconditionally, overriding everything below,
///    including `exclude_if`.
/// 2. `requires`: every listed axis must equal its expected value exactly
///    (type-strict; a boolean never equals its string spelling).
/// 3. `requires_any`: every listed axis must hit one of its candidates.
///    This is per-axis membership, not a global OR across axes.
/// 4. `exclude_if`: any hit on any listed axis excludes the variant.
/// 5. A variant with no predicates matches every configuration. Empty
///    predicate maps are vacuously satisfied; that is intended behavior,
///    not an authoring accident.
pub fn matches(variant: &PartVariant, config: &Configuration) -> bool {
    if variant.always {
        return true;
    }

    for (axis, expected) in &variant.requires {
        match config.value(axis) {
            Some(value) if expected.matches(value) => {}
            _ => return false,
        }
    }

    for (axis, candidates) in &variant.requires_any {
        match config.value(axis) {
            Some(value) if candidates.iter().any(|c| c.matches(value)) => {}
            _ => return false,
        }
    }

    for (axis, forbidden) in &variant.exclude_if {
        if let Some(value) = config.value(axis) {
            if forbidden.iter().any(|f| f.matches(value)) {
                return false;
            }
        }
    }

    true
}

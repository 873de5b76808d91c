//! Input validation utilities
//!
//! Checks user-supplied compartment identifiers before any API call is made.

use crate::error::{CostChefError, Result};
use regex::Regex;
use std::sync::LazyLock;

// ocid1.<resource-type>.<realm>.[region][.future-use].<unique-id>
static COMPARTMENT_OCID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ocid1\.(compartment|tenancy)\.oc[0-9]+\.[a-z0-9-]*(\.[a-z0-9-]+)?\.[a-z0-9]+$")
        .expect("static OCID pattern compiles")
});

/// Validate a compartment (or tenancy root) OCID.
pub fn validate_compartment_id(id: &str) -> Result<()> {
    if !id.starts_with("ocid1.") {
        return Err(CostChefError::Validation {
            field: "compartment_id".to_string(),
            reason: format!("OCID must start with 'ocid1.', got: {}", id),
        });
    }

    if !COMPARTMENT_OCID.is_match(id) {
        return Err(CostChefError::Validation {
            field: "compartment_id".to_string(),
            reason: format!(
                "Expected ocid1.compartment.<realm>..<id> or ocid1.tenancy.<realm>..<id>, got: {}",
                id
            ),
        });
    }

    Ok(())
}

/// Split a `--compartments` value into trimmed, non-empty ids.
pub fn parse_compartment_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

//! Merging a flattened child record with its flattened parent
//!
//! Every key of each side is re-prefixed, so fields with the same name in the
//! parent and the child (`id`, `status`, `startDateTime`, ...) both survive.

use crate::domain::{ArxError, FlatRecord, Result};

/// Default prefix for the parent review definition's fields
pub const DEFAULT_PRIMARY_PREFIX: &str = "definition_";

/// Default prefix for the review instance's own fields
pub const DEFAULT_SECONDARY_PREFIX: &str = "instance_";

/// A validated pair of key prefixes
///
/// Neither prefix may be empty, and neither may be a prefix of the other.
/// With that, `"{p}{k1}" == "{s}{k2}"` is impossible for any keys `k1`, `k2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePrefixes {
    primary: String,
    secondary: String,
}

impl MergePrefixes {
    /// Validate and create a prefix pair
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Result<Self> {
        let primary = primary.into();
        let secondary = secondary.into();

        if primary.is_empty() || secondary.is_empty() {
            return Err(ArxError::Validation(
                "Merge prefixes cannot be empty".to_string(),
            ));
        }

        if primary.starts_with(&secondary) || secondary.starts_with(&primary) {
            return Err(ArxError::Validation(format!(
                "Merge prefixes '{primary}' and '{secondary}' overlap; \
                 neither may start with the other"
            )));
        }

        Ok(Self { primary, secondary })
    }

    /// Prefix applied to primary keys
    pub fn primary(&self) -> &str {
        &self.primary
    }

    /// Prefix applied to secondary keys
    pub fn secondary(&self) -> &str {
        &self.secondary
    }
}

impl Default for MergePrefixes {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY_PREFIX.to_string(),
            secondary: DEFAULT_SECONDARY_PREFIX.to_string(),
        }
    }
}

/// Merge two flat records under disambiguating prefixes
///
/// Primary entries come first, then secondary entries, each in source order.
/// The result always has `primary.len() + secondary.len()` keys.
///
/// # Examples
///
/// ```
/// use arx::core::transform::merge::{merge_records, MergePrefixes};
/// use serde_json::json;
///
/// let definition = json!({"id": "d1", "status": "InProgress"});
/// let instance = json!({"id": "i1", "status": "Completed"});
///
/// let merged = merge_records(
///     definition.as_object().unwrap(),
///     instance.as_object().unwrap(),
///     &MergePrefixes::default(),
/// );
///
/// assert_eq!(merged["definition_id"], "d1");
/// assert_eq!(merged["instance_id"], "i1");
/// assert_eq!(merged.len(), 4);
/// ```
pub fn merge_records(
    primary: &FlatRecord,
    secondary: &FlatRecord,
    prefixes: &MergePrefixes,
) -> FlatRecord {
    let mut merged = FlatRecord::new();

    for (key, value) in primary {
        merged.insert(format!("{}{}", prefixes.primary, key), value.clone());
    }
    for (key, value) in secondary {
        merged.insert(format!("{}{}", prefixes.secondary, key), value.clone());
    }

    merged
}

//! Record transformation
//!
//! - [`flatten`] collapses nested records into single-level maps
//! - [`merge`] combines a parent and child flat record under key prefixes
//! - [`annotate_with_parents`] tags child records with the ids of their owners

pub mod flatten;
pub mod merge;

pub use flatten::flatten_record;
pub use merge::{merge_records, MergePrefixes};

use crate::domain::{DefinitionId, FlatRecord, InstanceId};
use serde_json::Value;

/// Key holding the owning review instance id on decision and reviewer records
pub const INSTANCE_ID_FIELD: &str = "reviewInstanceId";

/// Key holding the owning review definition id on decision and reviewer records
pub const DEFINITION_ID_FIELD: &str = "reviewDefinitionId";

/// Add the owning instance and definition ids to a flattened child record
///
/// Existing fields with the same names are overwritten.
pub fn annotate_with_parents(
    mut record: FlatRecord,
    instance_id: &InstanceId,
    definition_id: &DefinitionId,
) -> FlatRecord {
    record.insert(
        INSTANCE_ID_FIELD.to_string(),
        Value::String(instance_id.to_string()),
    );
    record.insert(
        DEFINITION_ID_FIELD.to_string(),
        Value::String(definition_id.to_string()),
    );
    record
}

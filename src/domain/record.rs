//! Record type aliases
//!
//! Records arrive from the governance API as arbitrary JSON. The exporter
//! never deserializes them into fixed structs: the Graph schema for access
//! reviews grows over time and every field should reach the output files.

use serde_json::{Map, Value};

/// A raw record as returned by the API (normally a JSON object)
pub type Record = Value;

/// A single-level record produced by flattening
///
/// Values are scalars, arrays, or empty objects; never non-empty objects.
pub type FlatRecord = Map<String, Value>;

//! Domain identifier types with validation
//!
//! Newtype wrappers for the Graph identifiers of access review objects.
//! Keeping them distinct prevents passing an instance id where a definition
//! id is expected when building nested request URLs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Access review definition identifier
///
/// # Examples
///
/// ```
/// use arx::domain::ids::DefinitionId;
/// use std::str::FromStr;
///
/// let id = DefinitionId::from_str("2b83cc42-09db-46f6-8c6e-16fec466a82d").unwrap();
/// assert_eq!(id.as_str(), "2b83cc42-09db-46f6-8c6e-16fec466a82d");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DefinitionId(String);

impl DefinitionId {
    /// Creates a new DefinitionId, rejecting blank values
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Review definition ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Reads the `id` field of a raw definition record
    pub fn from_record(record: &Value) -> Option<Self> {
        record_id(record).and_then(|id| Self::new(id).ok())
    }

    /// Returns the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DefinitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DefinitionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for DefinitionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Access review instance identifier
///
/// # Examples
///
/// ```
/// use arx::domain::ids::InstanceId;
/// use std::str::FromStr;
///
/// let id = InstanceId::from_str("6444d4fd-ab55-4608-8cf9-c6702d172afc").unwrap();
/// assert_eq!(id.to_string(), "6444d4fd-ab55-4608-8cf9-c6702d172afc");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(String);

impl InstanceId {
    /// Creates a new InstanceId, rejecting blank values
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Review instance ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Reads the `id` field of a raw instance record
    pub fn from_record(record: &Value) -> Option<Self> {
        record_id(record).and_then(|id| Self::new(id).ok())
    }

    /// Returns the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InstanceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for InstanceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_definition_id_valid() {
        let id = DefinitionId::new("def-1").unwrap();
        assert_eq!(id.as_str(), "def-1");
        assert_eq!(id.to_string(), "def-1");
        assert_eq!(id.into_inner(), "def-1");
    }

    #[test]
    fn test_definition_id_rejects_blank() {
        assert!(DefinitionId::new("").is_err());
        assert!(DefinitionId::new("   ").is_err());
    }

    #[test]
    fn test_instance_id_rejects_blank() {
        assert!(InstanceId::from_str("").is_err());
        assert!(InstanceId::from_str("inst-1").is_ok());
    }

    #[test]
    fn test_from_record() {
        let record = json!({"id": "abc", "displayName": "Quarterly guest review"});
        assert_eq!(DefinitionId::from_record(&record).unwrap().as_str(), "abc");
        assert_eq!(InstanceId::from_record(&record).unwrap().as_str(), "abc");
    }

    #[test]
    fn test_from_record_missing_or_wrong_type() {
        assert!(DefinitionId::from_record(&json!({"displayName": "x"})).is_none());
        assert!(InstanceId::from_record(&json!({"id": 42})).is_none());
        assert!(InstanceId::from_record(&json!({"id": ""})).is_none());
    }

    #[test]
    fn test_id_serialization() {
        let id = InstanceId::new("inst-7").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"inst-7\"");
        let back: InstanceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}

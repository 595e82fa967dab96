//! Governance source trait
//!
//! Abstracts the four paged collections the exporter walks, so the traversal
//! can run against Microsoft Graph or an in-memory fake.

use crate::domain::{DefinitionId, InstanceId, Record, Result};
use async_trait::async_trait;

/// Paged access to access-review records
///
/// Every method returns one page of at most `top` raw records starting at
/// offset `skip`. A page shorter than `top` is the last one.
#[async_trait]
pub trait GovernanceSource: Send + Sync {
    /// Review definitions with the given status
    async fn list_definitions(&self, status: &str, skip: usize, top: usize) -> Result<Vec<Record>>;

    /// Instances of a review definition
    async fn list_instances(
        &self,
        definition_id: &DefinitionId,
        skip: usize,
        top: usize,
    ) -> Result<Vec<Record>>;

    /// Decision items recorded for an instance
    async fn list_decisions(
        &self,
        definition_id: &DefinitionId,
        instance_id: &InstanceId,
        skip: usize,
        top: usize,
    ) -> Result<Vec<Record>>;

    /// Reviewers contacted for an instance
    async fn list_contacted_reviewers(
        &self,
        definition_id: &DefinitionId,
        instance_id: &InstanceId,
        skip: usize,
        top: usize,
    ) -> Result<Vec<Record>>;

    /// Endpoint description for logging
    fn describe(&self) -> String;
}

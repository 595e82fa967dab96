//! In-memory governance source shared by the integration tests

#![allow(dead_code)]

use arx::adapters::graph::GovernanceSource;
use arx::core::export::ExportSettings;
use arx::core::export::{BatchConfig, OutputCategory};
use arx::core::transform::MergePrefixes;
use arx::domain::{ArxError, DefinitionId, GraphError, InstanceId, InstanceWindow, Record, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use tokio::sync::watch;

/// Which collection a request targeted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Definitions { status: String, skip: usize, top: usize },
    Instances { definition: String, skip: usize },
    Decisions { instance: String, skip: usize },
    Reviewers { instance: String, skip: usize },
}

/// Serves canned records, sliced by `skip`/`top` like the real API
#[derive(Default)]
pub struct FakeSource {
    pub definitions: HashMap<String, Vec<Value>>,
    pub instances: HashMap<String, Vec<Value>>,
    pub decisions: HashMap<String, Vec<Value>>,
    pub reviewers: HashMap<String, Vec<Value>>,
    /// Fail any instance listing for this definition id
    pub fail_instances_of: Option<String>,
    /// Raise the shutdown flag on the first contacted-reviewers request
    pub shutdown_on_reviewers: Option<watch::Sender<bool>>,
    pub calls: Mutex<Vec<Call>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_definitions(mut self, status: &str, records: Vec<Value>) -> Self {
        self.definitions.insert(status.to_string(), records);
        self
    }

    pub fn with_instances(mut self, definition: &str, records: Vec<Value>) -> Self {
        self.instances.insert(definition.to_string(), records);
        self
    }

    pub fn with_decisions(mut self, instance: &str, records: Vec<Value>) -> Self {
        self.decisions.insert(instance.to_string(), records);
        self
    }

    pub fn with_reviewers(mut self, instance: &str, records: Vec<Value>) -> Self {
        self.reviewers.insert(instance.to_string(), records);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn page(records: Option<&Vec<Value>>, skip: usize, top: usize) -> Vec<Value> {
    records
        .map(|r| r.iter().skip(skip).take(top).cloned().collect())
        .unwrap_or_default()
}

#[async_trait]
impl GovernanceSource for FakeSource {
    async fn list_definitions(&self, status: &str, skip: usize, top: usize) -> Result<Vec<Record>> {
        self.record(Call::Definitions {
            status: status.to_string(),
            skip,
            top,
        });
        Ok(page(self.definitions.get(status), skip, top))
    }

    async fn list_instances(
        &self,
        definition_id: &DefinitionId,
        skip: usize,
        top: usize,
    ) -> Result<Vec<Record>> {
        self.record(Call::Instances {
            definition: definition_id.to_string(),
            skip,
        });
        if self.fail_instances_of.as_deref() == Some(definition_id.as_str()) {
            return Err(ArxError::Graph(GraphError::from_status(
                503,
                "Service unavailable",
            )));
        }
        Ok(page(self.instances.get(definition_id.as_str()), skip, top))
    }

    async fn list_decisions(
        &self,
        _definition_id: &DefinitionId,
        instance_id: &InstanceId,
        skip: usize,
        top: usize,
    ) -> Result<Vec<Record>> {
        self.record(Call::Decisions {
            instance: instance_id.to_string(),
            skip,
        });
        Ok(page(self.decisions.get(instance_id.as_str()), skip, top))
    }

    async fn list_contacted_reviewers(
        &self,
        _definition_id: &DefinitionId,
        instance_id: &InstanceId,
        skip: usize,
        top: usize,
    ) -> Result<Vec<Record>> {
        self.record(Call::Reviewers {
            instance: instance_id.to_string(),
            skip,
        });
        if let Some(tx) = &self.shutdown_on_reviewers {
            let _ = tx.send(true);
        }
        Ok(page(self.reviewers.get(instance_id.as_str()), skip, top))
    }

    fn describe(&self) -> String {
        "fake".to_string()
    }
}

/// Settings for a 2024 window with the default statuses
pub fn settings(output_root: &Path, batch_size: usize, page_size: usize) -> ExportSettings {
    ExportSettings {
        output_root: output_root.to_path_buf(),
        window: InstanceWindow::parse("2024-01-01", "2024-12-31").unwrap(),
        statuses: vec!["InProgress".to_string(), "Completed".to_string()],
        page_size,
        batch: BatchConfig::new(batch_size, 10, false).unwrap(),
        prefixes: MergePrefixes::default(),
    }
}

pub fn definition(id: &str) -> Value {
    json!({
        "id": id,
        "displayName": format!("Review {id}"),
        "status": "InProgress",
        "scope": {"query": "/groups/g1/transitiveMembers", "queryType": "MicrosoftGraph"},
        "createdBy": {"id": "admin", "displayName": "Admin"}
    })
}

pub fn instance(id: &str, start: &str, end: &str) -> Value {
    json!({
        "id": id,
        "startDateTime": start,
        "endDateTime": end,
        "status": "Completed",
        "scope": {"query": "/groups/g1/transitiveMembers"}
    })
}

pub fn decision(id: &str) -> Value {
    json!({
        "id": id,
        "decision": "Approve",
        "justification": "Still needed",
        "principal": {"id": "u1", "displayName": "Pat", "userPrincipalName": "pat@contoso.com"},
        "reviewedBy": {"id": "r1", "displayName": "Robin"}
    })
}

pub fn reviewer(id: &str) -> Value {
    json!({
        "id": id,
        "displayName": "Robin",
        "userPrincipalName": "robin@contoso.com",
        "createdDateTime": "2024-02-01T00:00:00Z"
    })
}

/// Files written for a category, in index order
pub fn category_files(output_root: &Path, category: OutputCategory) -> Vec<std::path::PathBuf> {
    let dir = output_root.join(category.name());
    let mut files: Vec<_> = std::fs::read_dir(&dir)
        .map(|entries| entries.filter_map(|e| e.ok().map(|e| e.path())).collect())
        .unwrap_or_default();
    files.sort_by_key(|p| {
        p.file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.rsplit('_').next())
            .and_then(|n| n.parse::<u32>().ok())
            .unwrap_or(u32::MAX)
    });
    files
}

/// All records of a category, across files
pub fn category_records(output_root: &Path, category: OutputCategory) -> Vec<Value> {
    category_files(output_root, category)
        .iter()
        .flat_map(|path| {
            let text = std::fs::read_to_string(path).unwrap();
            serde_json::from_str::<Vec<Value>>(&text).unwrap()
        })
        .collect()
}

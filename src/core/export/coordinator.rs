//! Export coordinator - main orchestrator for the export process
//!
//! Walks definitions (per status) → instances → decisions and contacted
//! reviewers, page by page, feeding the three category buffers. The final
//! flush runs however the traversal ends.

use crate::adapters::graph::{GovernanceSource, GraphGovernanceClient};
use crate::config::{ArxConfig, ExportConfig};
use crate::core::export::batch::{BatchConfig, ExportSink};
use crate::core::export::category::OutputCategory;
use crate::core::export::pagination::PageCursor;
use crate::core::export::summary::{CategorySummary, ExportError, ExportErrorType, ExportSummary};
use crate::core::transform::{annotate_with_parents, flatten_record, merge_records, MergePrefixes};
use crate::domain::{
    ArxError, DefinitionId, GraphError, InstanceId, InstanceWindow, Record, Result, WindowDecision,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Resolved export parameters
#[derive(Debug, Clone)]
pub struct ExportSettings {
    /// Root directory for the category directories
    pub output_root: PathBuf,
    /// Instance selection window
    pub window: InstanceWindow,
    /// Definition statuses, processed in order
    pub statuses: Vec<String>,
    /// `$top` for every collection
    pub page_size: usize,
    /// Batch size, depth bound and dry-run flag
    pub batch: BatchConfig,
    /// Key prefixes for merged instance records
    pub prefixes: MergePrefixes,
}

impl ExportSettings {
    /// Resolve settings from the export section
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the window is missing or invalid,
    /// or any batching parameter is out of range.
    pub fn from_config(config: &ExportConfig) -> Result<Self> {
        let window = config.window().map_err(ArxError::Configuration)?;
        let prefixes = config.prefixes().map_err(ArxError::Configuration)?;
        let batch = BatchConfig::new(config.batch_size, config.max_depth, config.dry_run)
            .map_err(|e| ArxError::Configuration(e.to_string()))?;

        if config.definition_statuses.is_empty() {
            return Err(ArxError::Configuration(
                "At least one definition status is required".to_string(),
            ));
        }

        Ok(Self {
            output_root: PathBuf::from(&config.output_root),
            window,
            statuses: config.definition_statuses.clone(),
            page_size: config.page_size,
            batch,
            prefixes,
        })
    }
}

/// How a traversal ended without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Traversal {
    Completed,
    Interrupted,
}

/// A traversal error with the position it happened at
struct Failure {
    error: ArxError,
    context: String,
}

impl Failure {
    fn new(error: ArxError, context: String) -> Self {
        Self { error, context }
    }
}

/// Child collections fetched for every in-window instance
#[derive(Debug, Clone, Copy)]
enum Children {
    Decisions,
    Reviewers,
}

impl Children {
    fn category(self) -> OutputCategory {
        match self {
            Children::Decisions => OutputCategory::Decisions,
            Children::Reviewers => OutputCategory::Reviewers,
        }
    }
}

/// Export coordinator
pub struct ExportCoordinator {
    settings: ExportSettings,
    source: Arc<dyn GovernanceSource>,
    shutdown_signal: watch::Receiver<bool>,
}

impl ExportCoordinator {
    /// Create a coordinator backed by Microsoft Graph
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid export settings or an
    /// unusable Graph configuration.
    pub fn new(config: &ArxConfig, shutdown_signal: watch::Receiver<bool>) -> Result<Self> {
        let settings = ExportSettings::from_config(&config.export)?;
        let source: Arc<dyn GovernanceSource> =
            Arc::new(GraphGovernanceClient::new(&config.graph)?);
        Ok(Self::with_source(settings, source, shutdown_signal))
    }

    /// Create a coordinator over any governance source
    pub fn with_source(
        settings: ExportSettings,
        source: Arc<dyn GovernanceSource>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> Self {
        Self {
            settings,
            source,
            shutdown_signal,
        }
    }

    /// Resolved settings
    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Execute the export
    ///
    /// API failures end the traversal and are recorded in the summary; the
    /// records buffered up to that point are still written.
    ///
    /// # Errors
    ///
    /// Returns an error only if the output directories cannot be created.
    pub async fn execute_export(&self) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let mut summary = ExportSummary::new();
        summary.dry_run = self.settings.batch.dry_run;

        tracing::info!(
            source = %self.source.describe(),
            output_root = %self.settings.output_root.display(),
            window = %self.settings.window,
            statuses = ?self.settings.statuses,
            page_size = self.settings.page_size,
            batch_size = self.settings.batch.batch_size,
            dry_run = self.settings.batch.dry_run,
            "Starting export process"
        );

        let mut sink = ExportSink::open(&self.settings.output_root, &self.settings.batch)?;

        match self.traverse(&mut sink, &mut summary).await {
            Ok(Traversal::Completed) => {
                tracing::info!("Traversal completed");
            }
            Ok(Traversal::Interrupted) => {
                tracing::warn!("Shutdown signal received, stopping traversal");
                summary.interrupted = true;
            }
            Err(failure) => {
                tracing::error!(
                    error = %failure.error,
                    context = %failure.context,
                    "Traversal aborted"
                );
                summary.add_error(
                    ExportError::new(error_type(&failure.error), failure.error.to_string())
                        .with_context(failure.context),
                );
            }
        }

        let flushed = sink.finish();
        tracing::debug!(buffers = flushed.len(), "Final flush completed");

        for category in OutputCategory::ALL {
            let result = sink.buffer(category).result();
            for message in &result.errors {
                summary.add_error(
                    ExportError::new(ExportErrorType::Storage, message.clone())
                        .with_context(format!("category={category}")),
                );
            }
            summary.set_category(category, CategorySummary::from(result));
        }

        summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();

        Ok(summary)
    }

    fn is_shutdown(&self) -> bool {
        *self.shutdown_signal.borrow()
    }

    async fn traverse(
        &self,
        sink: &mut ExportSink,
        summary: &mut ExportSummary,
    ) -> std::result::Result<Traversal, Failure> {
        for status in &self.settings.statuses {
            tracing::info!(status = %status, "Exporting review definitions");

            let mut cursor = PageCursor::new(self.settings.page_size);
            loop {
                if self.is_shutdown() {
                    return Ok(Traversal::Interrupted);
                }

                let page = self
                    .source
                    .list_definitions(status, cursor.skip(), cursor.top())
                    .await
                    .map_err(|e| {
                        Failure::new(e, format!("status={status}, skip={}", cursor.skip()))
                    })?;
                summary.pages_fetched += 1;
                let received = page.len();

                for definition in &page {
                    if self.export_definition(definition, sink, summary).await?
                        == Traversal::Interrupted
                    {
                        return Ok(Traversal::Interrupted);
                    }
                }

                if !cursor.advance(received) {
                    break;
                }
            }
        }

        Ok(Traversal::Completed)
    }

    async fn export_definition(
        &self,
        definition: &Record,
        sink: &mut ExportSink,
        summary: &mut ExportSummary,
    ) -> std::result::Result<Traversal, Failure> {
        summary.definitions_processed += 1;

        let Some(definition_id) = DefinitionId::from_record(definition) else {
            tracing::warn!("Skipping review definition without an id");
            summary.definitions_skipped += 1;
            return Ok(Traversal::Completed);
        };

        tracing::debug!(definition_id = %definition_id, "Processing review definition");

        let flat_definition = flatten_record(definition);
        let mut cursor = PageCursor::new(self.settings.page_size);

        loop {
            if self.is_shutdown() {
                return Ok(Traversal::Interrupted);
            }

            let page = self
                .source
                .list_instances(&definition_id, cursor.skip(), cursor.top())
                .await
                .map_err(|e| {
                    Failure::new(
                        e,
                        format!("definition_id={definition_id}, skip={}", cursor.skip()),
                    )
                })?;
            summary.pages_fetched += 1;
            let received = page.len();

            for instance in &page {
                let Some(instance_id) = InstanceId::from_record(instance) else {
                    tracing::warn!(
                        definition_id = %definition_id,
                        "Skipping review instance without an id"
                    );
                    summary.instances_skipped += 1;
                    continue;
                };

                match self.settings.window.classify(instance) {
                    WindowDecision::Inside => {}
                    WindowDecision::Outside => {
                        tracing::debug!(
                            definition_id = %definition_id,
                            instance_id = %instance_id,
                            "Instance outside window, skipping"
                        );
                        summary.instances_skipped += 1;
                        continue;
                    }
                    WindowDecision::Undated => {
                        tracing::warn!(
                            definition_id = %definition_id,
                            instance_id = %instance_id,
                            "Instance has no parseable start or end date, skipping"
                        );
                        summary.instances_skipped += 1;
                        continue;
                    }
                }

                let merged = merge_records(
                    &flat_definition,
                    &flatten_record(instance),
                    &self.settings.prefixes,
                );
                sink.push(OutputCategory::Instances, merged);
                summary.instances_exported += 1;

                for children in [Children::Decisions, Children::Reviewers] {
                    if self
                        .export_children(children, &definition_id, &instance_id, sink, summary)
                        .await?
                        == Traversal::Interrupted
                    {
                        return Ok(Traversal::Interrupted);
                    }
                }
            }

            if !cursor.advance(received) {
                break;
            }
        }

        Ok(Traversal::Completed)
    }

    async fn export_children(
        &self,
        children: Children,
        definition_id: &DefinitionId,
        instance_id: &InstanceId,
        sink: &mut ExportSink,
        summary: &mut ExportSummary,
    ) -> std::result::Result<Traversal, Failure> {
        let category = children.category();
        let mut cursor = PageCursor::new(self.settings.page_size);

        loop {
            if self.is_shutdown() {
                return Ok(Traversal::Interrupted);
            }

            let fetched = match children {
                Children::Decisions => {
                    self.source
                        .list_decisions(definition_id, instance_id, cursor.skip(), cursor.top())
                        .await
                }
                Children::Reviewers => {
                    self.source
                        .list_contacted_reviewers(
                            definition_id,
                            instance_id,
                            cursor.skip(),
                            cursor.top(),
                        )
                        .await
                }
            };
            let page = fetched.map_err(|e| {
                Failure::new(
                    e,
                    format!(
                        "category={category}, definition_id={definition_id}, \
                         instance_id={instance_id}, skip={}",
                        cursor.skip()
                    ),
                )
            })?;
            summary.pages_fetched += 1;
            let received = page.len();

            for record in &page {
                let annotated =
                    annotate_with_parents(flatten_record(record), instance_id, definition_id);
                sink.push(category, annotated);
            }

            if !cursor.advance(received) {
                break;
            }
        }

        Ok(Traversal::Completed)
    }
}

/// Map a traversal error onto a summary category
fn error_type(error: &ArxError) -> ExportErrorType {
    match error {
        ArxError::Graph(GraphError::ConnectionFailed(_) | GraphError::Timeout(_)) => {
            ExportErrorType::Connection
        }
        ArxError::Graph(GraphError::AuthenticationFailed(_)) => ExportErrorType::Authentication,
        ArxError::Graph(_) => ExportErrorType::Query,
        ArxError::Io(_) => ExportErrorType::Storage,
        ArxError::Configuration(_) => ExportErrorType::Configuration,
        _ => ExportErrorType::Unknown,
    }
}

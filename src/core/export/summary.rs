//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use crate::core::export::batch::BatchResult;
use crate::core::export::category::OutputCategory;
use std::time::Duration;

/// Totals for one output category
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorySummary {
    /// Records written (or counted, in dry-run mode)
    pub records_written: usize,

    /// Files written
    pub files_written: usize,

    /// Records lost to failed file writes
    pub failed_records: usize,
}

impl From<&BatchResult> for CategorySummary {
    fn from(result: &BatchResult) -> Self {
        Self {
            records_written: result.records_written,
            files_written: result.files_written,
            failed_records: result.failed,
        }
    }
}

/// Summary of an export operation
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Review definitions fetched
    pub definitions_processed: usize,

    /// Review instances merged into the instances category
    pub instances_exported: usize,

    /// Review instances outside the window, undated, or without an id
    pub instances_skipped: usize,

    /// Definitions without a usable id
    pub definitions_skipped: usize,

    /// Pages requested from the governance API
    pub pages_fetched: usize,

    /// Per-category output totals
    pub instances: CategorySummary,
    pub decisions: CategorySummary,
    pub reviewers: CategorySummary,

    /// Duration of the export
    pub duration: Duration,

    /// Errors encountered during export
    pub errors: Vec<ExportError>,

    /// Traversal stopped early on a shutdown signal
    pub interrupted: bool,

    /// Dry run (no files written)
    pub dry_run: bool,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new() -> Self {
        Self {
            definitions_processed: 0,
            instances_exported: 0,
            instances_skipped: 0,
            definitions_skipped: 0,
            pages_fetched: 0,
            instances: CategorySummary::default(),
            decisions: CategorySummary::default(),
            reviewers: CategorySummary::default(),
            duration: Duration::from_secs(0),
            errors: Vec::new(),
            interrupted: false,
            dry_run: false,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add an error
    pub fn add_error(&mut self, error: ExportError) {
        self.errors.push(error);
    }

    /// Totals for a category
    pub fn category(&self, category: OutputCategory) -> &CategorySummary {
        match category {
            OutputCategory::Instances => &self.instances,
            OutputCategory::Decisions => &self.decisions,
            OutputCategory::Reviewers => &self.reviewers,
        }
    }

    /// Store the final totals of a category
    pub fn set_category(&mut self, category: OutputCategory, totals: CategorySummary) {
        match category {
            OutputCategory::Instances => self.instances = totals,
            OutputCategory::Decisions => self.decisions = totals,
            OutputCategory::Reviewers => self.reviewers = totals,
        }
    }

    /// Records written across all categories
    pub fn total_records(&self) -> usize {
        self.instances.records_written
            + self.decisions.records_written
            + self.reviewers.records_written
    }

    /// Files written across all categories
    pub fn total_files(&self) -> usize {
        self.instances.files_written + self.decisions.files_written + self.reviewers.files_written
    }

    /// Records lost to failed writes across all categories
    pub fn failed_records(&self) -> usize {
        self.instances.failed_records
            + self.decisions.failed_records
            + self.reviewers.failed_records
    }

    /// Check if the export was successful (no failures)
    pub fn is_successful(&self) -> bool {
        self.failed_records() == 0 && self.errors.is_empty()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            definitions = self.definitions_processed,
            instances_exported = self.instances_exported,
            instances_skipped = self.instances_skipped,
            pages = self.pages_fetched,
            records = self.total_records(),
            files = self.total_files(),
            failed_records = self.failed_records(),
            duration_secs = self.duration.as_secs(),
            interrupted = self.interrupted,
            dry_run = self.dry_run,
            "Export completed"
        );

        for category in OutputCategory::ALL {
            let totals = self.category(category);
            tracing::info!(
                category = %category,
                records = totals.records_written,
                files = totals.files_written,
                failed = totals.failed_records,
                "Category totals"
            );
        }

        if !self.errors.is_empty() {
            tracing::warn!(
                error_count = self.errors.len(),
                "Export completed with errors"
            );
            for error in &self.errors {
                tracing::warn!(
                    error_type = ?error.error_type,
                    message = %error.message,
                    context = error.context.as_deref().unwrap_or(""),
                    "Export error"
                );
            }
        }
    }
}

impl Default for ExportSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Type of export error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportErrorType {
    /// Graph API unreachable
    Connection,
    /// Token acquisition or authorization failure
    Authentication,
    /// Graph API returned an error or malformed page
    Query,
    /// Output file could not be written
    Storage,
    /// Configuration error
    Configuration,
    /// Unknown error
    Unknown,
}

/// Export error with context
#[derive(Debug, Clone)]
pub struct ExportError {
    /// Type of error
    pub error_type: ExportErrorType,

    /// Error message
    pub message: String,

    /// Optional context (e.g., definition id, output file)
    pub context: Option<String>,
}

impl ExportError {
    /// Create a new export error
    pub fn new(error_type: ExportErrorType, message: String) -> Self {
        Self {
            error_type,
            message,
            context: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: String) -> Self {
        self.context = Some(context);
        self
    }
}

//! Batch accumulation and flushing
//!
//! Every output category buffers flattened records in arrival order. When a
//! buffer reaches the configured batch size it is written as one
//! pretty-printed JSON array file, the category's file index advances, and the
//! buffer is cleared. [`ExportSink::finish`] writes whatever is left once the
//! traversal ends.

use crate::core::export::category::OutputCategory;
use crate::domain::{ArxError, FlatRecord, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Default number of records per output file
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Default nesting depth preserved in output files
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Configuration for batch processing
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Records per output file (>= 1)
    pub batch_size: usize,
    /// Nesting levels preserved below each record field (>= 1)
    pub max_depth: usize,
    /// Count records without writing any files
    pub dry_run: bool,
}

impl BatchConfig {
    /// Create a new batch configuration
    ///
    /// # Errors
    ///
    /// Returns a validation error when `batch_size` or `max_depth` is zero.
    pub fn new(batch_size: usize, max_depth: usize, dry_run: bool) -> Result<Self> {
        if batch_size == 0 {
            return Err(ArxError::Validation(
                "batch_size must be greater than 0".to_string(),
            ));
        }
        if max_depth == 0 {
            return Err(ArxError::Validation(
                "max_depth must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            batch_size,
            max_depth,
            dry_run,
        })
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
            dry_run: false,
        }
    }
}

/// Running totals for one category
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    /// Records written to files (or counted, in dry-run mode)
    pub records_written: usize,
    /// Files written (or that would have been written)
    pub files_written: usize,
    /// Records lost to failed file writes
    pub failed: usize,
    /// Errors encountered
    pub errors: Vec<String>,
}

impl BatchResult {
    /// Create a new empty batch result
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful flush
    pub fn add_written(&mut self, records: usize) {
        self.records_written += records;
        self.files_written += 1;
    }

    /// Record a failed flush
    pub fn add_failure(&mut self, records: usize, error: String) {
        self.failed += records;
        self.errors.push(error);
    }
}

/// What a single flush did
#[derive(Debug, Clone, PartialEq)]
pub enum FlushOutcome {
    /// Buffer was empty, nothing written
    Empty,
    /// File written
    Written { path: PathBuf, records: usize },
    /// Dry run: records counted, nothing written
    DryRun { records: usize },
    /// Write failed; the records were dropped
    Failed {
        path: PathBuf,
        records: usize,
        error: String,
    },
}

/// Accumulator for one output category
#[derive(Debug)]
pub struct CategoryBuffer {
    category: OutputCategory,
    directory: PathBuf,
    config: BatchConfig,
    next_index: u32,
    records: Vec<FlatRecord>,
    result: BatchResult,
}

impl CategoryBuffer {
    /// Open the buffer, creating `{output_root}/{category}` if needed
    ///
    /// Directory creation is skipped in dry-run mode.
    pub fn open(output_root: &Path, category: OutputCategory, config: BatchConfig) -> Result<Self> {
        let directory = output_root.join(category.name());

        if !config.dry_run {
            fs::create_dir_all(&directory).map_err(|e| {
                ArxError::Io(format!(
                    "Failed to create output directory {}: {}",
                    directory.display(),
                    e
                ))
            })?;
        }

        Ok(Self {
            category,
            directory,
            records: Vec::with_capacity(config.batch_size.min(DEFAULT_BATCH_SIZE)),
            config,
            next_index: 1,
            result: BatchResult::new(),
        })
    }

    /// Append a record, flushing when the batch size is reached
    ///
    /// Returns the flush outcome when a flush happened.
    pub fn push(&mut self, record: FlatRecord) -> Option<FlushOutcome> {
        let record = limit_record_depth(record, self.config.max_depth);
        self.records.push(record);

        if self.records.len() >= self.config.batch_size {
            Some(self.flush())
        } else {
            None
        }
    }

    /// Write out the buffered records, if any
    pub fn flush(&mut self) -> FlushOutcome {
        if self.records.is_empty() {
            return FlushOutcome::Empty;
        }

        let records = std::mem::take(&mut self.records);
        let count = records.len();

        if self.config.dry_run {
            tracing::debug!(
                category = %self.category,
                index = self.next_index,
                records = count,
                "Dry run: skipping batch write"
            );
            self.next_index += 1;
            self.result.add_written(count);
            return FlushOutcome::DryRun { records: count };
        }

        let path = self.directory.join(self.category.file_name(self.next_index));

        match write_batch(&path, &records) {
            Ok(()) => {
                tracing::info!(
                    category = %self.category,
                    path = %path.display(),
                    records = count,
                    "Wrote batch file"
                );
                self.next_index += 1;
                self.result.add_written(count);
                FlushOutcome::Written {
                    path,
                    records: count,
                }
            }
            Err(e) => {
                tracing::error!(
                    category = %self.category,
                    path = %path.display(),
                    records = count,
                    error = %e,
                    "Failed to write batch file, skipping"
                );
                let error = format!("Failed to write {}: {}", path.display(), e);
                self.result.add_failure(count, error.clone());
                FlushOutcome::Failed {
                    path,
                    records: count,
                    error,
                }
            }
        }
    }

    /// Category this buffer writes
    pub fn category(&self) -> OutputCategory {
        self.category
    }

    /// Directory receiving this category's files
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Index the next written file will carry
    pub fn next_index(&self) -> u32 {
        self.next_index
    }

    /// Number of buffered records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the buffer holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Totals so far
    pub fn result(&self) -> &BatchResult {
        &self.result
    }
}

/// The three category buffers of one export run
#[derive(Debug)]
pub struct ExportSink {
    instances: CategoryBuffer,
    decisions: CategoryBuffer,
    reviewers: CategoryBuffer,
}

impl ExportSink {
    /// Open all category buffers under `output_root`
    pub fn open(output_root: &Path, config: &BatchConfig) -> Result<Self> {
        Ok(Self {
            instances: CategoryBuffer::open(
                output_root,
                OutputCategory::Instances,
                config.clone(),
            )?,
            decisions: CategoryBuffer::open(
                output_root,
                OutputCategory::Decisions,
                config.clone(),
            )?,
            reviewers: CategoryBuffer::open(
                output_root,
                OutputCategory::Reviewers,
                config.clone(),
            )?,
        })
    }

    /// Append a record to a category
    pub fn push(&mut self, category: OutputCategory, record: FlatRecord) -> Option<FlushOutcome> {
        self.buffer_mut(category).push(record)
    }

    /// Flush every non-empty buffer
    ///
    /// Safe to call more than once: an emptied buffer is never written again.
    pub fn finish(&mut self) -> Vec<(OutputCategory, FlushOutcome)> {
        OutputCategory::ALL
            .iter()
            .filter(|c| !self.buffer(**c).is_empty())
            .copied()
            .collect::<Vec<_>>()
            .into_iter()
            .map(|c| (c, self.buffer_mut(c).flush()))
            .collect()
    }

    /// Buffer for a category
    pub fn buffer(&self, category: OutputCategory) -> &CategoryBuffer {
        match category {
            OutputCategory::Instances => &self.instances,
            OutputCategory::Decisions => &self.decisions,
            OutputCategory::Reviewers => &self.reviewers,
        }
    }

    fn buffer_mut(&mut self, category: OutputCategory) -> &mut CategoryBuffer {
        match category {
            OutputCategory::Instances => &mut self.instances,
            OutputCategory::Decisions => &mut self.decisions,
            OutputCategory::Reviewers => &mut self.reviewers,
        }
    }
}

fn write_batch(path: &Path, records: &[FlatRecord]) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(records)?;
    fs::write(path, bytes)?;
    Ok(())
}

fn limit_record_depth(record: FlatRecord, max_depth: usize) -> FlatRecord {
    record
        .into_iter()
        .map(|(k, v)| (k, limit_depth(v, max_depth)))
        .collect()
}

/// Replace containers nested deeper than `remaining` levels with their JSON text
///
/// Scalars and empty containers are never altered.
pub fn limit_depth(value: Value, remaining: usize) -> Value {
    match value {
        Value::Array(items) if !items.is_empty() => {
            if remaining == 0 {
                Value::String(Value::Array(items).to_string())
            } else {
                Value::Array(
                    items
                        .into_iter()
                        .map(|v| limit_depth(v, remaining - 1))
                        .collect(),
                )
            }
        }
        Value::Object(map) if !map.is_empty() => {
            if remaining == 0 {
                Value::String(Value::Object(map).to_string())
            } else {
                Value::Object(
                    map.into_iter()
                        .map(|(k, v)| (k, limit_depth(v, remaining - 1)))
                        .collect(),
                )
            }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn record(n: usize) -> FlatRecord {
        let mut map = FlatRecord::new();
        map.insert("id".to_string(), json!(format!("r{n}")));
        map.insert("seq".to_string(), json!(n));
        map
    }

    fn read_file(path: &Path) -> Vec<Value> {
        let text = fs::read_to_string(path).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn test_batch_config_rejects_zero() {
        assert!(BatchConfig::new(0, 10, false).is_err());
        assert!(BatchConfig::new(10, 0, false).is_err());
        let config = BatchConfig::new(500, 10, true).unwrap();
        assert_eq!(config.batch_size, 500);
        assert!(config.dry_run);
    }

    #[test]
    fn test_batch_config_default() {
        let config = BatchConfig::default();
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.max_depth, 10);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_open_creates_directory_idempotently() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("nested").join("out");

        let first = CategoryBuffer::open(&root, OutputCategory::Instances, BatchConfig::default());
        assert!(first.is_ok());
        assert!(root.join("ReviewInstances").is_dir());

        let second = CategoryBuffer::open(&root, OutputCategory::Instances, BatchConfig::default());
        assert!(second.is_ok());
    }

    #[test]
    fn test_below_threshold_does_not_flush() {
        let dir = TempDir::new().unwrap();
        let config = BatchConfig::new(5, 10, false).unwrap();
        let mut buffer =
            CategoryBuffer::open(dir.path(), OutputCategory::Decisions, config).unwrap();

        for n in 0..4 {
            assert!(buffer.push(record(n)).is_none());
        }

        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.next_index(), 1);
        assert_eq!(buffer.result().files_written, 0);
    }

    #[test]
    fn test_threshold_flushes_exactly_once() {
        let dir = TempDir::new().unwrap();
        let config = BatchConfig::new(5, 10, false).unwrap();
        let mut buffer =
            CategoryBuffer::open(dir.path(), OutputCategory::Decisions, config).unwrap();

        let outcomes: Vec<FlushOutcome> = (0..5).filter_map(|n| buffer.push(record(n))).collect();

        assert_eq!(outcomes.len(), 1);
        assert!(buffer.is_empty());
        assert_eq!(buffer.next_index(), 2);

        let path = dir
            .path()
            .join("ReviewInstanceDecisionItems")
            .join("ReviewInstanceDecisionItems_1.json");
        assert_eq!(
            outcomes[0],
            FlushOutcome::Written {
                path: path.clone(),
                records: 5
            }
        );

        let written = read_file(&path);
        let seqs: Vec<u64> = written.iter().map(|r| r["seq"].as_u64().unwrap()).collect();
        assert_eq!(seqs, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_flush_empty_is_noop() {
        let dir = TempDir::new().unwrap();
        let mut buffer =
            CategoryBuffer::open(dir.path(), OutputCategory::Reviewers, BatchConfig::default())
                .unwrap();

        assert_eq!(buffer.flush(), FlushOutcome::Empty);
        assert_eq!(buffer.next_index(), 1);
        let entries = fs::read_dir(buffer.directory()).unwrap().count();
        assert_eq!(entries, 0);
    }

    #[test]
    fn test_sink_finish_writes_residue_once() {
        let dir = TempDir::new().unwrap();
        let config = BatchConfig::new(4, 10, false).unwrap();
        let mut sink = ExportSink::open(dir.path(), &config).unwrap();

        for n in 0..10 {
            sink.push(OutputCategory::Instances, record(n));
        }
        sink.push(OutputCategory::Reviewers, record(99));

        let flushed = sink.finish();
        assert_eq!(flushed.len(), 2);
        assert!(sink.finish().is_empty());

        let instances = sink.buffer(OutputCategory::Instances).result();
        assert_eq!(instances.records_written, 10);
        assert_eq!(instances.files_written, 3);

        let total: usize = (1..=3)
            .map(|i| {
                read_file(
                    &dir.path()
                        .join("ReviewInstances")
                        .join(format!("ReviewInstances_{i}.json")),
                )
                .len()
            })
            .sum();
        assert_eq!(total, 10);

        assert_eq!(sink.buffer(OutputCategory::Decisions).result().files_written, 0);
        assert_eq!(sink.buffer(OutputCategory::Reviewers).result().records_written, 1);
    }

    #[test]
    fn test_write_failure_is_skipped() {
        let dir = TempDir::new().unwrap();
        let config = BatchConfig::new(2, 10, false).unwrap();
        let mut buffer =
            CategoryBuffer::open(dir.path(), OutputCategory::Instances, config).unwrap();

        // a directory squatting on the target file name makes the write fail
        fs::create_dir(buffer.directory().join("ReviewInstances_1.json")).unwrap();

        buffer.push(record(1));
        let outcome = buffer.push(record(2)).unwrap();

        assert!(matches!(outcome, FlushOutcome::Failed { records: 2, .. }));
        assert!(buffer.is_empty());
        assert_eq!(buffer.next_index(), 1);
        assert_eq!(buffer.result().failed, 2);
        assert_eq!(buffer.result().errors.len(), 1);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("dry");
        let config = BatchConfig::new(2, 10, true).unwrap();
        let mut sink = ExportSink::open(&root, &config).unwrap();

        for n in 0..3 {
            sink.push(OutputCategory::Decisions, record(n));
        }
        sink.finish();

        assert!(!root.exists());
        let result = sink.buffer(OutputCategory::Decisions).result();
        assert_eq!(result.records_written, 3);
        assert_eq!(result.files_written, 2);
    }

    #[test]
    fn test_limit_depth_truncates_deep_values() {
        let value = json!([[[1]]]);
        assert_eq!(limit_depth(value, 2), json!([["[1]"]]));
    }

    #[test]
    fn test_limit_depth_keeps_values_within_bound() {
        let value = json!({"a": [1, {"b": {"c": true}}], "e": {}});
        assert_eq!(limit_depth(value.clone(), 10), value);
    }

    #[test]
    fn test_written_records_round_trip() {
        let dir = TempDir::new().unwrap();
        let config = BatchConfig::new(1, 10, false).unwrap();
        let mut buffer =
            CategoryBuffer::open(dir.path(), OutputCategory::Reviewers, config).unwrap();

        let mut original = FlatRecord::new();
        original.insert("id".to_string(), json!("u1"));
        original.insert("score".to_string(), json!(0.75));
        original.insert("flags".to_string(), json!([true, null, "x"]));
        original.insert("meta".to_string(), json!({}));
        original.insert("nested".to_string(), json!([{"a": [1, 2, {"b": "c"}]}]));

        let outcome = buffer.push(original.clone()).unwrap();
        let FlushOutcome::Written { path, .. } = outcome else {
            panic!("expected a written file");
        };

        let back = read_file(&path);
        assert_eq!(back, vec![Value::Object(original)]);
    }
}

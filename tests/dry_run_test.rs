//! Integration tests for dry-run mode
//!
//! A dry run walks the whole traversal and counts what would be written
//! without creating any output directory or file.

mod common;

use arx::core::export::{BatchConfig, ExportCoordinator, ExportSettings, OutputCategory};
use arx::config::ExportConfig;
use common::{decision, definition, instance, reviewer, FakeSource};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::watch;

fn dry_run_settings(output: &TempDir, batch_size: usize) -> ExportSettings {
    let mut settings = common::settings(&output.path().join("out"), batch_size, 100);
    settings.batch = BatchConfig::new(batch_size, 10, true).unwrap();
    settings
}

#[test]
fn test_batch_config_dry_run_flag() {
    let config = BatchConfig::new(1000, 10, true).unwrap();
    assert!(config.dry_run);
    assert!(!BatchConfig::default().dry_run);
}

#[test]
fn test_export_config_dry_run_reaches_settings() {
    let config = ExportConfig {
        window_start: Some("2024-01-01".to_string()),
        window_end: Some("2024-12-31".to_string()),
        dry_run: true,
        ..Default::default()
    };

    let settings = ExportSettings::from_config(&config).unwrap();
    assert!(settings.batch.dry_run);
}

#[tokio::test]
async fn test_dry_run_counts_without_writing() {
    let output = TempDir::new().unwrap();
    let decisions = (1..=3).map(|n| decision(&format!("dec-{n}"))).collect();
    let source = Arc::new(
        FakeSource::new()
            .with_definitions("InProgress", vec![definition("d1")])
            .with_instances(
                "d1",
                vec![instance("i1", "2024-05-01T00:00:00Z", "2024-05-15T00:00:00Z")],
            )
            .with_decisions("i1", decisions)
            .with_reviewers("i1", vec![reviewer("rev-1")]),
    );
    let (_tx, rx) = watch::channel(false);

    let summary = ExportCoordinator::with_source(dry_run_settings(&output, 2), source, rx)
        .execute_export()
        .await
        .unwrap();

    assert!(summary.dry_run);
    assert!(summary.is_successful());
    assert_eq!(summary.instances_exported, 1);
    assert_eq!(summary.category(OutputCategory::Instances).records_written, 1);
    assert_eq!(summary.category(OutputCategory::Decisions).records_written, 3);
    // 3 decisions at batch size 2 would have produced two files
    assert_eq!(summary.category(OutputCategory::Decisions).files_written, 2);
    assert_eq!(summary.category(OutputCategory::Reviewers).records_written, 1);

    assert!(!output.path().join("out").exists());
}

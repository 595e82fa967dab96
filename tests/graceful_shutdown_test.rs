//! Integration tests for graceful shutdown
//!
//! The coordinator checks the shutdown flag before every page request. Once
//! it is raised no further pages are fetched, but everything already
//! buffered is written before the summary is returned.

mod common;

use arx::cli::commands::export::exit_code;
use arx::core::export::{ExportCoordinator, OutputCategory};
use common::{
    category_records, decision, definition, instance, reviewer, settings, Call, FakeSource,
};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::watch;

#[tokio::test]
async fn test_shutdown_signal_propagation() {
    let (shutdown_tx, shutdown_rx1) = watch::channel(false);
    let shutdown_rx2 = shutdown_rx1.clone();

    assert!(!*shutdown_rx1.borrow());

    shutdown_tx.send(true).unwrap();

    assert!(*shutdown_rx1.borrow());
    assert!(*shutdown_rx2.borrow());
}

#[tokio::test]
async fn test_shutdown_before_start_fetches_nothing() {
    let output = TempDir::new().unwrap();
    let source = Arc::new(FakeSource::new().with_definitions("InProgress", vec![definition("d1")]));
    let (tx, rx) = watch::channel(false);
    tx.send(true).unwrap();

    let settings = settings(output.path(), 1000, 100);
    let summary = ExportCoordinator::with_source(settings, source.clone(), rx)
        .execute_export()
        .await
        .unwrap();

    assert!(summary.interrupted);
    assert_eq!(summary.pages_fetched, 0);
    assert!(source.calls().is_empty());
    assert_eq!(exit_code(&summary), 130);
}

#[tokio::test]
async fn test_shutdown_mid_run_flushes_buffers() {
    let output = TempDir::new().unwrap();
    let (tx, rx) = watch::channel(false);

    let mut source = FakeSource::new()
        .with_definitions("InProgress", vec![definition("d1")])
        .with_instances(
            "d1",
            vec![
                instance("i1", "2024-04-01T00:00:00Z", "2024-04-30T00:00:00Z"),
                instance("i2", "2024-05-01T00:00:00Z", "2024-05-31T00:00:00Z"),
            ],
        )
        .with_decisions("i1", vec![decision("dec-1"), decision("dec-2")])
        .with_reviewers("i1", vec![reviewer("rev-1")])
        .with_decisions("i2", vec![decision("dec-3")]);
    source.shutdown_on_reviewers = Some(tx);
    let source = Arc::new(source);

    let settings = settings(output.path(), 1000, 100);
    let summary = ExportCoordinator::with_source(settings, source.clone(), rx)
        .execute_export()
        .await
        .unwrap();

    assert!(summary.interrupted);
    assert!(summary.errors.is_empty());
    assert_eq!(exit_code(&summary), 130);

    // i2 was merged before its first child request saw the flag
    assert_eq!(category_records(output.path(), OutputCategory::Instances).len(), 2);
    assert_eq!(category_records(output.path(), OutputCategory::Decisions).len(), 2);
    assert_eq!(category_records(output.path(), OutputCategory::Reviewers).len(), 1);
    assert_eq!(summary.total_records(), 5);

    let calls = source.calls();
    assert!(!calls.contains(&Call::Decisions {
        instance: "i2".to_string(),
        skip: 0
    }));
    assert!(!calls.iter().any(|call| matches!(
        call,
        Call::Definitions { status, .. } if status == "Completed"
    )));
}

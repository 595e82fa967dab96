//! Core business logic for Arx.
//!
//! # Modules
//!
//! - [`transform`] - Flattening, merging and parent annotation of records
//! - [`export`] - Traversal, batching and file output
//!
//! # Export Workflow
//!
//! 1. **List definitions** for each configured status, page by page
//! 2. **List instances** of each definition and keep those inside the window
//! 3. **Merge** each kept instance with its definition → `ReviewInstances`
//! 4. **List decisions and contacted reviewers** of each kept instance,
//!    annotate them with their parent ids → `ReviewInstanceDecisionItems`,
//!    `ReviewInstanceContactedReviewers`
//! 5. **Flush** a category whenever its buffer reaches the batch size, and
//!    once more at the end
//!
//! # Example
//!
//! ```rust,no_run
//! use arx::config::load_config;
//! use arx::core::export::ExportCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("arx.toml")?;
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! let coordinator = ExportCoordinator::new(&config, shutdown_rx)?;
//! let summary = coordinator.execute_export().await?;
//!
//! println!("Records: {}", summary.total_records());
//! println!("Files: {}", summary.total_files());
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod transform;

// Arx - Access Review Export for Microsoft Entra
// Copyright (c) 2025 Arx Contributors
// Licensed under the MIT License

//! # Arx - Access Review Export
//!
//! Arx pulls access review records from the Microsoft Graph identity
//! governance API and writes them as flattened, batched JSON files.
//!
//! ## Overview
//!
//! - **Extracting** review definitions, instances, decisions and contacted
//!   reviewers page by page over `$top`/`$skip`
//! - **Transforming** every record into a single-level map; instances are
//!   merged with their definition under `definition_`/`instance_` prefixes and
//!   child records are tagged with their parent ids
//! - **Loading** each category into numbered files of at most `batch_size`
//!   records
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Transformation and export traversal
//! - [`adapters`] - Microsoft Graph integration
//! - [`domain`] - Identifiers, record aliases, window, errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Transformation
//!
//! ```rust
//! use arx::core::transform::{flatten_record, merge_records, MergePrefixes};
//! use serde_json::json;
//!
//! let definition = flatten_record(&json!({"id": "d1", "scope": {"query": "/groups"}}));
//! let instance = flatten_record(&json!({"id": "i1", "status": "Completed"}));
//!
//! let merged = merge_records(&definition, &instance, &MergePrefixes::default());
//! assert_eq!(merged["definition_scope_query"], "/groups");
//! assert_eq!(merged["instance_status"], "Completed");
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`domain::Result`], an alias over
//! [`domain::ArxError`]:
//!
//! ```rust,no_run
//! use arx::domain::ArxError;
//!
//! fn example() -> Result<(), ArxError> {
//!     let config = arx::config::load_config("arx.toml")?;
//!     println!("{}", config.export.output_root);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;

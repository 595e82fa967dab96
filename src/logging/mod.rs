//! Logging and observability
//!
//! Structured `tracing` output to the console, plus an optional JSON log file
//! with rotation.
//!
//! # Example
//!
//! ```no_run
//! use arx::config::LoggingConfig;
//! use arx::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config)?;
//!
//! tracing::info!(category = "ReviewInstances", records = 1000, "Wrote batch file");
//! # Ok::<(), arx::domain::ArxError>(())
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard, LOG_FILE_NAME};

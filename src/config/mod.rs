//! Configuration management for Arx.
//!
//! Arx reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `ARX_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`GraphConfig`] - Microsoft Graph endpoint, credentials and retry policy
//! - [`ExportConfig`] - Output root, instance window, statuses, paging and batching
//! - [`LoggingConfig`] - Local JSON log file
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [graph]
//! tenant_id = "${ARX_TENANT_ID}"
//! client_id = "${ARX_CLIENT_ID}"
//! client_secret = "${ARX_CLIENT_SECRET}"
//!
//! [export]
//! output_root = "./output"
//! window_start = "2024-01-01"
//! window_end = "2024-06-30"
//! definition_statuses = ["InProgress", "Completed"]
//! ```
//!
//! ```rust,no_run
//! use arx::config::load_config;
//!
//! match load_config("arx.toml") {
//!     Ok(config) => println!("Exporting to {}", config.export.output_root),
//!     Err(e) => eprintln!("Configuration error: {}", e),
//! }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, ArxConfig, ExportConfig, GraphConfig, LoggingConfig, RetryConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};

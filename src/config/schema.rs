//! Configuration schema types
//!
//! This module defines the configuration structure for Arx.

use crate::config::SecretString;
use crate::core::export::batch::{DEFAULT_BATCH_SIZE, DEFAULT_MAX_DEPTH};
use crate::core::export::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::core::transform::merge::{
    MergePrefixes, DEFAULT_PRIMARY_PREFIX, DEFAULT_SECONDARY_PREFIX,
};
use crate::domain::InstanceWindow;
use serde::{Deserialize, Serialize};

/// Main Arx configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArxConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Microsoft Graph connection
    #[serde(default)]
    pub graph: GraphConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ArxConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.graph.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.backoff_multiplier < 1.0 {
            return Err(format!(
                "graph.retry.backoff_multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            ));
        }
        if self.initial_delay_ms > self.max_delay_ms {
            return Err(format!(
                "graph.retry.initial_delay_ms ({}) cannot exceed max_delay_ms ({})",
                self.initial_delay_ms, self.max_delay_ms
            ));
        }
        Ok(())
    }

    /// Delay before retry number `retry` (1-based)
    pub fn delay_ms(&self, retry: usize) -> u64 {
        let exponent = retry.saturating_sub(1) as i32;
        let delay = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(exponent);
        if delay.is_finite() {
            (delay as u64).min(self.max_delay_ms)
        } else {
            self.max_delay_ms
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Microsoft Graph configuration
///
/// Authenticate with either a pre-acquired `access_token` or the client
/// credentials flow (`tenant_id`, `client_id`, `client_secret`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Graph API root, e.g. `https://graph.microsoft.com/v1.0`
    #[serde(default = "default_graph_base_url")]
    pub base_url: String,

    /// Entra ID tenant
    #[serde(default)]
    pub tenant_id: Option<String>,

    /// App registration client ID
    #[serde(default)]
    pub client_id: Option<String>,

    /// App registration client secret
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub client_secret: Option<SecretString>,

    /// Pre-acquired bearer token; takes precedence over client credentials
    #[serde(default)]
    pub access_token: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,
}

impl GraphConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.base_url.is_empty() {
            return Err("graph.base_url cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("graph.base_url must start with http:// or https://".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("graph.timeout_seconds must be > 0".to_string());
        }

        let has_token = self
            .access_token
            .as_ref()
            .map(|t| !t.expose_secret().is_empty())
            .unwrap_or(false);

        if !has_token {
            let present = |v: &Option<String>| v.as_ref().map(|s| !s.is_empty()).unwrap_or(false);
            if !present(&self.tenant_id) {
                return Err(
                    "graph.tenant_id is required when graph.access_token is not set".to_string(),
                );
            }
            if !present(&self.client_id) {
                return Err(
                    "graph.client_id is required when graph.access_token is not set".to_string(),
                );
            }
            let has_secret = self
                .client_secret
                .as_ref()
                .map(|s| !s.expose_secret().is_empty())
                .unwrap_or(false);
            if !has_secret {
                return Err(
                    "graph.client_secret is required when graph.access_token is not set"
                        .to_string(),
                );
            }
        }

        self.retry.validate()?;
        Ok(())
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            base_url: default_graph_base_url(),
            tenant_id: None,
            client_id: None,
            client_secret: None,
            access_token: None,
            timeout_seconds: default_timeout_seconds(),
            retry: RetryConfig::default(),
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory receiving the three category directories
    #[serde(default = "default_output_root")]
    pub output_root: String,

    /// Window start (RFC 3339 or YYYY-MM-DD)
    #[serde(default)]
    pub window_start: Option<String>,

    /// Window end (RFC 3339 or YYYY-MM-DD, a bare date means end of day)
    #[serde(default)]
    pub window_end: Option<String>,

    /// Definition statuses to export, in processing order
    #[serde(default = "default_definition_statuses")]
    pub definition_statuses: Vec<String>,

    /// Records requested per page (`$top`)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Records per output file
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Nesting depth preserved in output records
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Dry run mode - traverse and count without writing files
    #[serde(default)]
    pub dry_run: bool,

    /// Prefix for definition fields on instance records
    #[serde(default = "default_primary_prefix")]
    pub primary_prefix: String,

    /// Prefix for instance fields on instance records
    #[serde(default = "default_secondary_prefix")]
    pub secondary_prefix: String,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.output_root.trim().is_empty() {
            return Err("export.output_root cannot be empty".to_string());
        }

        if self.definition_statuses.is_empty() {
            return Err("export.definition_statuses cannot be empty".to_string());
        }
        if self.definition_statuses.iter().any(|s| s.trim().is_empty()) {
            return Err("export.definition_statuses cannot contain empty values".to_string());
        }

        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(format!(
                "export.page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            ));
        }

        if self.batch_size == 0 {
            return Err("export.batch_size must be > 0".to_string());
        }

        if self.max_depth == 0 {
            return Err("export.max_depth must be > 0".to_string());
        }

        self.prefixes()?;

        if let (Some(_), Some(_)) = (&self.window_start, &self.window_end) {
            self.window()?;
        }

        Ok(())
    }

    /// Validated merge prefixes
    pub fn prefixes(&self) -> Result<MergePrefixes, String> {
        MergePrefixes::new(self.primary_prefix.clone(), self.secondary_prefix.clone())
            .map_err(|e| format!("export prefixes: {e}"))
    }

    /// Instance window from `window_start` and `window_end`
    ///
    /// # Errors
    ///
    /// Returns an error if either bound is missing or unparseable, or if
    /// start is after end.
    pub fn window(&self) -> Result<InstanceWindow, String> {
        let start = self
            .window_start
            .as_deref()
            .ok_or_else(|| "export.window_start is required".to_string())?;
        let end = self
            .window_end
            .as_deref()
            .ok_or_else(|| "export.window_end is required".to_string())?;
        InstanceWindow::parse(start, end).map_err(|e| format!("export window: {e}"))
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_root: default_output_root(),
            window_start: None,
            window_end: None,
            definition_statuses: default_definition_statuses(),
            page_size: default_page_size(),
            batch_size: default_batch_size(),
            max_depth: default_max_depth(),
            dry_run: false,
            primary_prefix: default_primary_prefix(),
            secondary_prefix: default_secondary_prefix(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err(
                "logging.local_path cannot be empty when local logging is enabled".to_string(),
            );
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_graph_base_url() -> String {
    "https://graph.microsoft.com/v1.0".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_output_root() -> String {
    "./output".to_string()
}

fn default_definition_statuses() -> Vec<String> {
    vec!["InProgress".to_string(), "Completed".to_string()]
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_primary_prefix() -> String {
    DEFAULT_PRIMARY_PREFIX.to_string()
}

fn default_secondary_prefix() -> String {
    DEFAULT_SECONDARY_PREFIX.to_string()
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ArxConfig;
use super::secret::secret_string;
use crate::domain::errors::ArxError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ArxConfig
/// 4. Applies environment variable overrides (ARX_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns a configuration error if the file cannot be read or parsed, a
/// referenced environment variable is not set, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use arx::config::loader::load_config;
///
/// let config = load_config("arx.toml")?;
/// # Ok::<(), arx::domain::ArxError>(())
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ArxConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ArxError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ArxError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let config = parse_config(&contents)?;

    config.validate().map_err(|e| {
        ArxError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Parse configuration text without validating it
///
/// Substitutes `${VAR}` placeholders and applies `ARX_*` overrides.
pub fn parse_config(contents: &str) -> Result<ArxConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: ArxConfig = toml::from_str(&contents)
        .map_err(|e| ArxError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ArxError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ArxError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the ARX_* prefix
///
/// Environment variables follow the pattern: ARX_<SECTION>_<KEY>
/// For example: ARX_GRAPH_TENANT_ID, ARX_EXPORT_BATCH_SIZE
fn apply_env_overrides(config: &mut ArxConfig) -> Result<()> {
    // Application
    if let Ok(val) = std::env::var("ARX_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Graph
    if let Ok(val) = std::env::var("ARX_GRAPH_BASE_URL") {
        config.graph.base_url = val;
    }
    if let Ok(val) = std::env::var("ARX_GRAPH_TENANT_ID") {
        config.graph.tenant_id = Some(val);
    }
    if let Ok(val) = std::env::var("ARX_GRAPH_CLIENT_ID") {
        config.graph.client_id = Some(val);
    }
    if let Ok(val) = std::env::var("ARX_GRAPH_CLIENT_SECRET") {
        config.graph.client_secret = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("ARX_GRAPH_ACCESS_TOKEN") {
        config.graph.access_token = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("ARX_GRAPH_TIMEOUT_SECONDS") {
        config.graph.timeout_seconds = parse_override("ARX_GRAPH_TIMEOUT_SECONDS", &val)?;
    }
    if let Ok(val) = std::env::var("ARX_GRAPH_RETRY_MAX_RETRIES") {
        config.graph.retry.max_retries = parse_override("ARX_GRAPH_RETRY_MAX_RETRIES", &val)?;
    }

    // Export
    if let Ok(val) = std::env::var("ARX_EXPORT_OUTPUT_ROOT") {
        config.export.output_root = val;
    }
    if let Ok(val) = std::env::var("ARX_EXPORT_WINDOW_START") {
        config.export.window_start = Some(val);
    }
    if let Ok(val) = std::env::var("ARX_EXPORT_WINDOW_END") {
        config.export.window_end = Some(val);
    }
    if let Ok(val) = std::env::var("ARX_EXPORT_DEFINITION_STATUSES") {
        config.export.definition_statuses = split_list(&val);
    }
    if let Ok(val) = std::env::var("ARX_EXPORT_PAGE_SIZE") {
        config.export.page_size = parse_override("ARX_EXPORT_PAGE_SIZE", &val)?;
    }
    if let Ok(val) = std::env::var("ARX_EXPORT_BATCH_SIZE") {
        config.export.batch_size = parse_override("ARX_EXPORT_BATCH_SIZE", &val)?;
    }
    if let Ok(val) = std::env::var("ARX_EXPORT_MAX_DEPTH") {
        config.export.max_depth = parse_override("ARX_EXPORT_MAX_DEPTH", &val)?;
    }
    if let Ok(val) = std::env::var("ARX_EXPORT_DRY_RUN") {
        config.export.dry_run = val.parse().unwrap_or(false);
    }

    // Logging
    if let Ok(val) = std::env::var("ARX_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("ARX_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("ARX_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

fn parse_override<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ArxError::Configuration(format!("Invalid value '{value}' for {name}")))
}

/// Split a comma separated list, dropping blanks
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

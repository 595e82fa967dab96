//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Arx configuration file.

use crate::config::load_config;
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                println!();
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Graph Endpoint: {}", config.graph.base_url);

        let uses_token = config
            .graph
            .access_token
            .as_ref()
            .map(|t| !t.expose_secret().is_empty())
            .unwrap_or(false);
        if uses_token {
            println!("  Authentication: static access token");
        } else {
            println!(
                "  Authentication: client credentials (tenant {})",
                config.graph.tenant_id.as_deref().unwrap_or("-")
            );
        }
        println!("  Max Retries: {}", config.graph.retry.max_retries);

        println!("  Output Root: {}", config.export.output_root);
        match config.export.window() {
            Ok(window) => println!("  Window: {window}"),
            Err(_) => println!("  Window: not set (pass --start and --end to export)"),
        }
        println!("  Statuses: {:?}", config.export.definition_statuses);
        println!("  Page Size: {}", config.export.page_size);
        println!("  Batch Size: {}", config.export.batch_size);
        println!("  Max Depth: {}", config.export.max_depth);
        println!(
            "  Prefixes: {} / {}",
            config.export.primary_prefix, config.export.secondary_prefix
        );
        println!("  Dry Run: {}", config.export.dry_run);
        println!();

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_validate_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[graph]\naccess_token = \"t\"").unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_validate_missing_file() {
        let code = ValidateArgs {}
            .execute("/nonexistent/arx.toml")
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}

//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "arx.toml")]
    pub output: String,

    /// Include every option with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Arx configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Create a .env file with your app registration:");
                println!("     - ARX_GRAPH_TENANT_ID");
                println!("     - ARX_GRAPH_CLIENT_ID");
                println!("     - ARX_GRAPH_CLIENT_SECRET");
                println!("  3. Validate configuration: arx validate-config");
                println!("  4. Run export: arx export --start 2024-01-01 --end 2024-06-30");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    fn generate_minimal_config() -> String {
        r#"# Arx Configuration File
# Access review export from Microsoft Graph

[application]
log_level = "info"

[graph]
tenant_id = "${ARX_GRAPH_TENANT_ID}"
client_id = "${ARX_GRAPH_CLIENT_ID}"
client_secret = "${ARX_GRAPH_CLIENT_SECRET}"

[export]
output_root = "./output"
definition_statuses = ["InProgress", "Completed"]
page_size = 100
batch_size = 1000

[logging]
local_enabled = false
"#
        .to_string()
    }

    fn generate_config_with_examples() -> String {
        r#"# Arx Configuration File
# Access review export from Microsoft Graph
#
# Values of the form ${VAR} are substituted from the environment (and .env).
# Any key can also be overridden with ARX_<SECTION>_<KEY>, e.g. ARX_EXPORT_BATCH_SIZE.

[application]
# trace | debug | info | warn | error (RUST_LOG takes precedence)
log_level = "info"

[graph]
# Graph API root; use /beta for preview fields
base_url = "https://graph.microsoft.com/v1.0"

# Client credentials flow. The app registration needs AccessReview.Read.All.
tenant_id = "${ARX_GRAPH_TENANT_ID}"
client_id = "${ARX_GRAPH_CLIENT_ID}"
client_secret = "${ARX_GRAPH_CLIENT_SECRET}"

# Alternatively a pre-acquired bearer token (takes precedence when set)
# access_token = "${ARX_GRAPH_ACCESS_TOKEN}"

# Per-request timeout
timeout_seconds = 60

[graph.retry]
# Retries on connection failures, timeouts, 429 and 5xx
max_retries = 3
initial_delay_ms = 1000
max_delay_ms = 30000
backoff_multiplier = 2.0

[export]
# Receives ReviewInstances/, ReviewInstanceDecisionItems/ and
# ReviewInstanceContactedReviewers/
output_root = "./output"

# Only instances whose whole review period lies inside the window are
# exported. RFC 3339 or YYYY-MM-DD; a bare end date means end of that day.
# Usually passed as --start / --end instead.
# window_start = "2024-01-01"
# window_end = "2024-06-30"

# Definition statuses, processed in this order
definition_statuses = ["InProgress", "Completed"]

# Records per Graph page ($top), 1-1000
page_size = 100

# Records per output file
batch_size = 1000

# Nested arrays/objects deeper than this are written as JSON text
max_depth = 10

# Count records without writing files
dry_run = false

# Key prefixes on merged instance records
primary_prefix = "definition_"
secondary_prefix = "instance_"

[logging]
# JSON log file in addition to console output
local_enabled = false
local_path = "./logs"
# daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArxConfig;
    use tempfile::TempDir;

    #[test]
    fn test_generate_minimal_config_parses() {
        let config: ArxConfig = toml::from_str(&InitArgs::generate_minimal_config()).unwrap();
        assert_eq!(config.export.batch_size, 1000);
        assert_eq!(
            config.graph.tenant_id.as_deref(),
            Some("${ARX_GRAPH_TENANT_ID}")
        );
    }

    #[test]
    fn test_generate_config_with_examples_parses() {
        let text = InitArgs::generate_config_with_examples();
        assert!(text.contains("# Arx Configuration File"));

        let config: ArxConfig = toml::from_str(&text).unwrap();
        assert_eq!(config.graph.retry.max_retries, 3);
        assert_eq!(config.export.max_depth, 10);
        assert_eq!(config.export.primary_prefix, "definition_");
    }

    #[tokio::test]
    async fn test_init_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("arx.toml");
        fs::write(&path, "existing").unwrap();

        let args = InitArgs {
            output: path.to_string_lossy().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "existing");

        let args = InitArgs { force: true, ..args };
        assert_eq!(args.execute().await.unwrap(), 0);
        assert!(fs::read_to_string(&path).unwrap().contains("[graph]"));
    }
}

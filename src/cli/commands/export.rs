//! Export command implementation
//!
//! This module implements the `export` command for exporting access review
//! records from Microsoft Graph to batched JSON files.

use crate::config::loader::split_list;
use crate::config::{load_config, ArxConfig};
use crate::core::export::{ExportCoordinator, ExportErrorType, ExportSummary, OutputCategory};
use clap::Args;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Dry run mode - traverse and count records without writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Override the output root directory
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<String>,

    /// Override the window start (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_name = "TS")]
    pub start: Option<String>,

    /// Override the window end (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_name = "TS")]
    pub end: Option<String>,

    /// Override definition statuses (comma-separated)
    #[arg(long, value_name = "STATUS,...")]
    pub status: Option<String>,

    /// Override records per output file
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Override records requested per page
    #[arg(long)]
    pub page_size: Option<usize>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let coordinator = match ExportCoordinator::new(&config, shutdown_signal) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create export coordinator");
                eprintln!("Failed to initialize export: {e}");
                return Ok(if e.is_configuration() { 2 } else { 4 });
            }
        };

        if config.export.dry_run {
            tracing::info!("Dry run mode enabled - no files will be written");
            println!("🔍 DRY RUN MODE - No files will be written");
            println!();
        }

        if !self.yes && !config.export.dry_run {
            let settings = coordinator.settings();
            println!("Export Configuration:");
            println!("  Graph: {}", config.graph.base_url);
            println!("  Output: {}", settings.output_root.display());
            println!("  Window: {}", settings.window);
            println!("  Statuses: {:?}", settings.statuses);
            println!("  Page size: {}", settings.page_size);
            println!("  Batch size: {}", settings.batch.batch_size);
            println!();
            print!("Proceed with export? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Export cancelled.");
                return Ok(0);
            }
        }

        tracing::info!("Executing export");
        println!("🚀 Starting export...");
        println!();

        let summary = match coordinator.execute_export().await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(5);
            }
        };

        print_summary(&summary);

        let code = exit_code(&summary);
        print_outcome(code);
        Ok(code)
    }

    fn apply_overrides(&self, config: &mut ArxConfig) {
        if let Some(output) = &self.output {
            tracing::info!(output = %output, "Overriding output root from CLI");
            config.export.output_root = output.clone();
        }
        if let Some(start) = &self.start {
            tracing::info!(start = %start, "Overriding window start from CLI");
            config.export.window_start = Some(start.clone());
        }
        if let Some(end) = &self.end {
            tracing::info!(end = %end, "Overriding window end from CLI");
            config.export.window_end = Some(end.clone());
        }
        if let Some(status) = &self.status {
            let statuses = split_list(status);
            tracing::info!(statuses = ?statuses, "Overriding definition statuses from CLI");
            config.export.definition_statuses = statuses;
        }
        if let Some(batch_size) = self.batch_size {
            config.export.batch_size = batch_size;
        }
        if let Some(page_size) = self.page_size {
            config.export.page_size = page_size;
        }
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.export.dry_run = true;
        }
    }
}

fn print_summary(summary: &ExportSummary) {
    println!();
    println!("📊 Export Summary:");
    println!("  Definitions: {}", summary.definitions_processed);
    println!("  Instances exported: {}", summary.instances_exported);
    println!("  Instances skipped: {}", summary.instances_skipped);
    println!("  Pages fetched: {}", summary.pages_fetched);
    for category in OutputCategory::ALL {
        let totals = summary.category(category);
        println!(
            "  {category}: {} records in {} files ({} failed)",
            totals.records_written, totals.files_written, totals.failed_records
        );
    }
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    if !summary.errors.is_empty() {
        println!("⚠️  Errors encountered:");
        for error in &summary.errors {
            println!("  - {:?}: {}", error.error_type, error.message);
            if let Some(context) = &error.context {
                println!("    Context: {context}");
            }
        }
        println!();
    }
}

/// Process exit code for a finished export
///
/// 130 interrupted, 4 nothing could be fetched because of a connection or
/// authentication failure, 1 completed with errors, 0 success.
pub fn exit_code(summary: &ExportSummary) -> i32 {
    if summary.interrupted {
        return 130;
    }

    let unreachable = summary.pages_fetched == 0
        && summary.errors.iter().any(|e| {
            matches!(
                e.error_type,
                ExportErrorType::Connection | ExportErrorType::Authentication
            )
        });

    if unreachable {
        4
    } else if summary.is_successful() {
        0
    } else {
        1
    }
}

fn print_outcome(code: i32) {
    match code {
        130 => {
            println!("⚠️  Export interrupted. Buffered records were written.");
            tracing::info!("Export interrupted by user signal");
        }
        4 => println!("❌ Could not reach Microsoft Graph"),
        0 => println!("✅ Export completed successfully!"),
        _ => println!("⚠️  Export completed with errors"),
    }
}

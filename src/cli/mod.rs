//! CLI interface and argument parsing

pub mod commands;

use crate::domain::ArxError;
use clap::{Parser, Subcommand};

/// Arx - access review export for Microsoft Entra
#[derive(Parser, Debug)]
#[command(name = "arx")]
#[command(version, about, long_about = None)]
#[command(author = "Arx Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "arx.toml", env = "ARX_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ARX_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export access review records to batched JSON files
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

/// Exit code for a failure before any command runs
pub fn startup_exit_code(err: &ArxError) -> i32 {
    if err.is_configuration() {
        2
    } else {
        5
    }
}

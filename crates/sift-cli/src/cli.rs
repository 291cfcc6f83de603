//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sift - Detect and suppress redundant data before it is stored.
#[derive(Debug, Parser)]
#[command(name = "sift")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "SIFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database file path (overrides configuration)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs and outcome names only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate and classify one item
    Ingest(IngestArgs),

    /// Classify every item of a JSON file
    Batch(BatchArgs),

    /// Run the built-in sample data set
    Demo(DemoArgs),

    /// List stored entries
    List(ListArgs),

    /// Show audit records, newest first
    Logs(LogsArgs),

    /// Show entry counts, redundancy rate and recent metrics
    Stats,
}

/// Arguments for the ingest command.
#[derive(Debug, Parser)]
pub struct IngestArgs {
    /// Content to classify
    pub content: String,

    /// Data type (text, number, mixed, boolean, date, datetime)
    #[arg(short = 't', long = "type", default_value = "text")]
    pub data_type: String,
}

/// Arguments for the batch command.
#[derive(Debug, Parser)]
pub struct BatchArgs {
    /// JSON file: an array of {"content": ..., "type": ...}
    pub file: PathBuf,

    /// Items classified concurrently
    #[arg(short, long, default_value = "1")]
    pub jobs: usize,
}

/// Arguments for the demo command.
#[derive(Debug, Parser)]
pub struct DemoArgs {
    /// Write to the configured database instead of a throwaway one
    #[arg(long)]
    pub persist: bool,
}

/// Arguments for the list command.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Only entries of this data type
    #[arg(short = 't', long = "type")]
    pub data_type: Option<String>,

    /// Maximum number of results
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

/// Arguments for the logs command.
#[derive(Debug, Parser)]
pub struct LogsArgs {
    /// Maximum number of records
    #[arg(short, long, default_value = "20")]
    pub limit: usize,

    /// Only failed classifications
    #[arg(long)]
    pub failed: bool,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

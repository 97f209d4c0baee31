//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Retailer - send crawl tasks to a supplier and persist extracted data
#[derive(Parser, Debug)]
#[command(
    name = "retailer",
    author,
    version,
    about = "Retailer service toolkit",
    long_about = "Companion tool for retailer services.\n\n\
                  Sends generated tasks to the supplier through the batching dispatch \n\
                  queue, pushes extracted data into the configured connector, and \n\
                  validates or inspects the layered configuration (file + environment)."
)]
pub struct Cli {
    /// Configuration file (TOML or JSON); defaults and environment only when omitted
    #[arg(short, long, global = true, env = "RETAILER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "RETAILER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format (overrides `logging.format`)
    #[arg(long, value_enum, global = true, env = "RETAILER_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Prometheus listener port (overrides `logging.metrics_port`)
    #[arg(long, global = true, env = "RETAILER_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate tasks from a JSON file and deliver them to the supplier
    Send(SendArgs),

    /// Push a JSON payload into the configured connector
    Push(PushArgs),

    /// Validate configuration without running
    Validate(ValidateArgs),

    /// Display effective configuration
    Info(InfoArgs),
}

/// Arguments for the `send` command
#[derive(Parser, Debug, Clone)]
pub struct SendArgs {
    /// JSON array of task specs (`url`, `priority`, `metadata`, `suitableAgents`, `globalId`)
    #[arg(short, long)]
    pub tasks: PathBuf,

    /// Log batches instead of sending them
    #[arg(long)]
    pub dry_run: bool,

    /// Give up waiting for delivery after this many seconds (0 = wait until drained)
    #[arg(long, default_value = "0", env = "RETAILER_SEND_TIMEOUT")]
    pub timeout: u64,

    /// Write tasks still undelivered at exit to this file
    #[arg(long)]
    pub undelivered: Option<PathBuf>,
}

/// Arguments for the `push` command
#[derive(Parser, Debug, Clone)]
pub struct PushArgs {
    /// JSON payload to persist
    #[arg(short, long)]
    pub data: PathBuf,

    /// Collection for non-object payloads
    #[arg(short, long, default_value = "data")]
    pub key: String,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for contracts::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

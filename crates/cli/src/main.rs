//! # Retailer CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - Task delivery to the supplier (`send`)
//! - Data persistence through the configured connector (`push`)
//! - Configuration validation and inspection

mod cli;
mod commands;
mod error;

use anyhow::{Context, Result};
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_info, run_push, run_send, run_validate};
use contracts::{ContractError, LoggingConfig, RetailerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logging settings come from the config, so load it first; errors are
    // reported once a subscriber exists
    let loaded = config_loader::ConfigLoader::load(cli.config.as_deref());

    observability::init_with_config(observability_config(&cli, loaded.as_ref().ok()))?;

    info!(version = env!("CARGO_PKG_VERSION"), "Retailer CLI starting");

    let result = execute(&cli, loaded).await;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

async fn execute(
    cli: &Cli,
    loaded: std::result::Result<RetailerConfig, ContractError>,
) -> Result<()> {
    if let Commands::Validate(args) = &cli.command {
        return run_validate(args, cli.config.as_deref(), loaded);
    }

    let config = loaded.with_context(|| match &cli.config {
        Some(path) => format!("Failed to load config from {}", path.display()),
        None => "Failed to load configuration from environment".to_string(),
    })?;

    match &cli.command {
        Commands::Send(args) => run_send(args, &config).await,
        Commands::Push(args) => run_push(args, &config).await,
        Commands::Info(args) => run_info(args, &config),
        Commands::Validate(_) => Ok(()),
    }
}

/// Merge the `[logging]` section with command-line flags
fn observability_config(cli: &Cli, config: Option<&RetailerConfig>) -> ObservabilityConfig {
    let mut observability = match config {
        Some(config) => ObservabilityConfig::from_logging(&config.logging),
        None => ObservabilityConfig::from_logging(&LoggingConfig::default()),
    };

    if cli.quiet {
        observability.default_log_level = "warn".to_string();
    } else if cli.verbose > 0 {
        observability.default_log_level = match cli.verbose {
            1 => "debug",
            _ => "trace",
        }
        .to_string();
    }
    if let Some(format) = cli.log_format {
        observability.log_format = format.into();
    }
    if cli.metrics_port.is_some() {
        observability.metrics_port = cli.metrics_port;
    }

    observability
}

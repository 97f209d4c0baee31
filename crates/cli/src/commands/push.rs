//! `push` command implementation.

use anyhow::{Context, Result};
use connector::{create_connector, DataConnector};
use contracts::RetailerConfig;
use serde_json::Value;
use tracing::info;

use super::read_json;
use crate::cli::PushArgs;
use crate::error::CliError;

/// Execute the `push` command
pub async fn run_push(args: &PushArgs, config: &RetailerConfig) -> Result<()> {
    let data: Value = read_json(&args.data)?;

    let connector = create_connector(&config.connector)
        .await
        .context("Failed to create connector")?;
    info!(
        connector = config.connector.connector_type.as_str(),
        file = %args.data.display(),
        key = %args.key,
        "Pushing data"
    );

    let report = connector.push(data, &args.key).await;

    if report.is_noop() {
        println!("Nothing to push: {} is empty", args.data.display());
        return Ok(());
    }

    println!(
        "✓ Wrote {} record(s) to {}",
        report.written,
        if report.keys.is_empty() {
            "-".to_string()
        } else {
            report.keys.join(", ")
        }
    );

    if report.failed_keys.is_empty() {
        Ok(())
    } else {
        println!("✗ Failed: {}", report.failed_keys.join(", "));
        Err(CliError::PushFailed {
            keys: report.failed_keys,
        }
        .into())
    }
}

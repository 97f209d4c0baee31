//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{ConnectorType, ContractError, RetailerConfig};
use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    service: String,
    supplier: String,
    batch_size: usize,
    connector: String,
}

/// Execute the `validate` command
///
/// `loaded` is the outcome of loading `path` with the environment overlay.
pub fn run_validate(
    args: &ValidateArgs,
    path: Option<&Path>,
    loaded: std::result::Result<RetailerConfig, ContractError>,
) -> Result<()> {
    let config_path = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(defaults + environment)".to_string());
    info!(config = %config_path, "Validating configuration");

    let result = validation_result(config_path, loaded);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validation_result(
    config_path: String,
    loaded: std::result::Result<RetailerConfig, ContractError>,
) -> ValidationResult {
    match loaded {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    service: config.service.name.clone(),
                    supplier: format!("{}{}", config.supplier.base_url, config.dispatch.path),
                    batch_size: config.dispatch.batch_size,
                    connector: config.connector.connector_type.as_str().to_string(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &RetailerConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.service.global_id.is_none() {
        warnings.push(
            "service.global_id is not set - tasks need an explicit globalId".to_string(),
        );
    }

    if config.supplier.api_key.is_none() {
        warnings.push("supplier.api_key is not set - requests are unauthenticated".to_string());
    }

    if config.connector.connector_type == ConnectorType::Json && config.connector.mongodb_url.is_some()
    {
        warnings.push("connector.mongodb_url is ignored by the json connector".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Service: {}", summary.service);
            println!("  Supplier: {}", summary.supplier);
            println!("  Batch size: {}", summary.batch_size);
            println!("  Connector: {}", summary.connector);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid_with_warnings() {
        let result = validation_result("x".into(), Ok(RetailerConfig::default()));

        assert!(result.valid);
        let warnings = result.warnings.unwrap();
        assert!(warnings.iter().any(|w| w.contains("global_id")));
        assert!(warnings.iter().any(|w| w.contains("api_key")));
        assert_eq!(result.summary.unwrap().supplier, "http://localhost:9099/apis/tasks");
    }

    #[test]
    fn test_load_error_is_invalid() {
        let result = validation_result(
            "x".into(),
            Err(ContractError::config_validation("dispatch.batch_size", "must be 1..=1000")),
        );

        assert!(!result.valid);
        assert!(result.error.unwrap().contains("batch_size"));

        let args = ValidateArgs { json: true };
        assert!(run_validate(
            &args,
            None,
            Err(ContractError::config_validation("service.name", "empty"))
        )
        .is_err());
    }
}

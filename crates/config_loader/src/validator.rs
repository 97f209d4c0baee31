//! Config validation
//!
//! Rules:
//! - service name not empty
//! - supplier base_url is an absolute http(s) URL
//! - request timeout > 0
//! - 1 <= batch_size <= 1000, dispatch path starts with '/'
//! - backoff_step_ms <= max_backoff_ms
//! - connector backend has what it needs (data_path / mongodb_url)

use contracts::{ConnectorType, ContractError, RetailerConfig};
use url::Url;

const MAX_BATCH_SIZE: usize = 1000;

/// Validate a RetailerConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &RetailerConfig) -> Result<(), ContractError> {
    validate_service(config)?;
    validate_supplier(config)?;
    validate_dispatch(config)?;
    validate_connector(config)?;
    Ok(())
}

fn validate_service(config: &RetailerConfig) -> Result<(), ContractError> {
    if config.service.name.trim().is_empty() {
        return Err(ContractError::config_validation(
            "service.name",
            "service name cannot be empty",
        ));
    }
    Ok(())
}

fn validate_supplier(config: &RetailerConfig) -> Result<(), ContractError> {
    let supplier = &config.supplier;
    let url = Url::parse(&supplier.base_url).map_err(|e| {
        ContractError::config_validation(
            "supplier.base_url",
            format!("invalid url '{}': {e}", supplier.base_url),
        )
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ContractError::config_validation(
            "supplier.base_url",
            format!("unsupported scheme '{}', expected http or https", url.scheme()),
        ));
    }

    if supplier.request_timeout_ms == 0 {
        return Err(ContractError::config_validation(
            "supplier.request_timeout_ms",
            "request timeout must be > 0",
        ));
    }
    Ok(())
}

fn validate_dispatch(config: &RetailerConfig) -> Result<(), ContractError> {
    let dispatch = &config.dispatch;

    if dispatch.batch_size == 0 || dispatch.batch_size > MAX_BATCH_SIZE {
        return Err(ContractError::config_validation(
            "dispatch.batch_size",
            format!(
                "batch_size must be within 1..={MAX_BATCH_SIZE}, got {}",
                dispatch.batch_size
            ),
        ));
    }

    if !dispatch.path.starts_with('/') {
        return Err(ContractError::config_validation(
            "dispatch.path",
            format!("path must start with '/', got '{}'", dispatch.path),
        ));
    }

    if dispatch.backoff_step_ms == 0 {
        return Err(ContractError::config_validation(
            "dispatch.backoff_step_ms",
            "backoff_step_ms must be greater than 0",
        ));
    }

    if dispatch.backoff_step_ms > dispatch.max_backoff_ms {
        return Err(ContractError::config_validation(
            "dispatch.backoff_step_ms / dispatch.max_backoff_ms",
            format!(
                "backoff_step_ms ({}) must be <= max_backoff_ms ({})",
                dispatch.backoff_step_ms, dispatch.max_backoff_ms
            ),
        ));
    }
    Ok(())
}

fn validate_connector(config: &RetailerConfig) -> Result<(), ContractError> {
    let connector = &config.connector;
    match connector.connector_type {
        ConnectorType::Json => {
            if connector.data_path.as_os_str().is_empty() {
                return Err(ContractError::config_validation(
                    "connector.data_path",
                    "data_path cannot be empty for the json connector",
                ));
            }
        }
        ConnectorType::Mongodb => {
            let url = connector.mongodb_url.as_deref().unwrap_or_default();
            if !url.starts_with("mongodb://") && !url.starts_with("mongodb+srv://") {
                return Err(ContractError::config_validation(
                    "connector.mongodb_url",
                    "a mongodb:// url is required for the mongodb connector",
                ));
            }
        }
    }
    Ok(())
}

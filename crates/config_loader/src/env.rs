//! Environment overlay
//!
//! Environment variables have the highest priority and replace file values.
//! The lookup is injected so tests never touch the process environment.

use contracts::{ConnectorType, ContractError, RetailerConfig};
use tracing::debug;

pub const SERVICE_NAME: &str = "SERVICE_NAME";
pub const GLOBAL_ID: &str = "GLOBAL_ID";
pub const BASE_URL: &str = "BITSKY_BASE_URL";
pub const API_KEY: &str = "ENGINE_API_KEY";
pub const REQUEST_TIMEOUT: &str = "REQUEST_TIMEOUT";
pub const LOG_LEVEL: &str = "LOG_LEVEL";
pub const DATA_PATH: &str = "DATA_PATH";
pub const CONNECTOR_TYPE: &str = "CONNECTOR_TYPE";
pub const MONGODB_URL: &str = "MONGODB_URL";
pub const MONGODB_HOST: &str = "MONGODB_HOST";
pub const MONGODB_PORT: &str = "MONGODB_PORT";
pub const MONGODB_NAME: &str = "MONGODB_NAME";
pub const MONGODB_USERNAME: &str = "MONGODB_USERNAME";
pub const MONGODB_PASSWORD: &str = "MONGODB_PASSWORD";

/// Apply environment overrides onto `config`
///
/// Empty values are treated as unset.
///
/// # Errors
/// Returns a validation error when a variable cannot be parsed
/// (`REQUEST_TIMEOUT`, `CONNECTOR_TYPE`).
pub fn apply_overrides<F>(config: &mut RetailerConfig, lookup: F) -> Result<(), ContractError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(name) = get(SERVICE_NAME) {
        config.service.name = name;
    }
    if let Some(id) = get(GLOBAL_ID) {
        config.service.global_id = Some(id);
    }
    if let Some(url) = get(BASE_URL) {
        config.supplier.base_url = url;
    }
    if let Some(key) = get(API_KEY) {
        config.supplier.api_key = Some(key);
    }
    if let Some(raw) = get(REQUEST_TIMEOUT) {
        config.supplier.request_timeout_ms = raw.trim().parse().map_err(|e| {
            ContractError::config_validation(REQUEST_TIMEOUT, format!("'{raw}' is not a number: {e}"))
        })?;
    }
    if let Some(level) = get(LOG_LEVEL) {
        config.logging.level = level;
    }
    if let Some(path) = get(DATA_PATH) {
        config.connector.data_path = path.into();
    }
    if let Some(raw) = get(CONNECTOR_TYPE) {
        config.connector.connector_type = ConnectorType::parse(&raw).ok_or_else(|| {
            ContractError::config_validation(
                CONNECTOR_TYPE,
                format!("unsupported connector '{raw}', expected json or mongodb"),
            )
        })?;
    }
    if let Some(url) = mongodb_url(&get) {
        config.connector.mongodb_url = Some(url);
    }

    debug!(
        service = %config.service.name,
        base_url = %config.supplier.base_url,
        connector = config.connector.connector_type.as_str(),
        "Environment overrides applied"
    );
    Ok(())
}

/// `MONGODB_URL`, or one assembled from its parts
///
/// Assembly needs at least `MONGODB_HOST` and `MONGODB_NAME`; credentials
/// are only used when both username and password are set.
fn mongodb_url<F>(get: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = get(MONGODB_URL) {
        return Some(url);
    }

    let host = get(MONGODB_HOST)?;
    let name = get(MONGODB_NAME)?;
    let address = match get(MONGODB_PORT) {
        Some(port) => format!("{host}:{port}"),
        None => host,
    };

    match (get(MONGODB_USERNAME), get(MONGODB_PASSWORD)) {
        (Some(user), Some(password)) => {
            Some(format!("mongodb://{user}:{password}@{address}/{name}"))
        }
        _ => Some(format!("mongodb://{address}/{name}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = RetailerConfig::default();
        config.supplier.base_url = "http://from-file:9099".into();

        apply_overrides(
            &mut config,
            lookup(&[
                (BASE_URL, "http://from-env:9099"),
                (GLOBAL_ID, "retailer.blog"),
                (REQUEST_TIMEOUT, "5000"),
                (CONNECTOR_TYPE, "MongoDB"),
                (MONGODB_URL, "mongodb://db:27017/blogs"),
            ]),
        )
        .unwrap();

        assert_eq!(config.supplier.base_url, "http://from-env:9099");
        assert_eq!(config.service.global_id.as_deref(), Some("retailer.blog"));
        assert_eq!(config.supplier.request_timeout_ms, 5000);
        assert_eq!(config.connector.connector_type, ConnectorType::Mongodb);
        assert_eq!(
            config.connector.mongodb_url.as_deref(),
            Some("mongodb://db:27017/blogs")
        );
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let mut config = RetailerConfig::default();
        apply_overrides(&mut config, lookup(&[(SERVICE_NAME, "  ")])).unwrap();
        assert_eq!(config.service.name, "retailer-sdk");
    }

    #[test]
    fn test_bad_timeout_rejected() {
        let mut config = RetailerConfig::default();
        let err = apply_overrides(&mut config, lookup(&[(REQUEST_TIMEOUT, "soon")])).unwrap_err();
        assert!(err.to_string().contains(REQUEST_TIMEOUT));
    }

    #[test]
    fn test_bad_connector_type_rejected() {
        let mut config = RetailerConfig::default();
        assert!(apply_overrides(&mut config, lookup(&[(CONNECTOR_TYPE, "redis")])).is_err());
    }

    #[test]
    fn test_mongodb_url_assembled_from_parts() {
        let get = lookup(&[
            (MONGODB_HOST, "db"),
            (MONGODB_PORT, "27017"),
            (MONGODB_NAME, "blogs"),
        ]);
        assert_eq!(
            mongodb_url(&get).as_deref(),
            Some("mongodb://db:27017/blogs")
        );

        let get = lookup(&[
            (MONGODB_HOST, "db"),
            (MONGODB_NAME, "blogs"),
            (MONGODB_USERNAME, "bob"),
            (MONGODB_PASSWORD, "secret"),
        ]);
        assert_eq!(
            mongodb_url(&get).as_deref(),
            Some("mongodb://bob:secret@db/blogs")
        );
    }

    #[test]
    fn test_mongodb_url_needs_host_and_name() {
        let get = lookup(&[(MONGODB_HOST, "db")]);
        assert_eq!(mongodb_url(&get), None);
    }

    #[test]
    fn test_explicit_url_wins_over_parts() {
        let get = lookup(&[
            (MONGODB_URL, "mongodb://primary/x"),
            (MONGODB_HOST, "db"),
            (MONGODB_NAME, "blogs"),
        ]);
        assert_eq!(mongodb_url(&get).as_deref(), Some("mongodb://primary/x"));
    }
}

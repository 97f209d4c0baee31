//! RetailerConfig - Config Loader output
//!
//! Every section has defaults so a partial (or absent) file is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Complete retailer service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetailerConfig {
    /// Service identity
    pub service: ServiceConfig,

    /// Remote supplier endpoint
    pub supplier: SupplierConfig,

    /// Dispatch queue tuning
    pub dispatch: DispatchSettings,

    /// Data persistence
    pub connector: ConnectorConfig,

    /// Logging and metrics
    pub logging: LoggingConfig,
}

/// Service identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Service name, sent as `x-bitsky-requested-with` and used in logs
    pub name: String,

    /// Global id of this retailer service, stamped on generated tasks
    pub global_id: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "retailer-sdk".to_string(),
            global_id: None,
        }
    }
}

/// Remote supplier endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplierConfig {
    /// Base URL of the supplier
    pub base_url: String,

    /// Security key sent as `x-bitsky-security-key`
    pub api_key: Option<String>,

    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for SupplierConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9099".to_string(),
            api_key: None,
            request_timeout_ms: 30_000,
        }
    }
}

impl SupplierConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Dispatch queue tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
    /// Path tasks are POSTed to
    pub path: String,

    /// Maximum tasks per request
    pub batch_size: usize,

    /// Backoff added after each failed attempt (ms)
    pub backoff_step_ms: u64,

    /// Backoff ceiling (ms)
    pub max_backoff_ms: u64,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            path: "/apis/tasks".to_string(),
            batch_size: 100,
            backoff_step_ms: 5_000,
            max_backoff_ms: 120_000,
        }
    }
}

/// Persistence backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorType {
    /// Single JSON document on disk
    #[default]
    Json,
    /// MongoDB, one collection per key
    Mongodb,
}

impl ConnectorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Mongodb => "mongodb",
        }
    }

    /// Parse the `CONNECTOR_TYPE` spelling
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "mongodb" => Some(Self::Mongodb),
            _ => None,
        }
    }
}

/// Data persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Backend type
    #[serde(rename = "type")]
    pub connector_type: ConnectorType,

    /// JSON store location (json backend)
    pub data_path: PathBuf,

    /// Connection string (mongodb backend)
    pub mongodb_url: Option<String>,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            connector_type: ConnectorType::Json,
            data_path: PathBuf::from("public/data.json"),
            mongodb_url: None,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

/// Logging and metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when RUST_LOG is unset
    pub level: String,

    pub format: LogFormat,

    /// Prometheus listener port (None = disabled)
    pub metrics_port: Option<u16>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: RetailerConfig = toml::from_str(
            r#"
[service]
global_id = "abcd"

[connector]
type = "mongodb"
mongodb_url = "mongodb://localhost:27017/retailer"
"#,
        )
        .unwrap();

        assert_eq!(config.service.global_id.as_deref(), Some("abcd"));
        assert_eq!(config.service.name, "retailer-sdk");
        assert_eq!(config.connector.connector_type, ConnectorType::Mongodb);
        assert_eq!(config.dispatch.batch_size, 100);
        assert_eq!(config.supplier.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_connector_type_parse() {
        assert_eq!(ConnectorType::parse("JSON"), Some(ConnectorType::Json));
        assert_eq!(ConnectorType::parse("mongodb"), Some(ConnectorType::Mongodb));
        assert_eq!(ConnectorType::parse("redis"), None);
    }
}

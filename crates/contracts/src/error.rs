//! Layered error definitions
//!
//! Categorized by source: config / transport / persistence

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    /// Invalid wiring (unsupported connector, missing handler, ...)
    #[error("configuration error: {message}")]
    Configuration { message: String },

    // ===== Transport Errors =====
    /// Outbound request failed (retryable)
    #[error(transparent)]
    Transport(#[from] TransportError),

    // ===== Persistence Errors =====
    /// Store unavailable or write failed (terminal per call)
    #[error("store '{store}' persistence error: {message}")]
    Persistence { store: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create configuration (wiring) error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create persistence error
    pub fn persistence(store: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Persistence {
            store: store.into(),
            message: message.into(),
        }
    }

    /// Whether the failure may succeed when retried later
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Request side of a failed outbound call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSummary {
    #[serde(rename = "baseURL")]
    pub base_url: String,
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
}

/// Response side of a failed outbound call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseSummary {
    pub headers: BTreeMap<String, String>,
}

/// Normalized failure of a `Transport::send`
///
/// `status` is `None` when no response arrived (connect error, timeout).
#[derive(Debug, Clone, Default, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("http send request fail: {message}")]
pub struct TransportError {
    pub message: String,
    pub status: Option<u16>,
    pub status_text: Option<String>,
    pub request: RequestSummary,
    pub response: ResponseSummary,
    pub data: Option<serde_json::Value>,
}

impl TransportError {
    /// Error raised before any response was received
    pub fn unreachable(request: RequestSummary, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            request,
            ..Default::default()
        }
    }
}

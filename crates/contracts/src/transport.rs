//! Transport trait - outbound request interface used by the dispatcher

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::Value;

use crate::{RequestSummary, TransportError};

/// One outbound request
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    /// Base URL of the remote service (e.g. `http://localhost:9099`)
    pub base_url: String,
    /// HTTP method, upper case
    pub method: String,
    /// Path appended to `base_url`
    pub path: String,
    pub headers: BTreeMap<String, String>,
    /// JSON body
    pub body: Value,
    /// Overrides the transport default timeout
    pub timeout: Option<Duration>,
}

impl OutboundRequest {
    /// Summary used in error reports
    pub fn summary(&self) -> RequestSummary {
        RequestSummary {
            base_url: self.base_url.clone(),
            method: self.method.clone(),
            url: self.path.clone(),
            headers: self.headers.clone(),
        }
    }
}

/// Normalized successful response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub data: Value,
    pub headers: BTreeMap<String, String>,
}

/// Outbound request trait
///
/// Implementations resolve with a normalized response or a typed error.
#[trait_variant::make(Transport: Send)]
pub trait LocalTransport {
    /// Transport name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Send one request
    ///
    /// # Errors
    /// Returns `TransportError` on network failure or non-success status
    async fn send(&self, request: &OutboundRequest) -> Result<TransportResponse, TransportError>;
}

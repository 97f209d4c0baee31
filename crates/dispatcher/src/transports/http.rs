//! HttpTransport - JSON over HTTP with reqwest

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, instrument};
use uuid::Uuid;

use contracts::{
    OutboundRequest, ResponseSummary, RetailerConfig, Transport, TransportError,
    TransportResponse,
};

use crate::error::DispatcherError;

/// Fresh UUID per request
pub const JOB_ID_HEADER: &str = "x-bitsky-job-id";
/// Name of the sending service
pub const REQUESTED_WITH_HEADER: &str = "x-bitsky-requested-with";
/// Supplier API key
pub const SECURITY_KEY_HEADER: &str = "x-bitsky-security-key";

/// Configuration for HttpTransport
#[derive(Debug, Clone, PartialEq)]
pub struct HttpTransportConfig {
    /// Sent as `x-bitsky-requested-with`
    pub service_name: String,
    /// Sent as `x-bitsky-security-key` when set
    pub api_key: Option<String>,
    /// Used when a request carries no timeout
    pub timeout: Duration,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            service_name: "retailer-sdk".to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl HttpTransportConfig {
    pub fn from_config(config: &RetailerConfig) -> Self {
        Self {
            service_name: config.service.name.clone(),
            api_key: config.supplier.api_key.clone(),
            timeout: config.supplier.request_timeout(),
        }
    }
}

/// Transport that sends requests over HTTP
pub struct HttpTransport {
    name: String,
    config: HttpTransportConfig,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a new HttpTransport
    pub fn new(
        name: impl Into<String>,
        config: HttpTransportConfig,
    ) -> Result<Self, DispatcherError> {
        let name = name.into();
        let client = reqwest::Client::builder()
            .user_agent(config.service_name.as_str())
            .build()
            .map_err(|e| DispatcherError::transport_creation(&name, e.to_string()))?;

        debug!(
            transport = %name,
            service = %config.service_name,
            timeout_ms = config.timeout.as_millis() as u64,
            "HttpTransport created"
        );

        Ok(Self {
            name,
            config,
            client,
        })
    }

    /// Request headers plus the per-request defaults
    fn headers_for(&self, request: &OutboundRequest) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        headers.insert(JOB_ID_HEADER.to_string(), Uuid::new_v4().to_string());
        headers.insert(
            REQUESTED_WITH_HEADER.to_string(),
            self.config.service_name.clone(),
        );
        if let Some(key) = &self.config.api_key {
            headers.insert(SECURITY_KEY_HEADER.to_string(), key.clone());
        }
        // Caller headers override defaults
        headers.extend(request.headers.clone());
        headers
    }

    fn url_for(request: &OutboundRequest) -> String {
        format!(
            "{}/{}",
            request.base_url.trim_end_matches('/'),
            request.path.trim_start_matches('/')
        )
    }

    fn failure(
        &self,
        request: &OutboundRequest,
        headers: &BTreeMap<String, String>,
        message: String,
    ) -> TransportError {
        let mut summary = request.summary();
        summary.headers = headers.clone();
        TransportError {
            message,
            request: summary,
            ..Default::default()
        }
    }
}

impl Transport for HttpTransport {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "http_transport_send",
        skip(self, request),
        fields(transport = %self.name, method = %request.method, path = %request.path)
    )]
    async fn send(&self, request: &OutboundRequest) -> Result<TransportResponse, TransportError> {
        let headers = self.headers_for(request);
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|e| self.failure(request, &headers, format!("invalid method: {e}")))?;

        let mut builder = self
            .client
            .request(method, Self::url_for(request))
            .timeout(request.timeout.unwrap_or(self.config.timeout))
            .json(&request.body);
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let err = self.failure(request, &headers, e.to_string());
                debug!(transport = %self.name, error = %err, "http send request fail");
                return Err(err);
            }
        };

        let status = response.status();
        let response_headers = header_map(response.headers());
        let data = match response.bytes().await {
            Ok(bytes) => parse_body(&bytes),
            Err(e) => {
                let mut err = self.failure(request, &headers, e.to_string());
                err.status = Some(status.as_u16());
                debug!(transport = %self.name, error = %err, "http read response fail");
                return Err(err);
            }
        };

        if !status.is_success() {
            let mut err = self.failure(
                request,
                &headers,
                format!("request failed with status code {}", status.as_u16()),
            );
            err.status = Some(status.as_u16());
            err.status_text = status.canonical_reason().map(str::to_string);
            err.response = ResponseSummary {
                headers: response_headers,
            };
            err.data = Some(data);
            debug!(
                transport = %self.name,
                status = status.as_u16(),
                error = %err,
                "http send request fail"
            );
            return Err(err);
        }

        debug!(transport = %self.name, status = status.as_u16(), "Request succeeded");
        Ok(TransportResponse {
            status: status.as_u16(),
            data,
            headers: response_headers,
        })
    }
}

fn header_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

/// JSON when possible, otherwise the raw text
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

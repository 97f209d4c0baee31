//! LogTransport - logs the request instead of sending it

use contracts::{OutboundRequest, Transport, TransportError, TransportResponse};
use tracing::{debug, info, instrument};

/// Transport that only logs; every send succeeds
pub struct LogTransport {
    name: String,
}

impl LogTransport {
    /// Create a new LogTransport with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn log_request_summary(&self, request: &OutboundRequest) {
        let tasks = request.body.as_array().map_or(0, Vec::len);

        info!(
            transport = %self.name,
            method = %request.method,
            base_url = %request.base_url,
            path = %request.path,
            tasks,
            "Dry run, request not sent"
        );
        debug!(transport = %self.name, body = %request.body, "Dry run body");
    }
}

impl Transport for LogTransport {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_transport_send",
        skip(self, request),
        fields(transport = %self.name, path = %request.path)
    )]
    async fn send(&self, request: &OutboundRequest) -> Result<TransportResponse, TransportError> {
        self.log_request_summary(request);
        Ok(TransportResponse {
            status: 200,
            ..Default::default()
        })
    }
}

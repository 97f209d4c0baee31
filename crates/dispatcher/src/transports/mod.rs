//! Transport implementations
//!
//! Contains HttpTransport and LogTransport.

mod http;
mod log;

pub use self::http::{
    HttpTransport, HttpTransportConfig, JOB_ID_HEADER, REQUESTED_WITH_HEADER, SECURITY_KEY_HEADER,
};
pub use self::log::LogTransport;

use contracts::{OutboundRequest, RetailerConfig, Transport, TransportError, TransportResponse};
use tracing::instrument;

use crate::error::DispatcherError;

/// Transport chosen at startup
pub enum AnyTransport {
    Http(HttpTransport),
    Log(LogTransport),
}

impl Transport for AnyTransport {
    fn name(&self) -> &str {
        match self {
            Self::Http(t) => t.name(),
            Self::Log(t) => t.name(),
        }
    }

    async fn send(&self, request: &OutboundRequest) -> Result<TransportResponse, TransportError> {
        match self {
            Self::Http(t) => t.send(request).await,
            Self::Log(t) => t.send(request).await,
        }
    }
}

/// Create the transport for a config
///
/// `dry_run` selects the log transport, nothing leaves the process.
#[instrument(
    name = "dispatcher_create_transport",
    skip(config),
    fields(base_url = %config.supplier.base_url)
)]
pub fn create_transport(
    config: &RetailerConfig,
    dry_run: bool,
) -> Result<AnyTransport, DispatcherError> {
    if dry_run {
        return Ok(AnyTransport::Log(LogTransport::new("log")));
    }
    HttpTransport::new("http", HttpTransportConfig::from_config(config)).map(AnyTransport::Http)
}

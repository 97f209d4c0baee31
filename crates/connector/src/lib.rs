//! # Connector
//!
//! Persistence of extracted data.
//!
//! Responsibilities:
//! - Normalize payloads into object records
//! - Append them to keyed collections through a `RecordStore`
//! - Never fail a push: failures are logged and counted
//!
//! Backends: a single JSON file, or MongoDB (feature `mongodb`, default on).

pub mod connector;
pub mod factory;
pub mod metrics;
pub mod normalize;
pub mod stores;

pub use connector::Connector;
pub use contracts::{DataConnector, PushReport, Record, RecordStore};
pub use factory::{create_connector, AnyConnector};
pub use metrics::{ConnectorMetrics, ConnectorSnapshot};
pub use normalize::{is_empty_payload, normalize};
pub use stores::JsonFileStore;
#[cfg(feature = "mongodb")]
pub use stores::MongoStore;

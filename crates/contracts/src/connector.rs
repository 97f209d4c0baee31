//! Connector traits - persistence interfaces
//!
//! `RecordStore` is the backend seam (append already-normalized records);
//! `DataConnector` is what service wiring calls.

use serde_json::Value;

use crate::{ContractError, Record};

/// Backend that owns a keyed collection store
#[trait_variant::make(RecordStore: Send)]
pub trait LocalRecordStore {
    /// Store name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Append records to the collection named `key`
    ///
    /// # Errors
    /// Returns a persistence error when the store is unavailable or the
    /// write fails. Other keys are unaffected.
    async fn append(&self, key: &str, records: Vec<Record>) -> Result<(), ContractError>;
}

/// Outcome of a push; failures are reported here and in logs, never raised
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushReport {
    /// Records written, across all keys
    pub written: usize,
    /// Keys that received at least one record
    pub keys: Vec<String>,
    /// Keys whose write failed
    pub failed_keys: Vec<String>,
}

impl PushReport {
    /// True when nothing was written and nothing failed
    pub fn is_noop(&self) -> bool {
        self.written == 0 && self.failed_keys.is_empty()
    }
}

/// Persistence trait used by the service
#[trait_variant::make(DataConnector: Send)]
pub trait LocalDataConnector {
    /// Connector name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Normalize `data` and append it to the store
    ///
    /// A JSON object is treated as several named result sets: each entry is
    /// stored under its own key and `key` is ignored. Never fails.
    async fn push(&self, data: Value, key: &str) -> PushReport;
}

//! Connector - normalizes payloads and appends them to a RecordStore

use std::sync::Arc;

use contracts::{DataConnector, PushReport, RecordStore, DEFAULT_COLLECTION};
use serde_json::Value;
use tracing::{debug, error, info, instrument};

use crate::metrics::{ConnectorMetrics, ConnectorSnapshot};
use crate::normalize::{is_empty_payload, normalize};

/// Generic connector over a store backend
pub struct Connector<S> {
    name: String,
    store: S,
    metrics: Arc<ConnectorMetrics>,
}

impl<S: RecordStore> Connector<S> {
    pub fn new(store: S) -> Self {
        Self {
            name: store.name().to_string(),
            store,
            metrics: Arc::new(ConnectorMetrics::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get current metrics
    pub fn metrics(&self) -> &Arc<ConnectorMetrics> {
        &self.metrics
    }

    pub fn snapshot(&self) -> ConnectorSnapshot {
        self.metrics.snapshot()
    }
}

/// `(key, value)` pairs a push writes
///
/// An object payload is a set of named results, one per entry. Entries
/// holding an empty payload are skipped by `push` like an empty top level.
fn split_by_key(data: Value, key: &str) -> Vec<(String, Value)> {
    match data {
        Value::Object(map) => map.into_iter().collect(),
        other => {
            let key = if key.is_empty() { DEFAULT_COLLECTION } else { key };
            vec![(key.to_string(), other)]
        }
    }
}

impl<S: RecordStore + Sync> DataConnector for Connector<S> {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "connector_push",
        skip(self, data),
        fields(connector = %self.name)
    )]
    async fn push(&self, data: Value, key: &str) -> PushReport {
        self.metrics.inc_pushes();
        let mut report = PushReport::default();

        if is_empty_payload(&data) {
            debug!(connector = %self.name, "Empty payload, nothing to push");
            return report;
        }

        for (key, value) in split_by_key(data, key) {
            if is_empty_payload(&value) {
                continue;
            }
            let records = normalize(value);
            if records.is_empty() {
                continue;
            }
            let count = records.len();

            match self.store.append(&key, records).await {
                Ok(()) => {
                    self.metrics.add_records_written(count);
                    observability::record_push(&self.name, &key, count);
                    report.written += count;
                    report.keys.push(key);
                }
                Err(e) => {
                    self.metrics.inc_failures();
                    observability::record_push_failure(&self.name, &key);
                    error!(
                        connector = %self.name,
                        key = %key,
                        records = count,
                        error = %e,
                        "Push data failed"
                    );
                    report.failed_keys.push(key);
                }
            }
        }

        info!(
            connector = %self.name,
            written = report.written,
            keys = ?report.keys,
            failed = ?report.failed_keys,
            "Push complete"
        );
        report
    }
}

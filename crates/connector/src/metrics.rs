//! Connector metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for a single connector
#[derive(Debug, Default)]
pub struct ConnectorMetrics {
    /// Push calls, including no-ops
    pushes: AtomicU64,
    /// Records appended
    records_written: AtomicU64,
    /// Failed key appends
    failures: AtomicU64,
}

impl ConnectorMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pushes(&self) -> u64 {
        self.pushes.load(Ordering::Relaxed)
    }

    pub fn inc_pushes(&self) {
        self.pushes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn records_written(&self) -> u64 {
        self.records_written.load(Ordering::Relaxed)
    }

    pub fn add_records_written(&self, count: usize) {
        self.records_written.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn inc_failures(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> ConnectorSnapshot {
        ConnectorSnapshot {
            pushes: self.pushes(),
            records_written: self.records_written(),
            failures: self.failures(),
        }
    }
}

/// Snapshot of connector metrics (for reporting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectorSnapshot {
    pub pushes: u64,
    pub records_written: u64,
    pub failures: u64,
}

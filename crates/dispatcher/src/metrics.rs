//! Dispatch metrics for observability

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use observability::{RunningStats, StatsSummary};

/// Metrics for one dispatch queue
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Tasks accepted by enqueue
    enqueued: AtomicU64,
    /// Tasks acknowledged by the supplier
    delivered: AtomicU64,
    /// Successful batch sends
    batches_sent: AtomicU64,
    /// Failed batch sends
    batches_failed: AtomicU64,
    /// Current queue length
    queue_len: AtomicUsize,
    /// Current retry delay
    backoff_ms: AtomicU64,
    /// Send round trip, successful and failed
    latency_ms: Mutex<RunningStats>,
}

impl DispatchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    pub fn add_enqueued(&self, count: usize) {
        self.enqueued.fetch_add(count as u64, Ordering::Relaxed);
        observability::record_tasks_enqueued(count);
    }

    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    pub fn batches_sent(&self) -> u64 {
        self.batches_sent.load(Ordering::Relaxed)
    }

    pub fn batches_failed(&self) -> u64 {
        self.batches_failed.load(Ordering::Relaxed)
    }

    /// Record one send attempt
    pub fn record_batch(&self, transport: &str, size: usize, success: bool, latency_ms: f64) {
        if success {
            self.batches_sent.fetch_add(1, Ordering::Relaxed);
            self.delivered.fetch_add(size as u64, Ordering::Relaxed);
        } else {
            self.batches_failed.fetch_add(1, Ordering::Relaxed);
        }
        self.latency_ms
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(latency_ms);

        observability::record_batch_dispatched(transport, size, success);
        observability::record_dispatch_latency_ms(latency_ms);
    }

    pub fn queue_len(&self) -> usize {
        self.queue_len.load(Ordering::Relaxed)
    }

    pub fn set_queue_len(&self, len: usize) {
        self.queue_len.store(len, Ordering::Relaxed);
        observability::record_queue_length(len);
    }

    pub fn backoff_ms(&self) -> u64 {
        self.backoff_ms.load(Ordering::Relaxed)
    }

    pub fn set_backoff_ms(&self, backoff_ms: u64) {
        self.backoff_ms.store(backoff_ms, Ordering::Relaxed);
        observability::record_backoff_ms(backoff_ms);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> DispatchSnapshot {
        DispatchSnapshot {
            enqueued: self.enqueued(),
            delivered: self.delivered(),
            batches_sent: self.batches_sent(),
            batches_failed: self.batches_failed(),
            queue_len: self.queue_len(),
            backoff_ms: self.backoff_ms(),
            latency_ms: self
                .latency_ms
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .summary(),
        }
    }
}

/// Snapshot of dispatch metrics (for reporting)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchSnapshot {
    pub enqueued: u64,
    pub delivered: u64,
    pub batches_sent: u64,
    pub batches_failed: u64,
    pub queue_len: usize,
    pub backoff_ms: u64,
    pub latency_ms: StatsSummary,
}

impl std::fmt::Display for DispatchSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tasks enqueued: {}", self.enqueued)?;
        writeln!(f, "Tasks delivered: {}", self.delivered)?;
        writeln!(
            f,
            "Batches: {} sent, {} failed",
            self.batches_sent, self.batches_failed
        )?;
        writeln!(f, "Queued: {}", self.queue_len)?;
        write!(f, "Send latency (ms): {}", self.latency_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_counts() {
        let metrics = DispatchMetrics::new();
        metrics.add_enqueued(150);
        metrics.record_batch("mock", 100, true, 12.0);
        metrics.record_batch("mock", 50, false, 30.0);
        metrics.set_queue_len(50);
        metrics.set_backoff_ms(5000);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.enqueued, 150);
        assert_eq!(snapshot.delivered, 100);
        assert_eq!(snapshot.batches_sent, 1);
        assert_eq!(snapshot.batches_failed, 1);
        assert_eq!(snapshot.queue_len, 50);
        assert_eq!(snapshot.backoff_ms, 5000);
        assert_eq!(snapshot.latency_ms.count, 2);
        assert!(snapshot.to_string().contains("Tasks delivered: 100"));
    }
}

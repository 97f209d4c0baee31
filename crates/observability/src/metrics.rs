//! Retailer metric recording
//!
//! Thin wrappers over the `metrics` macros so metric names live in one place.

use metrics::{counter, gauge, histogram};

/// Tasks accepted by `enqueue`
pub fn record_tasks_enqueued(count: usize) {
    counter!("retailer_tasks_enqueued_total").increment(count as u64);
}

/// Current queue length
pub fn record_queue_length(len: usize) {
    gauge!("retailer_dispatch_queue_length").set(len as f64);
}

/// One batch send attempt
pub fn record_batch_dispatched(transport: &str, size: usize, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "retailer_dispatch_batches_total",
        "transport" => transport.to_string(),
        "status" => status
    )
    .increment(1);

    if success {
        counter!("retailer_tasks_delivered_total").increment(size as u64);
    }
    histogram!("retailer_dispatch_batch_size").record(size as f64);
}

/// Round trip of one batch send
pub fn record_dispatch_latency_ms(latency_ms: f64) {
    histogram!("retailer_dispatch_latency_ms").record(latency_ms);
}

/// Current retry delay
pub fn record_backoff_ms(backoff_ms: u64) {
    gauge!("retailer_dispatch_backoff_ms").set(backoff_ms as f64);
}

/// Records appended under one key
pub fn record_push(connector: &str, key: &str, records: usize) {
    counter!(
        "retailer_connector_records_total",
        "connector" => connector.to_string(),
        "key" => key.to_string()
    )
    .increment(records as u64);
}

/// Failed append of one key
pub fn record_push_failure(connector: &str, key: &str) {
    counter!(
        "retailer_connector_push_failures_total",
        "connector" => connector.to_string(),
        "key" => key.to_string()
    )
    .increment(1);
}

/// Summary of a [`RunningStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn summary(&self) -> StatsSummary {
        StatsSummary::from(self)
    }
}

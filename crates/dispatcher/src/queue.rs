//! DispatchQueue - in-memory FIFO of tasks drained by a single worker

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use contracts::{RetailerConfig, Task, Transport};

use crate::metrics::{DispatchMetrics, DispatchSnapshot};
use crate::worker::drain_worker;

/// Smallest retry step the worker accepts
pub const MIN_BACKOFF_STEP: Duration = Duration::from_millis(1);

/// Dispatch queue configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchConfig {
    /// Supplier base URL
    pub base_url: String,
    /// Path batches are sent to
    pub path: String,
    /// HTTP method
    pub method: String,
    /// Maximum tasks per request
    pub batch_size: usize,
    /// Added to the delay after each failure
    pub backoff_step: Duration,
    /// Delay ceiling
    pub max_backoff: Duration,
    /// Extra request headers
    pub headers: BTreeMap<String, String>,
    /// Per-request timeout (None = transport default)
    pub timeout: Option<Duration>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self::from_config(&RetailerConfig::default())
    }
}

impl DispatchConfig {
    /// Clamp values the worker cannot run with
    ///
    /// A zero step would retry a failing batch without any delay.
    fn sanitized(mut self) -> Self {
        self.batch_size = self.batch_size.max(1);
        self.backoff_step = self.backoff_step.max(MIN_BACKOFF_STEP);
        self.max_backoff = self.max_backoff.max(self.backoff_step);
        self
    }

    /// Build from the `[supplier]` and `[dispatch]` sections
    pub fn from_config(config: &RetailerConfig) -> Self {
        Self {
            base_url: config.supplier.base_url.clone(),
            path: config.dispatch.path.clone(),
            method: "POST".to_string(),
            batch_size: config.dispatch.batch_size.max(1),
            backoff_step: Duration::from_millis(config.dispatch.backoff_step_ms.max(1)),
            max_backoff: Duration::from_millis(config.dispatch.max_backoff_ms.max(1)),
            headers: BTreeMap::new(),
            timeout: Some(config.supplier.request_timeout()),
        }
    }
}

/// Result of an enqueue call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnqueueSummary {
    /// Queue length after the append
    pub total_tasks: usize,
    /// Tasks appended by this call
    pub added: usize,
}

/// Observable queue state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchState {
    /// A drain is active (sending or waiting to retry)
    pub sending: bool,
    /// Delay applied before the next retry
    pub backoff: Duration,
    /// Tasks waiting in the buffer (excludes an in-flight batch)
    pub queued: usize,
}

impl DispatchState {
    pub fn is_idle(&self) -> bool {
        !self.sending && self.queued == 0
    }
}

/// State guarded by the queue mutex; never held across an await
#[derive(Debug, Default)]
pub(crate) struct QueueState {
    pub(crate) buffer: VecDeque<Task>,
    pub(crate) sending: bool,
    pub(crate) backoff: Duration,
}

impl QueueState {
    /// Remove up to `max` tasks from the front
    pub(crate) fn take_batch(&mut self, max: usize) -> Vec<Task> {
        let n = max.min(self.buffer.len());
        self.buffer.drain(..n).collect()
    }
}

/// Shared between the queue handle and its worker
#[derive(Debug, Default)]
pub(crate) struct Shared {
    state: Mutex<QueueState>,
    /// Wakes the worker when a drain starts
    pub(crate) wake: Notify,
    /// Fired each time the worker goes idle
    pub(crate) idle: Notify,
    pub(crate) cancel: CancellationToken,
    pub(crate) metrics: DispatchMetrics,
}

impl Shared {
    pub(crate) fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Owned dispatch queue
///
/// `enqueue` appends and returns immediately; exactly one worker task drains
/// the buffer in batches, retrying failed batches with additive backoff.
pub struct DispatchQueue {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl DispatchQueue {
    /// Create the queue and spawn its worker
    ///
    /// Must be called inside a Tokio runtime.
    pub fn spawn<T>(transport: T, config: DispatchConfig) -> Self
    where
        T: Transport + Sync + 'static,
    {
        let config = config.sanitized();
        let shared = Arc::new(Shared::default());
        let worker_shared = Arc::clone(&shared);

        info!(
            transport = transport.name(),
            base_url = %config.base_url,
            path = %config.path,
            batch_size = config.batch_size,
            "Dispatch queue started"
        );

        let worker = tokio::spawn(async move {
            drain_worker(transport, worker_shared, config).await;
        });

        Self {
            shared,
            worker: Some(worker),
        }
    }

    /// Append tasks to the tail and start a drain if none is active
    ///
    /// Never blocks on I/O and never fails.
    pub fn enqueue(&self, tasks: Vec<Task>) -> EnqueueSummary {
        let added = tasks.len();
        let (total_tasks, start) = {
            let mut state = self.shared.lock();
            state.buffer.extend(tasks);
            let start = !state.sending && !state.buffer.is_empty();
            if start {
                state.sending = true;
            }
            (state.buffer.len(), start)
        };

        self.shared.metrics.add_enqueued(added);
        self.shared.metrics.set_queue_len(total_tasks);
        if start {
            self.shared.wake.notify_one();
        }

        debug!(added, total_tasks, drain_started = start, "Tasks enqueued");
        EnqueueSummary { total_tasks, added }
    }

    /// Current state
    pub fn state(&self) -> DispatchState {
        let state = self.shared.lock();
        DispatchState {
            sending: state.sending,
            backoff: state.backoff,
            queued: state.buffer.len(),
        }
    }

    /// Get metrics snapshot
    pub fn metrics(&self) -> DispatchSnapshot {
        self.shared.metrics.snapshot()
    }

    /// Resolve once the buffer is empty and no drain is active
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.shared.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.state().is_idle() {
                return;
            }
            notified.await;
        }
    }

    /// Stop the worker and return every task that was not delivered
    ///
    /// A batch in flight or waiting for retry is put back on the tail first.
    #[instrument(name = "dispatch_queue_shutdown", skip(self))]
    pub async fn shutdown(mut self) -> Vec<Task> {
        self.shared.cancel.cancel();
        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.await {
                error!(error = ?e, "Dispatch worker panicked");
            }
        }

        let remaining: Vec<Task> = {
            let mut state = self.shared.lock();
            state.sending = false;
            state.backoff = Duration::ZERO;
            state.buffer.drain(..).collect()
        };
        self.shared.metrics.set_queue_len(0);

        info!(undelivered = remaining.len(), "Dispatch queue stopped");
        remaining
    }
}

impl Drop for DispatchQueue {
    fn drop(&mut self) {
        self.shared.cancel.cancel();
    }
}

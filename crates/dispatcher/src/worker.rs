//! Drain worker - the only task that removes tasks from a queue

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use contracts::{OutboundRequest, Task, Transport, TransportError};

use crate::queue::{DispatchConfig, Shared};

/// Worker loop
///
/// Idle until woken, then sends batches until the buffer is empty. A failed
/// batch is appended to the tail and the next attempt waits for the grown
/// backoff. Stops on cancellation, returning any held batch to the tail.
#[instrument(
    name = "dispatch_worker_loop",
    skip_all,
    fields(transport = %transport.name())
)]
pub(crate) async fn drain_worker<T: Transport>(
    transport: T,
    shared: Arc<Shared>,
    config: DispatchConfig,
) {
    debug!("Dispatch worker started");

    loop {
        let Some(batch) = next_batch(&shared, config.batch_size).await else {
            break;
        };

        let size = batch.len();
        let started = Instant::now();

        let result = match build_request(&config, &batch) {
            Ok(request) => tokio::select! {
                biased;
                _ = shared.cancel.cancelled() => {
                    requeue(&shared, batch);
                    break;
                }
                result = transport.send(&request) => result,
            },
            Err(e) => Err(TransportError {
                message: format!("encode batch: {e}"),
                ..TransportError::default()
            }),
        };
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        match result {
            Ok(response) => {
                let queued = {
                    let mut state = shared.lock();
                    state.backoff = Duration::ZERO;
                    state.buffer.len()
                };
                shared
                    .metrics
                    .record_batch(transport.name(), size, true, latency_ms);
                shared.metrics.set_backoff_ms(0);
                info!(
                    tasks = size,
                    status = response.status,
                    queued,
                    "Tasks sent to supplier"
                );
            }
            Err(e) => {
                let (delay, queued) = {
                    let mut state = shared.lock();
                    state.buffer.extend(batch);
                    state.backoff = (state.backoff + config.backoff_step).min(config.max_backoff);
                    (state.backoff, state.buffer.len())
                };
                shared
                    .metrics
                    .record_batch(transport.name(), size, false, latency_ms);
                shared.metrics.set_queue_len(queued);
                shared.metrics.set_backoff_ms(delay.as_millis() as u64);
                warn!(
                    tasks = size,
                    status = ?e.status,
                    error = %e,
                    retry_in_ms = delay.as_millis() as u64,
                    queued,
                    "Send tasks failed, batch returned to queue"
                );

                tokio::select! {
                    _ = shared.cancel.cancelled() => break,
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }
    }

    debug!("Dispatch worker stopped");
}

/// Wait until a batch is available
///
/// Marks the queue idle (and fires the idle notification) whenever the
/// buffer is found empty. Returns None on cancellation.
async fn next_batch(shared: &Shared, batch_size: usize) -> Option<Vec<Task>> {
    loop {
        let woken = shared.wake.notified();
        {
            let mut state = shared.lock();
            if !state.buffer.is_empty() {
                state.sending = true;
                let batch = state.take_batch(batch_size);
                shared.metrics.set_queue_len(state.buffer.len());
                return Some(batch);
            }
            if state.sending || !state.backoff.is_zero() {
                info!("Dispatch queue drained");
            }
            state.sending = false;
            state.backoff = Duration::ZERO;
        }
        shared.metrics.set_backoff_ms(0);
        shared.idle.notify_waiters();

        tokio::select! {
            _ = shared.cancel.cancelled() => return None,
            _ = woken => {}
        }
    }
}

fn requeue(shared: &Shared, batch: Vec<Task>) {
    let mut state = shared.lock();
    state.buffer.extend(batch);
    shared.metrics.set_queue_len(state.buffer.len());
}

fn build_request(
    config: &DispatchConfig,
    batch: &[Task],
) -> Result<OutboundRequest, serde_json::Error> {
    Ok(OutboundRequest {
        base_url: config.base_url.clone(),
        method: config.method.clone(),
        path: config.path.clone(),
        headers: config.headers.clone(),
        body: serde_json::to_value(batch)?,
        timeout: config.timeout,
    })
}

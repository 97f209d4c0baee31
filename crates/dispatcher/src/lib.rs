//! # Dispatcher
//!
//! Outbound task delivery.
//!
//! Responsibilities:
//! - Buffer tasks in an in-memory FIFO (`DispatchQueue`)
//! - Drain it in batches through a `Transport`
//! - Retry failed batches with additive backoff, never dropping a task

pub mod error;
pub mod metrics;
pub mod queue;
pub mod transports;
mod worker;

pub use contracts::{Task, Transport};
pub use error::DispatcherError;
pub use metrics::{DispatchMetrics, DispatchSnapshot};
pub use queue::{DispatchConfig, DispatchQueue, DispatchState, EnqueueSummary};
pub use transports::{
    create_transport, AnyTransport, HttpTransport, HttpTransportConfig, LogTransport,
};

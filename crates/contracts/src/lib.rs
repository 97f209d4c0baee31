//! # Contracts
//!
//! Frozen interface contracts shared by every retailer crate: the task and
//! record model, configuration types, the transport / store / connector
//! traits and the error taxonomy.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.

mod config;
mod connector;
mod error;
mod record;
mod task;
mod transport;

pub use config::*;
pub use connector::*;
pub use error::*;
pub use record::*;
pub use task::*;
pub use transport::*;

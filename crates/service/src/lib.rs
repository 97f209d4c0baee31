//! # Service
//!
//! Facade a retailer service is written against.
//!
//! - `TaskFactory` builds tasks owned by this service
//! - `RetailerService` forwards tasks to the supplier and persists data
//!
//! ```no_run
//! # async fn run(config: contracts::RetailerConfig) -> service::Result<()> {
//! use service::{Outcome, RetailerService, TaskSpec};
//!
//! let retailer = RetailerService::from_config(&config, false).await?;
//! let task = retailer.generate_task(TaskSpec::new("http://exampleblog.munew.io/"))?;
//! retailer.submit(Outcome {
//!     tasks: vec![task],
//!     ..Outcome::default()
//! });
//! retailer.wait_idle().await;
//! retailer.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod service;
pub mod task_factory;

pub use error::{Result, ServiceError};
pub use service::{Outcome, RetailerService, Submission};
pub use task_factory::{TaskFactory, TaskSpec, SCRIPT_KEY};

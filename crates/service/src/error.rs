//! Service error types

use thiserror::Error;

/// Errors raised while wiring or using a service
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No owner id given and none configured
    #[error("task for '{url}' has no owner: pass a global id or configure GLOBAL_ID")]
    MissingOwner { url: String },

    /// Transport setup failed
    #[error(transparent)]
    Dispatcher(#[from] dispatcher::DispatcherError),

    /// Error from contract
    #[error(transparent)]
    Contract(#[from] contracts::ContractError),
}

/// Result alias for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;

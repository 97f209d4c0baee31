//! Error types for CLI operations.

use std::path::Path;

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Input file missing or unreadable
    #[error("Failed to read {path}: {message}")]
    DataFile { path: String, message: String },

    /// Tasks left in the queue at exit
    #[error("{count} task(s) were not delivered")]
    Undelivered { count: usize },

    /// Keys the connector could not persist
    #[error("Failed to persist key(s): {}", keys.join(", "))]
    PushFailed { keys: Vec<String> },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn data_file(path: &Path, message: impl Into<String>) -> Self {
        Self::DataFile {
            path: path.display().to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

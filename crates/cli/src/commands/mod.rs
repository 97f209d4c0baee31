//! Command implementations.

mod info;
mod push;
mod send;
mod validate;

pub use info::run_info;
pub use push::run_push;
pub use send::run_send;
pub use validate::run_validate;

use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::{CliError, Result};

/// Read and deserialize a JSON input file
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        std::fs::read_to_string(path).map_err(|e| CliError::data_file(path, e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| CliError::data_file(path, e.to_string()))
}

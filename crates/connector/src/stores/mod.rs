//! Record store implementations
//!
//! Contains JsonFileStore and (feature `mongodb`) MongoStore.

mod json;
#[cfg(feature = "mongodb")]
mod mongo;

pub use self::json::JsonFileStore;
#[cfg(feature = "mongodb")]
pub use self::mongo::{MongoStore, DEFAULT_DATABASE};

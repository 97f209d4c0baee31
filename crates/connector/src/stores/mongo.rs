//! MongoStore - one MongoDB collection per key

use contracts::{ContractError, Record, RecordStore};
use mongodb::bson::{self, Document};
use mongodb::{Client, Database};
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

/// Database used when the connection string names none
pub const DEFAULT_DATABASE: &str = "retailer";

/// Store backed by MongoDB
///
/// Connects on first append and reuses the connection afterwards.
pub struct MongoStore {
    name: String,
    url: String,
    database: OnceCell<Database>,
}

impl MongoStore {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            database: OnceCell::new(),
        }
    }

    /// Connected database; connects on first call
    pub async fn database(&self) -> Result<&Database, ContractError> {
        self.database
            .get_or_try_init(|| async {
                let client = Client::with_uri_str(&self.url)
                    .await
                    .map_err(|e| self.error(format!("connect: {e}")))?;
                let database = client
                    .default_database()
                    .unwrap_or_else(|| client.database(DEFAULT_DATABASE));
                info!(store = %self.name, database = %database.name(), "Connected to MongoDB");
                Ok(database)
            })
            .await
    }

    fn error(&self, message: impl Into<String>) -> ContractError {
        ContractError::persistence(&self.name, message)
    }
}

impl RecordStore for MongoStore {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "mongo_store_append",
        skip(self, records),
        fields(store = %self.name, records = records.len())
    )]
    async fn append(&self, key: &str, records: Vec<Record>) -> Result<(), ContractError> {
        if records.is_empty() {
            return Ok(());
        }

        let documents = records
            .iter()
            .map(bson::to_document)
            .collect::<Result<Vec<Document>, _>>()
            .map_err(|e| self.error(format!("encode records for '{key}': {e}")))?;

        let result = self
            .database()
            .await?
            .collection::<Document>(key)
            .insert_many(documents)
            .await
            .map_err(|e| self.error(format!("insert into '{key}': {e}")))?;

        debug!(
            store = %self.name,
            key,
            inserted = result.inserted_ids.len(),
            "Records inserted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_empty_append_does_not_connect() {
        let store = MongoStore::new("mongodb", "not a connection string");
        store.append("data", Vec::new()).await.unwrap();
        assert!(store.database.get().is_none());
    }

    #[tokio::test]
    async fn test_bad_url_is_persistence_error() {
        let store = MongoStore::new("mongodb", "not a connection string");
        let record = json!({"title": "a"}).as_object().unwrap().clone();

        let err = store.append("blogs", vec![record]).await.unwrap_err();
        assert!(matches!(err, ContractError::Persistence { .. }));
        assert!(err.to_string().contains("connect"));
    }
}

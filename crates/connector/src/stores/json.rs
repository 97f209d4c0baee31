//! JsonFileStore - keyed collections in a single JSON document

use std::path::{Path, PathBuf};

use contracts::{ContractError, Record, RecordStore, DEFAULT_COLLECTION};
use serde_json::{Map, Value};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// Store backed by one JSON file: `{"<key>": [record, ...], ...}`
///
/// Every append rewrites the whole document through a temp file and a
/// rename. Appends through one instance are serialized; other processes
/// writing the same file are not coordinated with.
pub struct JsonFileStore {
    name: String,
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the store, creating `{"data": []}` (and parent dirs) if absent
    #[instrument(name = "json_store_open", skip(name, path), fields(path = %path.as_ref().display()))]
    pub async fn open(
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, ContractError> {
        let store = Self {
            name: name.into(),
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        };
        store.ensure_exists().await?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole document
    pub async fn load(&self) -> Result<Map<String, Value>, ContractError> {
        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.error(format!("read {}: {e}", self.path.display())))?;

        if content.trim().is_empty() {
            return Ok(default_document());
        }

        match serde_json::from_str(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(self.error("top level of the store must be an object")),
            Err(e) => Err(self.error(format!("parse {}: {e}", self.path.display()))),
        }
    }

    async fn ensure_exists(&self) -> Result<(), ContractError> {
        if fs::try_exists(&self.path).await? {
            return Ok(());
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        self.save(&default_document()).await?;
        info!(store = %self.name, path = %self.path.display(), "Created JSON store");
        Ok(())
    }

    async fn save(&self, document: &Map<String, Value>) -> Result<(), ContractError> {
        let bytes = serde_json::to_vec_pretty(document)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, bytes)
            .await
            .map_err(|e| self.error(format!("write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.error(format!("replace {}: {e}", self.path.display())))?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut file_name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "store.json".into());
        file_name.push(".tmp");
        self.path.with_file_name(file_name)
    }

    fn error(&self, message: impl Into<String>) -> ContractError {
        ContractError::persistence(&self.name, message)
    }
}

impl RecordStore for JsonFileStore {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "json_store_append",
        skip(self, records),
        fields(store = %self.name, records = records.len())
    )]
    async fn append(&self, key: &str, records: Vec<Record>) -> Result<(), ContractError> {
        if records.is_empty() {
            return Ok(());
        }

        let _guard = self.write_lock.lock().await;
        let mut document = self.load().await?;

        let collection = document
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        let Value::Array(items) = collection else {
            return Err(self.error(format!("key '{key}' does not hold an array")));
        };
        let added = records.len();
        items.extend(records.into_iter().map(Value::Object));
        let total = items.len();

        self.save(&document).await?;
        debug!(store = %self.name, key, added, total, "Records appended");
        Ok(())
    }
}

fn default_document() -> Map<String, Value> {
    let mut document = Map::new();
    document.insert(DEFAULT_COLLECTION.to_string(), Value::Array(Vec::new()));
    document
}

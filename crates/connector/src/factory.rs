//! Connector factory - picks the backend from configuration

use contracts::{ConnectorConfig, ConnectorType, ContractError, DataConnector, PushReport};
use serde_json::Value;
use tracing::{info, instrument};

use crate::connector::Connector;
use crate::metrics::ConnectorSnapshot;
use crate::stores::JsonFileStore;
#[cfg(feature = "mongodb")]
use crate::stores::MongoStore;

/// Connector chosen at startup
pub enum AnyConnector {
    Json(Connector<JsonFileStore>),
    #[cfg(feature = "mongodb")]
    Mongo(Connector<MongoStore>),
}

impl AnyConnector {
    pub fn connector_type(&self) -> ConnectorType {
        match self {
            Self::Json(_) => ConnectorType::Json,
            #[cfg(feature = "mongodb")]
            Self::Mongo(_) => ConnectorType::Mongodb,
        }
    }

    pub fn snapshot(&self) -> ConnectorSnapshot {
        match self {
            Self::Json(c) => c.snapshot(),
            #[cfg(feature = "mongodb")]
            Self::Mongo(c) => c.snapshot(),
        }
    }
}

impl DataConnector for AnyConnector {
    fn name(&self) -> &str {
        match self {
            Self::Json(c) => c.name(),
            #[cfg(feature = "mongodb")]
            Self::Mongo(c) => c.name(),
        }
    }

    async fn push(&self, data: Value, key: &str) -> PushReport {
        match self {
            Self::Json(c) => c.push(data, key).await,
            #[cfg(feature = "mongodb")]
            Self::Mongo(c) => c.push(data, key).await,
        }
    }
}

/// Create the connector selected by `config.connector_type`
///
/// # Errors
/// - JSON store file cannot be created
/// - mongodb selected without a URL, or without the `mongodb` feature
#[instrument(
    name = "connector_create",
    skip(config),
    fields(connector_type = config.connector_type.as_str())
)]
pub async fn create_connector(config: &ConnectorConfig) -> Result<AnyConnector, ContractError> {
    let connector = match config.connector_type {
        ConnectorType::Json => {
            let store = JsonFileStore::open("json", &config.data_path).await?;
            AnyConnector::Json(Connector::new(store))
        }
        ConnectorType::Mongodb => create_mongo(config)?,
    };

    info!(connector = connector.name(), "Connector created");
    Ok(connector)
}

#[cfg(feature = "mongodb")]
fn create_mongo(config: &ConnectorConfig) -> Result<AnyConnector, ContractError> {
    let url = config
        .mongodb_url
        .as_deref()
        .ok_or_else(|| ContractError::configuration("mongodb connector requires mongodb_url"))?;
    let store = MongoStore::new("mongodb", url);
    Ok(AnyConnector::Mongo(Connector::new(store)))
}

#[cfg(not(feature = "mongodb"))]
fn create_mongo(_config: &ConnectorConfig) -> Result<AnyConnector, ContractError> {
    Err(ContractError::configuration(
        "mongodb connector requested but this build has the `mongodb` feature disabled",
    ))
}

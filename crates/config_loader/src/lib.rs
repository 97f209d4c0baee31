//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Overlay environment variables
//! - Validate configuration legality
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load(Some(Path::new("retailer.toml"))).unwrap();
//! println!("Supplier: {}", config.supplier.base_url);
//! ```

pub mod env;
mod parser;
mod validator;

pub use contracts::RetailerConfig;
pub use parser::ConfigFormat;
pub use validator::validate;

use contracts::ContractError;
use std::path::Path;
use tracing::info;

/// Configuration loader
///
/// Provides static methods to load configuration from files, strings and
/// the process environment.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration the way the binary does
    ///
    /// Defaults, then the file at `path` (if any), then process environment.
    ///
    /// # Errors
    /// - File read / parse failure
    /// - Unparsable environment value
    /// - Validation failure
    pub fn load(path: Option<&Path>) -> Result<RetailerConfig, ContractError> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Same as [`ConfigLoader::load`] with an injected environment lookup
    pub fn load_with_env<F>(path: Option<&Path>, lookup: F) -> Result<RetailerConfig, ContractError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => {
                let format = Self::detect_format(path)?;
                let content = Self::read_file(path)?;
                parser::parse(&content, format)?
            }
            None => RetailerConfig::default(),
        };

        env::apply_overrides(&mut config, lookup)?;
        validator::validate(&config)?;

        info!(
            source = %path.map(|p| p.display().to_string()).unwrap_or_else(|| "defaults".into()),
            service = %config.service.name,
            connector = config.connector.connector_type.as_str(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Load configuration from file path, without environment overrides
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<RetailerConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<RetailerConfig, ContractError> {
        Self::parse_and_validate(content, format)
    }

    /// Serialize RetailerConfig to TOML string
    pub fn to_toml(config: &RetailerConfig) -> Result<String, ContractError> {
        toml::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize RetailerConfig to JSON string
    pub fn to_json(config: &RetailerConfig) -> Result<String, ContractError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }

    /// Parse and validate configuration content
    fn parse_and_validate(
        content: &str,
        format: ConfigFormat,
    ) -> Result<RetailerConfig, ContractError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::ConnectorType;
    use std::io::Write;

    const MINIMAL_TOML: &str = r#"
[service]
name = "blog-retailer"
global_id = "blog.retailer"

[supplier]
base_url = "http://supplier:9099"
api_key = "k-123"

[dispatch]
batch_size = 20

[connector]
type = "json"
data_path = "public/blogs.json"

[logging]
level = "debug"
format = "json"
"#;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_load_from_str_toml() {
        let result = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.service.name, "blog-retailer");
        assert_eq!(config.dispatch.batch_size, 20);
    }

    #[test]
    fn test_round_trip_toml() {
        let config = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let serialized = ConfigLoader::to_toml(&config).unwrap();
        let config2 = ConfigLoader::load_from_str(&serialized, ConfigFormat::Toml).unwrap();
        assert_eq!(config, config2);
    }

    #[test]
    fn test_round_trip_json() {
        let config = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let json = ConfigLoader::to_json(&config).unwrap();
        let config2 = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(config, config2);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let content = r#"
[supplier]
base_url = "not a url"
"#;
        let result = ConfigLoader::load_from_str(content, ConfigFormat::Toml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("supplier.base_url"));
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = ConfigLoader::load_with_env(None, no_env).unwrap();
        assert_eq!(config, RetailerConfig::default());
    }

    #[test]
    fn test_env_beats_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(MINIMAL_TOML.as_bytes()).unwrap();

        let config = ConfigLoader::load_with_env(Some(file.path()), |key| match key {
            env::BASE_URL => Some("https://supplier.prod".to_string()),
            env::DATA_PATH => Some("/var/lib/retailer/data.json".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.supplier.base_url, "https://supplier.prod");
        assert_eq!(config.supplier.api_key.as_deref(), Some("k-123"));
        assert_eq!(
            config.connector.data_path.to_str(),
            Some("/var/lib/retailer/data.json")
        );
    }

    #[test]
    fn test_env_validated_after_overlay() {
        let result = ConfigLoader::load_with_env(None, |key| match key {
            env::CONNECTOR_TYPE => Some("mongodb".to_string()),
            _ => None,
        });
        assert!(result.is_err());

        let config = ConfigLoader::load_with_env(None, |key| match key {
            env::CONNECTOR_TYPE => Some("mongodb".to_string()),
            env::MONGODB_HOST => Some("localhost".to_string()),
            env::MONGODB_NAME => Some("retailer".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.connector.connector_type, ConnectorType::Mongodb);
        assert_eq!(
            config.connector.mongodb_url.as_deref(),
            Some("mongodb://localhost/retailer")
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let err = ConfigLoader::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }
}

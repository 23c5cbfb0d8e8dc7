use crate::error::{Result, WarehouseError};
use crate::validate::ValidationMode;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Top-level configuration, loaded from a TOML file and passed explicitly
/// into the components that need it.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub api_sources: Vec<ApiSourceConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Directory containing the source CSV files
    pub data_dir: String,
    /// How the validator handles invalid rows: "strict", "filter" or "flag"
    pub validation_mode: ValidationMode,
}

/// A REST API source to pull raw records from during ingestion
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSourceConfig {
    pub name: String,
    /// Which raw table the records land in: "customers", "products" or "orders"
    pub entity: String,
    pub base_url: String,
    pub endpoint: String,
    /// Key holding the record array when the response is an envelope object
    pub data_key: Option<String>,
    /// Key holding the next-page URL when the endpoint paginates
    pub pagination_key: Option<String>,
    /// Delay between paginated requests
    #[serde(default = "default_delay_ms")]
    pub rate_limit_delay_ms: u64,
}

fn default_delay_ms() -> u64 {
    500
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            validation_mode: ValidationMode::Filter,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ingest: IngestConfig::default(),
            api_sources: Vec::new(),
        }
    }
}

impl Config {
    pub fn load(config_path: &str) -> Result<Self> {
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            WarehouseError::Config(format!("Failed to read config file '{}': {}", config_path, e))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }

    /// Loads the config file if present, otherwise falls back to defaults.
    pub fn load_or_default(config_path: &str) -> Result<Self> {
        if Path::new(config_path).exists() {
            Self::load(config_path)
        } else {
            Ok(Self::default())
        }
    }
}

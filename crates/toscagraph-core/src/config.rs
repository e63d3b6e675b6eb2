use crate::{Result, ToscaGraphError};
use config as cfg;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the graph store server.
    #[serde(default = "StoreConfig::default_endpoint")]
    pub endpoint: String,
    /// Repository name within the store.
    #[serde(default = "StoreConfig::default_repository")]
    pub repository: String,
}

impl StoreConfig {
    fn default_endpoint() -> String {
        "http://localhost:7200".to_string()
    }

    fn default_repository() -> String {
        "TOSCA".to_string()
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: Self::default_endpoint(),
            repository: Self::default_repository(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Settings {
    /// Load settings from an optional `toscagraph.toml` in the working
    /// directory, overridden by `TOSCAGRAPH__*` environment variables
    /// (e.g. `TOSCAGRAPH__STORE__ENDPOINT` selects an alternate store).
    pub fn load() -> Result<Self> {
        let settings: Settings = cfg::Config::builder()
            .add_source(cfg::File::with_name("toscagraph").required(false))
            .add_source(cfg::Environment::with_prefix("TOSCAGRAPH").separator("__"))
            .build()
            .map_err(|e| ToscaGraphError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ToscaGraphError::Config(e.to_string()))?;
        settings.validate()?;
        debug!(endpoint = %settings.store.endpoint, repository = %settings.store.repository, "settings loaded");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.store.endpoint.trim().is_empty() {
            return Err(ToscaGraphError::Config(
                "store.endpoint cannot be empty".to_string(),
            ));
        }
        if self.store.repository.trim().is_empty() {
            return Err(ToscaGraphError::Config(
                "store.repository cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

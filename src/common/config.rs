//! Configuration file handling

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::paths::{config_path, default_credentials_path};
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Server under test
    #[serde(default)]
    pub server: ServerConfig,

    /// Test account settings
    #[serde(default)]
    pub account: AccountConfig,

    /// Entity used by the dynamic schema tests
    #[serde(default)]
    pub entity: EntityConfig,
}

/// Server connection settings
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Base URL all API paths are appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ServerConfig {
    /// Per-request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout() -> u64 {
    10
}

/// Test account settings
#[derive(Debug, Deserialize, Clone)]
pub struct AccountConfig {
    /// Path to the three-line credential file
    #[serde(default = "default_credentials_path")]
    pub credentials_file: PathBuf,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            credentials_file: default_credentials_path(),
        }
    }
}

/// The entity the dynamic tests create and then read back
#[derive(Debug, Deserialize, Clone)]
pub struct EntityConfig {
    /// Placeholder naming the entity identifier, in either spelling
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Schema id of the operation that creates the entity
    #[serde(default = "default_create_operation")]
    pub create_operation: String,

    /// Prefix of the generated test entity id
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            placeholder: default_placeholder(),
            create_operation: default_create_operation(),
            id_prefix: default_id_prefix(),
        }
    }
}

fn default_placeholder() -> String {
    "robot_id".to_string()
}

fn default_create_operation() -> String {
    "register_robot_request".to_string()
}

fn default_id_prefix() -> String {
    "test-robot-dynamic-".to_string()
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let base = &self.server.base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(super::Error::Config(format!(
                "server.base_url must start with http:// or https://, got '{}'",
                base
            )));
        }
        if self.server.timeout_secs == 0 {
            return Err(super::Error::Config(
                "server.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.entity.placeholder.trim().is_empty() {
            return Err(super::Error::Config(
                "entity.placeholder must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply command-line overrides on top of the file configuration
    pub fn with_overrides(
        mut self,
        base_url: Option<String>,
        credentials_file: Option<PathBuf>,
    ) -> Result<Self> {
        if let Some(url) = base_url {
            self.server.base_url = url;
        }
        if let Some(path) = credentials_file {
            self.account.credentials_file = path;
        }
        self.validate()?;
        Ok(self)
    }
}

//! Application configuration.
//!
//! Configuration is layered with the [`config`] crate:
//!
//! 1. `birdwatch.toml` in the working directory (optional), or the file
//!    named by `BIRDWATCH_CONFIG` (required when set)
//! 2. Environment variables prefixed with `BIRDWATCH_`, using `__` to
//!    separate nested keys (e.g. `BIRDWATCH_SERVER__PORT=9000`,
//!    `BIRDWATCH_DATABASE__WRITE_URL=postgresql://...`)
//!
//! Later layers override earlier ones.

use std::time::Duration;

use birdwatch_db::PostgresConfig;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::server::ServerConfig;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "BIRDWATCH_CONFIG";

/// Default configuration file stem (`birdwatch.toml`, `birdwatch.yaml`, ...).
const DEFAULT_CONFIG_STEM: &str = "birdwatch";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A required setting is missing for the selected storage backend.
    #[error("missing required setting: {0}")]
    Missing(&'static str),
}

/// Where owners and observations are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// `PostgreSQL` with read/write routing.
    #[default]
    Postgres,
    /// Process-local maps; everything is lost on restart.
    Memory,
}

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// URL of the primary (write) server.
    pub write_url: Option<String>,
    /// URL of the replica (read) server. Falls back to the primary.
    pub read_url: Option<String>,
    /// Maximum connections per pool.
    pub max_connections: u32,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whether to apply pending migrations at startup.
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            write_url: None,
            read_url: None,
            max_connections: 10,
            connect_timeout_secs: 5,
            run_migrations: true,
        }
    }
}

impl DatabaseConfig {
    /// Pool configuration for the primary.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if no write URL is configured.
    pub fn primary(&self) -> Result<PostgresConfig, ConfigError> {
        let url = self
            .write_url
            .as_deref()
            .ok_or(ConfigError::Missing("database.write_url"))?;
        Ok(self.pool_config(url))
    }

    /// Pool configuration for the replica, if one is configured.
    pub fn replica(&self) -> Option<PostgresConfig> {
        self.read_url
            .as_deref()
            .filter(|url| Some(*url) != self.write_url.as_deref())
            .map(|url| self.pool_config(url))
    }

    fn pool_config(&self, url: &str) -> PostgresConfig {
        PostgresConfig::new(url)
            .with_max_connections(self.max_connections)
            .with_connect_timeout(Duration::from_secs(self.connect_timeout_secs))
    }
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Storage backend selection.
    pub storage: StorageBackend,
    /// `PostgreSQL` settings (ignored for in-memory storage).
    pub database: DatabaseConfig,
    /// Logging settings.
    pub log: LogConfig,
}

impl AppConfig {
    /// Load configuration from the default file and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source cannot be read or parsed, or a
    /// setting required by the selected backend is missing.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => File::with_name(&path).required(true),
            Err(_) => File::with_name(DEFAULT_CONFIG_STEM).required(false),
        };
        Self::from_sources(file, Environment::with_prefix("BIRDWATCH"))
    }

    /// Build configuration from an explicit file source and environment source.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::load`].
    pub fn from_sources(
        file: File<config::FileSourceFile, config::FileFormat>,
        env: Environment,
    ) -> Result<Self, ConfigError> {
        let config: Self = Config::builder()
            .add_source(file)
            .add_source(
                env.prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage == StorageBackend::Postgres {
            self.database.primary()?;
        }
        Ok(())
    }
}

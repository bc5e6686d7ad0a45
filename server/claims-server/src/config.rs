//! Server configuration
//!
//! Values are layered, lowest precedence first: built-in defaults, an
//! optional YAML/TOML/JSON file, `CLAIMS__*` environment variables
//! (`CLAIMS__DATABASE__URL`, `CLAIMS__SERVER__PORT`, ...), then command line
//! flags applied by the binary.

use database_layer::PoolSettings;
use error_common::{IntakeError, Result};
use logger_redacted::LoggerConfig;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Deployment environment variable; anything but `development` logs JSON
pub const ENVIRONMENT_VAR: &str = "CLAIMS_ENV";

/// Where accepted claims are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// PostgreSQL through a `sqlx` pool
    Postgres,
    /// Process memory; lost on restart
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(StorageBackend::Postgres),
            "memory" | "in-memory" | "inmemory" => Ok(StorageBackend::Memory),
            _ => Err(format!("Unknown storage backend: {s}. Valid options: postgres, memory")),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Postgres => write!(f, "postgres"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body
    pub max_body_bytes: usize,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_body_bytes: 2 * 1024 * 1024,
            cors_allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

/// PostgreSQL settings, used when `storage` is `postgres`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Falls back to `DATABASE_URL` when unset
    pub url: Option<String>,
    pub run_migrations: bool,
    pub pool: PoolSettings,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            run_migrations: true,
            pool: PoolSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub name: String,
    pub server: HttpConfig,
    pub storage: StorageBackend,
    pub database: DatabaseConfig,
    pub logging: LoggerConfig,
}

impl ServerConfig {
    /// Load configuration from an optional file and the environment
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        let mut loaded: ServerConfig = builder
            .add_source(
                config::Environment::with_prefix("CLAIMS")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_allowed_origins"),
            )
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| IntakeError::ConfigError(format!("Failed to load configuration: {e}")))?;

        if loaded.database.url.is_none() {
            loaded.database.url = std::env::var("DATABASE_URL").ok();
        }

        Ok(loaded)
    }

    /// Check cross-field requirements before anything is started
    pub fn validate(&self) -> Result<()> {
        if self.storage == StorageBackend::Postgres && self.database.url.is_none() {
            return Err(IntakeError::ConfigError(
                "database.url (or DATABASE_URL) is required when storage is postgres".to_string(),
            ));
        }
        if self.database.pool.min_connections > self.database.pool.max_connections {
            return Err(IntakeError::ConfigError(format!(
                "database.pool.min_connections ({}) exceeds max_connections ({})",
                self.database.pool.min_connections, self.database.pool.max_connections
            )));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        let environment = std::env::var(ENVIRONMENT_VAR).unwrap_or_else(|_| "development".to_string());
        Self {
            name: "Claim Intake Service".to_string(),
            server: HttpConfig::default(),
            storage: StorageBackend::Postgres,
            database: DatabaseConfig::default(),
            logging: LoggerConfig::for_environment(&environment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_backend_from_str() {
        assert_eq!("PostgreSQL".parse::<StorageBackend>(), Ok(StorageBackend::Postgres));
        assert_eq!("memory".parse::<StorageBackend>(), Ok(StorageBackend::Memory));
        assert!("sqlite".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_postgres_requires_url() {
        let mut config = ServerConfig::default();
        config.database.url = None;
        assert!(config.validate().is_err());

        config.storage = StorageBackend::Memory;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_pool_bounds_are_checked() {
        let mut config = ServerConfig {
            storage: StorageBackend::Memory,
            ..ServerConfig::default()
        };
        config.database.pool.min_connections = 10;
        config.database.pool.max_connections = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bind_address() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }
}

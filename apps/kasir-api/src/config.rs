//! Kasir API configuration module.
//!
//! ## Layering (later wins)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Built-in defaults          host 0.0.0.0, port 8080, +07:00 ...     │
//! │  2. kasir.toml (optional)      path overridable via KASIR_CONFIG        │
//! │  3. KASIR__* environment       KASIR__PORT, KASIR__DATABASE__PATH ...   │
//! │  4. Legacy environment         PORT, DB_CONN                            │
//! │                                                                         │
//! │  A .env file, if present, is loaded into the environment first.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use chrono::FixedOffset;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use kasir_core::validation::parse_utc_offset;
use kasir_db::DbConfig;

/// Default config file path (relative to the working directory).
pub const DEFAULT_CONFIG_FILE: &str = "kasir.toml";

/// Optional dotenv file (relative to the working directory).
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Kasir API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Listen address
    pub host: String,

    /// Listen port
    pub port: u16,

    /// UTC offset that report calendar days are interpreted in
    pub timezone_offset: String,

    pub database: DatabaseSettings,
}

/// Database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file path, or `:memory:`
    pub path: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    pub busy_timeout_secs: u64,
}

impl AppConfig {
    /// Load configuration from `.env`, the config file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        load_env_file(Path::new(DEFAULT_ENV_FILE))?;

        let path =
            std::env::var("KASIR_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        Self::from_sources(
            Some(&path),
            Environment::with_prefix("KASIR")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
            std::env::var("PORT").ok(),
            std::env::var("DB_CONN").ok(),
        )
    }

    /// Builds the configuration from explicit sources.
    pub fn from_sources(
        file: Option<&str>,
        env: Environment,
        legacy_port: Option<String>,
        legacy_db_conn: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("timezone_offset", "+07:00")?
            .set_default("database.path", "kasir.db")?
            .set_default("database.max_connections", 25)?
            .set_default("database.min_connections", 5)?
            .set_default("database.acquire_timeout_secs", 10)?
            .set_default("database.idle_timeout_secs", 600)?
            .set_default("database.max_lifetime_secs", 300)?
            .set_default("database.busy_timeout_secs", 5)?;

        if let Some(file) = file {
            builder = builder.add_source(File::new(file, FileFormat::Toml).required(false));
        }

        let config: AppConfig = builder
            .add_source(env)
            .set_override_option("port", legacy_port.filter(|p| !p.trim().is_empty()))?
            .set_override_option("database.path", legacy_db_conn.filter(|p| !p.trim().is_empty()))?
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.utc_offset()?;

        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::InvalidValue(
                "database.min_connections exceeds database.max_connections".to_string(),
            ));
        }
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::MissingRequired("database.path".to_string()));
        }

        self.socket_addr()?;
        Ok(())
    }

    /// The parsed report offset.
    pub fn utc_offset(&self) -> Result<FixedOffset, ConfigError> {
        parse_utc_offset(&self.timezone_offset)
            .map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }

    /// The address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue(format!("host {}", self.host)))
    }

    /// Pool settings for [`kasir_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        let db = &self.database;
        let secs = |s: u64| (s > 0).then(|| Duration::from_secs(s));

        let base = if db.path == kasir_db::pool::IN_MEMORY_PATH {
            DbConfig::in_memory()
        } else {
            DbConfig::new(&db.path)
                .max_connections(db.max_connections)
                .min_connections(db.min_connections)
                .idle_timeout(secs(db.idle_timeout_secs))
                .max_lifetime(secs(db.max_lifetime_secs))
        };

        base.acquire_timeout(Duration::from_secs(db.acquire_timeout_secs))
            .busy_timeout(Duration::from_secs(db.busy_timeout_secs))
    }
}

/// Loads `path` into the process environment. A missing file is fine, a
/// malformed one is not.
pub fn load_env_file(path: &Path) -> Result<(), ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(ConfigError::EnvFile(e)),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Failed to read .env file: {0}")]
    EnvFile(dotenvy::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Environment::with_prefix("KASIR")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .source(Some(source))
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_sources(None, env(&[]), None, None).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.utc_offset().unwrap().local_minus_utc(), 7 * 3600);

        let db = config.db_config();
        assert_eq!(db.max_connections, 25);
        assert_eq!(db.min_connections, 5);
        assert_eq!(db.acquire_timeout, Duration::from_secs(10));
        assert_eq!(db.max_lifetime, Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_prefixed_environment() {
        let config = AppConfig::from_sources(
            None,
            env(&[
                ("KASIR__PORT", "9000"),
                ("KASIR__TIMEZONE_OFFSET", "+08:00"),
                ("KASIR__DATABASE__MAX_CONNECTIONS", "4"),
                ("KASIR__DATABASE__MIN_CONNECTIONS", "1"),
            ]),
            None,
            None,
        )
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.utc_offset().unwrap().local_minus_utc(), 8 * 3600);
        assert_eq!(config.database.max_connections, 4);
    }

    #[test]
    fn test_legacy_variables_win() {
        let config = AppConfig::from_sources(
            None,
            env(&[("KASIR__PORT", "9000")]),
            Some("3000".to_string()),
            Some("/var/lib/kasir/kasir.db".to_string()),
        )
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.database.path, "/var/lib/kasir/kasir.db");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad_offset = AppConfig::from_sources(
            None,
            env(&[("KASIR__TIMEZONE_OFFSET", "Asia/Jakarta")]),
            None,
            None,
        );
        assert!(matches!(bad_offset, Err(ConfigError::InvalidValue(_))));

        let bad_port = AppConfig::from_sources(None, env(&[]), Some("http".to_string()), None);
        assert!(bad_port.is_err());
    }

    #[test]
    fn test_env_file_missing_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_env_file(&dir.path().join(".env")).is_ok());
    }

    #[test]
    fn test_env_file_malformed_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "=no-key\n").unwrap();

        assert!(matches!(
            load_env_file(&path),
            Err(ConfigError::EnvFile(_))
        ));
    }

    #[test]
    fn test_in_memory_path() {
        let config =
            AppConfig::from_sources(None, env(&[]), None, Some(":memory:".to_string())).unwrap();
        let db = config.db_config();
        assert!(db.is_in_memory());
        assert_eq!(db.max_connections, 1);
    }
}

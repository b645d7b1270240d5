//! Process configuration, read from environment variables.
//!
//! | variable                    | default                        |
//! |-----------------------------|--------------------------------|
//! | `NEXUS_BIND_ADDR`           | `0.0.0.0:8000`                 |
//! | `DATABASE_URL`              | `sqlite://nexus.db?mode=rwc`   |
//! | `NEXUS_DB_MAX_CONNECTIONS`  | `5`                            |
//! | `NEXUS_DEFAULT_IMAGE_URL`   | placeholder image              |
//! | `NEXUS_LOG_FORMAT`          | `json` (`json` or `pretty`)    |
//!
//! Empty values count as unset.

use std::net::SocketAddr;

use thiserror::Error;

use nexus_observability::LogFormat;
use nexus_products::DEFAULT_IMAGE_URL;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://nexus.db?mode=rwc";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(var: &'static str, reason: impl ToString) -> Self {
        Self::Invalid {
            var,
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub max_connections: u32,
    /// Image shown for products registered without a usable photo.
    pub default_image_url: String,
    pub log_format: LogFormat,
}

impl CatalogConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = get("NEXUS_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid("NEXUS_BIND_ADDR", e))?;

        let max_connections = match get("NEXUS_DB_MAX_CONNECTIONS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(0) => return Err(ConfigError::invalid("NEXUS_DB_MAX_CONNECTIONS", "must be at least 1")),
                Ok(n) => n,
                Err(e) => return Err(ConfigError::invalid("NEXUS_DB_MAX_CONNECTIONS", e)),
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let log_format = match get("NEXUS_LOG_FORMAT") {
            Some(raw) => raw
                .parse::<LogFormat>()
                .map_err(|e| ConfigError::invalid("NEXUS_LOG_FORMAT", e))?,
            None => LogFormat::default(),
        };

        Ok(Self {
            bind_addr,
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            max_connections,
            default_image_url: get("NEXUS_DEFAULT_IMAGE_URL")
                .unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string()),
            log_format,
        })
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            default_image_url: DEFAULT_IMAGE_URL.to_string(),
            log_format: LogFormat::default(),
        }
    }
}

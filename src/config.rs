use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::journal::week::WeekStart;

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub operation_timeout: Duration,
    pub week_start: WeekStart,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let storage = StorageConfig {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://myfood.db".into()),
            max_connections: match std::env::var("DATABASE_MAX_CONNECTIONS") {
                Ok(v) => v.parse::<u32>().context("parse DATABASE_MAX_CONNECTIONS")?,
                Err(_) => 5,
            },
            operation_timeout: match std::env::var("STORAGE_OPERATION_TIMEOUT_SECS") {
                Ok(v) => Duration::from_secs(
                    v.parse::<u64>().context("parse STORAGE_OPERATION_TIMEOUT_SECS")?,
                ),
                Err(_) => Duration::from_secs(10),
            },
            week_start: match std::env::var("WEEK_START") {
                Ok(v) => v.parse::<WeekStart>().context("parse WEEK_START")?,
                Err(_) => WeekStart::Monday,
            },
        };
        let port = std::env::var("APP_PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse::<u16>()
            .context("parse APP_PORT")?;
        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            storage,
        })
    }
}

impl StorageConfig {
    /// In-memory store with default limits, used by tests and local tooling.
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            max_connections: 1,
            operation_timeout: Duration::from_secs(10),
            week_start: WeekStart::Monday,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // the only test that touches the process environment
    #[test]
    fn env_values_are_parsed_or_rejected() {
        std::env::set_var("DATABASE_MAX_CONNECTIONS", "8");
        std::env::set_var("STORAGE_OPERATION_TIMEOUT_SECS", "3");
        let cfg = AppConfig::from_env().unwrap();
        assert_eq!(cfg.storage.max_connections, 8);
        assert_eq!(cfg.storage.operation_timeout, Duration::from_secs(3));

        std::env::set_var("DATABASE_MAX_CONNECTIONS", "many");
        let err = AppConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("DATABASE_MAX_CONNECTIONS"));

        std::env::remove_var("DATABASE_MAX_CONNECTIONS");
        std::env::set_var("STORAGE_OPERATION_TIMEOUT_SECS", "-1");
        let err = AppConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("STORAGE_OPERATION_TIMEOUT_SECS"));

        std::env::remove_var("STORAGE_OPERATION_TIMEOUT_SECS");
        let cfg = AppConfig::from_env().unwrap();
        assert_eq!(cfg.storage.max_connections, 5);
        assert_eq!(cfg.storage.operation_timeout, Duration::from_secs(10));
    }
}

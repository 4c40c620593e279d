use crate::config::{AppConfig, StorageConfig};
use crate::storage::{SqliteStorage, Storage};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let storage = Arc::new(SqliteStorage::connect(&config.storage).await?) as Arc<dyn Storage>;
        Ok(Self { config, storage })
    }

    /// State over a fresh in-memory database.
    pub async fn fake() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            storage: StorageConfig::in_memory(),
        });
        let storage = Arc::new(SqliteStorage::connect(&config.storage).await?) as Arc<dyn Storage>;
        Ok(Self { config, storage })
    }
}

use anyhow::Context;
use async_trait::async_trait;
use tracing::instrument;

use super::repo;
use crate::error::{StorageError, StorageResult};
use crate::models::UserSettings;
use crate::storage::SqliteStorage;

#[async_trait]
pub trait SettingsStorage: Send + Sync {
    async fn get_user_settings(&self, user_id: i64) -> StorageResult<UserSettings>;
    async fn set_user_settings(&self, user_id: i64, settings: &UserSettings) -> StorageResult<()>;
}

#[async_trait]
impl SettingsStorage for SqliteStorage {
    #[instrument(skip(self))]
    async fn get_user_settings(&self, user_id: i64) -> StorageResult<UserSettings> {
        self.run("get_user_settings", 1, async {
            let mut tx = self.begin().await?;
            let settings = repo::get(&mut tx, user_id)
                .await?
                .ok_or(StorageError::UserSettingsNotFound)?;
            tx.commit().await.context("commit tx")?;
            Ok(settings)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn set_user_settings(&self, user_id: i64, settings: &UserSettings) -> StorageResult<()> {
        if !settings.validate() {
            return Err(StorageError::InvalidUserSettings);
        }
        self.run("set_user_settings", 1, async {
            let mut tx = self.begin_write().await?;
            repo::upsert(&mut tx, user_id, settings).await?;
            tx.commit().await.context("commit tx")?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_support::memory_storage;

    #[tokio::test]
    async fn settings_roundtrip_and_overwrite() {
        let stg = memory_storage().await;
        let err = stg.get_user_settings(1).await.unwrap_err();
        assert!(matches!(err, StorageError::UserSettingsNotFound));

        let s = UserSettings { cal_limit: 2000.0, default_active_cal: 300.0 };
        stg.set_user_settings(1, &s).await.unwrap();
        assert_eq!(stg.get_user_settings(1).await.unwrap(), s);

        let s2 = UserSettings { cal_limit: 1800.0, default_active_cal: 0.0 };
        stg.set_user_settings(1, &s2).await.unwrap();
        assert_eq!(stg.get_user_settings(1).await.unwrap(), s2);
        assert!(stg.get_user_settings(2).await.is_err());
    }

    #[tokio::test]
    async fn invalid_settings() {
        let stg = memory_storage().await;
        let err = stg
            .set_user_settings(1, &UserSettings { cal_limit: -5.0, default_active_cal: 0.0 })
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidUserSettings));
    }
}

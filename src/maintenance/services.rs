use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, instrument};

use super::repo::{
    self, ActivityRecord, BundleRecord, JournalRecord, UserSettingsRecord, WeightRecord,
};
use crate::error::StorageResult;
use crate::models::Food;
use crate::storage::SqliteStorage;

const BACKUP_TIMEOUT_SCALE: u32 = 10;

/// Consistent snapshot of the whole store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Backup {
    pub foods: Vec<Food>,
    pub bundles: Vec<BundleRecord>,
    pub journal: Vec<JournalRecord>,
    pub weights: Vec<WeightRecord>,
    pub activities: Vec<ActivityRecord>,
    pub user_settings: Vec<UserSettingsRecord>,
}

#[async_trait]
pub trait MaintenanceStorage: Send + Sync {
    async fn backup(&self) -> StorageResult<Backup>;
}

#[async_trait]
impl MaintenanceStorage for SqliteStorage {
    #[instrument(skip(self))]
    async fn backup(&self) -> StorageResult<Backup> {
        self.run("backup", BACKUP_TIMEOUT_SCALE, async {
            let mut tx = self.begin().await?;
            let backup = Backup {
                foods: repo::foods(&mut tx).await?,
                bundles: repo::bundles(&mut tx).await?,
                journal: repo::journal(&mut tx).await?,
                weights: repo::weights(&mut tx).await?,
                activities: repo::activities(&mut tx).await?,
                user_settings: repo::user_settings(&mut tx).await?,
            };
            tx.commit().await.context("commit tx")?;
            info!(
                foods = backup.foods.len(),
                journal = backup.journal.len(),
                "backup collected"
            );
            Ok(backup)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundles::services::BundleStorage;
    use crate::food::services::FoodStorage;
    use crate::journal::services::JournalStorage;
    use crate::measurements::services::MeasurementStorage;
    use crate::models::{Activity, Bundle, JournalEntry, Meal, UserSettings, Weight};
    use crate::settings::services::SettingsStorage;
    use crate::storage::test_support::{food, memory_storage};
    use time::macros::date;

    #[tokio::test]
    async fn backup_covers_every_table_and_user() {
        let stg = memory_storage().await;
        let d = date!(2024 - 01 - 01);
        stg.set_food(&food("egg", 155.0, 13.0, 11.0, 1.1)).await.unwrap();
        let bundle = Bundle {
            key: "b".into(),
            items: [("egg".to_string(), 50.0)].into(),
        };
        let entry = JournalEntry {
            timestamp: d,
            meal: Meal::Dinner,
            food_key: "egg".into(),
            food_weight: 100.0,
        };
        for user in [1, 2] {
            stg.set_bundle(user, &bundle).await.unwrap();
            stg.set_journal(user, &entry).await.unwrap();
        }
        stg.set_weight(1, &Weight { timestamp: d, value: 80.0 }).await.unwrap();
        stg.set_activity(2, &Activity { timestamp: d, active_cal: 200.0 }).await.unwrap();
        stg.set_user_settings(1, &UserSettings { cal_limit: 2000.0, default_active_cal: 0.0 })
            .await
            .unwrap();

        let b = stg.backup().await.unwrap();
        assert_eq!(b.foods.len(), 1);
        assert_eq!(b.bundles.len(), 2);
        assert_eq!(b.journal.len(), 2);
        assert_eq!(b.journal[1].user_id, 2);
        assert_eq!(b.journal[1].meal, Meal::Dinner);
        assert_eq!(b.weights.len(), 1);
        assert_eq!(b.activities[0].user_id, 2);
        assert_eq!(b.user_settings[0].cal_limit, 2000.0);

        let json = serde_json::to_value(&b).unwrap();
        assert_eq!(json["journal"][0]["timestamp"], "2024-01-01");
        assert_eq!(json["journal"][0]["meal"], "dinner");
        assert_eq!(json["bundles"][0]["items"]["egg"], 50.0);
    }

    #[tokio::test]
    async fn backup_of_empty_store() {
        let stg = memory_storage().await;
        let b = stg.backup().await.unwrap();
        assert!(b.foods.is_empty() && b.journal.is_empty() && b.user_settings.is_empty());
    }
}

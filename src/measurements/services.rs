use anyhow::Context;
use async_trait::async_trait;
use time::Date;
use tracing::instrument;

use super::repo;
use crate::error::{StorageError, StorageResult};
use crate::models::{Activity, Weight};
use crate::reports::services::validate_period;
use crate::storage::SqliteStorage;

/// Body weight and active-calorie series, one value per user per day.
#[async_trait]
pub trait MeasurementStorage: Send + Sync {
    async fn set_weight(&self, user_id: i64, weight: &Weight) -> StorageResult<()>;
    async fn get_weight_list(
        &self,
        user_id: i64,
        from: Date,
        to: Date,
    ) -> StorageResult<Vec<Weight>>;
    async fn delete_weight(&self, user_id: i64, timestamp: Date) -> StorageResult<()>;

    async fn set_activity(&self, user_id: i64, activity: &Activity) -> StorageResult<()>;
    async fn get_activity(&self, user_id: i64, timestamp: Date) -> StorageResult<Activity>;
    async fn get_activity_list(
        &self,
        user_id: i64,
        from: Date,
        to: Date,
    ) -> StorageResult<Vec<Activity>>;
    async fn delete_activity(&self, user_id: i64, timestamp: Date) -> StorageResult<()>;
}

#[async_trait]
impl MeasurementStorage for SqliteStorage {
    #[instrument(skip(self))]
    async fn set_weight(&self, user_id: i64, weight: &Weight) -> StorageResult<()> {
        if !weight.validate() {
            return Err(StorageError::InvalidWeight);
        }
        self.run("set_weight", 1, async {
            let mut tx = self.begin_write().await?;
            repo::upsert_weight(&mut tx, user_id, weight).await?;
            tx.commit().await.context("commit tx")?;
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn get_weight_list(
        &self,
        user_id: i64,
        from: Date,
        to: Date,
    ) -> StorageResult<Vec<Weight>> {
        validate_period(from, to)?;
        self.run("get_weight_list", 1, async {
            let mut tx = self.begin().await?;
            let rows = repo::list_weight(&mut tx, user_id, from, to).await?;
            tx.commit().await.context("commit tx")?;
            if rows.is_empty() {
                return Err(StorageError::WeightEmptyList);
            }
            Ok(rows)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete_weight(&self, user_id: i64, timestamp: Date) -> StorageResult<()> {
        self.run("delete_weight", 1, async {
            let mut tx = self.begin_write().await?;
            repo::delete_weight(&mut tx, user_id, timestamp).await?;
            tx.commit().await.context("commit tx")?;
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn set_activity(&self, user_id: i64, activity: &Activity) -> StorageResult<()> {
        if !activity.validate() {
            return Err(StorageError::InvalidActivity);
        }
        self.run("set_activity", 1, async {
            let mut tx = self.begin_write().await?;
            repo::upsert_activity(&mut tx, user_id, activity).await?;
            tx.commit().await.context("commit tx")?;
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn get_activity(&self, user_id: i64, timestamp: Date) -> StorageResult<Activity> {
        self.run("get_activity", 1, async {
            let mut tx = self.begin().await?;
            let activity = repo::get_activity(&mut tx, user_id, timestamp)
                .await?
                .ok_or(StorageError::ActivityNotFound)?;
            tx.commit().await.context("commit tx")?;
            Ok(activity)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn get_activity_list(
        &self,
        user_id: i64,
        from: Date,
        to: Date,
    ) -> StorageResult<Vec<Activity>> {
        validate_period(from, to)?;
        self.run("get_activity_list", 1, async {
            let mut tx = self.begin().await?;
            let rows = repo::list_activity(&mut tx, user_id, from, to).await?;
            tx.commit().await.context("commit tx")?;
            if rows.is_empty() {
                return Err(StorageError::ActivityEmptyList);
            }
            Ok(rows)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete_activity(&self, user_id: i64, timestamp: Date) -> StorageResult<()> {
        self.run("delete_activity", 1, async {
            let mut tx = self.begin_write().await?;
            repo::delete_activity(&mut tx, user_id, timestamp).await?;
            tx.commit().await.context("commit tx")?;
            Ok(())
        })
        .await
    }
}

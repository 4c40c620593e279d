use anyhow::Context;
use async_trait::async_trait;
use time::{Date, Duration};
use tracing::{debug, instrument};

use super::repo;
use crate::bundles::repo as bundle_repo;
use crate::error::{StorageError, StorageResult};
use crate::food::repo as food_repo;
use crate::models::{JournalEntry, Meal};
use crate::storage::SqliteStorage;

/// Per-user food diary: one row per (day, meal, food).
#[async_trait]
pub trait JournalStorage: Send + Sync {
    /// Inserts the entry or overwrites the weight of an existing one.
    async fn set_journal(&self, user_id: i64, entry: &JournalEntry) -> StorageResult<()>;
    async fn delete_journal(
        &self,
        user_id: i64,
        timestamp: Date,
        meal: Meal,
        food_key: &str,
    ) -> StorageResult<()>;
    async fn delete_journal_meal(
        &self,
        user_id: i64,
        timestamp: Date,
        meal: Meal,
    ) -> StorageResult<()>;
    /// Expands a bundle into the meal slot. All or nothing; returns the number
    /// of entries written.
    async fn set_journal_bundle(
        &self,
        user_id: i64,
        timestamp: Date,
        meal: Meal,
        bundle_key: &str,
    ) -> StorageResult<usize>;
    /// Copies one meal slot into an empty one.
    async fn copy_journal(
        &self,
        user_id: i64,
        from: Date,
        from_meal: Meal,
        to: Date,
        to_meal: Meal,
    ) -> StorageResult<usize>;
    /// Copies a whole week into an empty week. Both dates must open a week.
    async fn copy_journal_week(&self, user_id: i64, from: Date, to: Date) -> StorageResult<usize>;
}

fn shift(date: Date, by: Duration) -> StorageResult<Date> {
    date.checked_add(by).ok_or(StorageError::InvalidPeriod)
}

#[async_trait]
impl JournalStorage for SqliteStorage {
    #[instrument(
        skip(self, entry),
        fields(date = %entry.timestamp, meal = %entry.meal, food = %entry.food_key)
    )]
    async fn set_journal(&self, user_id: i64, entry: &JournalEntry) -> StorageResult<()> {
        if !entry.validate() {
            return Err(StorageError::InvalidJournal);
        }
        self.run("set_journal", 1, async {
            let mut tx = self.begin_write().await?;
            if !food_repo::exists(&mut tx, &entry.food_key).await? {
                return Err(StorageError::JournalInvalidFood(entry.food_key.clone()));
            }
            repo::upsert(&mut tx, user_id, entry).await?;
            tx.commit().await.context("commit tx")?;
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete_journal(
        &self,
        user_id: i64,
        timestamp: Date,
        meal: Meal,
        food_key: &str,
    ) -> StorageResult<()> {
        self.run("delete_journal", 1, async {
            let mut tx = self.begin_write().await?;
            repo::delete_entry(&mut tx, user_id, timestamp, meal, food_key).await?;
            tx.commit().await.context("commit tx")?;
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete_journal_meal(
        &self,
        user_id: i64,
        timestamp: Date,
        meal: Meal,
    ) -> StorageResult<()> {
        self.run("delete_journal_meal", 1, async {
            let mut tx = self.begin_write().await?;
            repo::delete_meal(&mut tx, user_id, timestamp, meal).await?;
            tx.commit().await.context("commit tx")?;
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn set_journal_bundle(
        &self,
        user_id: i64,
        timestamp: Date,
        meal: Meal,
        bundle_key: &str,
    ) -> StorageResult<usize> {
        self.run("set_journal_bundle", 1, async {
            let mut tx = self.begin_write().await?;
            let bundle = bundle_repo::get(&mut tx, user_id, bundle_key)
                .await?
                .ok_or(StorageError::BundleNotFound)?;

            for (food_key, weight) in &bundle.items {
                // an early return drops `tx` and rolls back the rows already written
                if !food_repo::exists(&mut tx, food_key).await? {
                    return Err(StorageError::JournalInvalidFood(food_key.clone()));
                }
                let entry = JournalEntry {
                    timestamp,
                    meal,
                    food_key: food_key.clone(),
                    food_weight: *weight,
                };
                repo::upsert(&mut tx, user_id, &entry).await?;
            }

            tx.commit().await.context("commit tx")?;
            Ok(bundle.items.len())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn copy_journal(
        &self,
        user_id: i64,
        from: Date,
        from_meal: Meal,
        to: Date,
        to_meal: Meal,
    ) -> StorageResult<usize> {
        self.run("copy_journal", 1, async {
            let mut tx = self.begin_write().await?;
            if repo::count_meal(&mut tx, user_id, to, to_meal).await? > 0 {
                return Err(StorageError::JournalCopyDestinationNotEmpty);
            }

            let source = repo::list_meal(&mut tx, user_id, from, from_meal).await?;
            if source.is_empty() {
                return Err(StorageError::JournalReportEmpty);
            }

            for entry in &source {
                let copy = JournalEntry {
                    timestamp: to,
                    meal: to_meal,
                    ..entry.clone()
                };
                repo::upsert(&mut tx, user_id, &copy).await?;
            }

            tx.commit().await.context("commit tx")?;
            debug!(copied = source.len(), "journal meal copied");
            Ok(source.len())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn copy_journal_week(&self, user_id: i64, from: Date, to: Date) -> StorageResult<usize> {
        let week_start = self.week_start();
        for date in [from, to] {
            if !week_start.is_start_of_week(date) {
                return Err(StorageError::NotStartOfWeek(date));
            }
        }
        let offset = to - from;
        let from_end = shift(from, Duration::days(6))?;
        let to_end = shift(to, Duration::days(6))?;

        self.run("copy_journal_week", 1, async {
            let mut tx = self.begin_write().await?;
            if repo::count_range(&mut tx, user_id, to, to_end).await? > 0 {
                return Err(StorageError::JournalCopyDestinationNotEmpty);
            }

            let source = repo::list_range(&mut tx, user_id, from, from_end).await?;
            if source.is_empty() {
                return Err(StorageError::JournalReportEmpty);
            }

            for entry in &source {
                let copy = JournalEntry {
                    timestamp: shift(entry.timestamp, offset)?,
                    ..entry.clone()
                };
                repo::upsert(&mut tx, user_id, &copy).await?;
            }

            tx.commit().await.context("commit tx")?;
            debug!(copied = source.len(), "journal week copied");
            Ok(source.len())
        })
        .await
    }
}

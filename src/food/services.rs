use anyhow::Context;
use async_trait::async_trait;
use regex::RegexBuilder;
use tracing::instrument;

use super::repo;
use crate::error::{StorageError, StorageResult};
use crate::models::Food;
use crate::storage::SqliteStorage;

/// Shared food catalog. Foods are global; journal rows reference them by key.
#[async_trait]
pub trait FoodStorage: Send + Sync {
    async fn set_food(&self, food: &Food) -> StorageResult<()>;
    async fn get_food(&self, key: &str) -> StorageResult<Food>;
    /// Case-insensitive substring match over key, name and brand.
    async fn find_food(&self, pattern: &str) -> StorageResult<Vec<Food>>;
    async fn get_food_list(&self) -> StorageResult<Vec<Food>>;
    async fn set_food_comment(&self, key: &str, comment: &str) -> StorageResult<()>;
    /// Fails with `FoodInUse` while any journal entry references `key`.
    async fn delete_food(&self, key: &str) -> StorageResult<()>;
}

#[async_trait]
impl FoodStorage for SqliteStorage {
    #[instrument(skip(self, food), fields(key = %food.key))]
    async fn set_food(&self, food: &Food) -> StorageResult<()> {
        if !food.validate() {
            return Err(StorageError::InvalidFood);
        }
        self.run("set_food", 1, async {
            let mut tx = self.begin_write().await?;
            repo::upsert(&mut tx, food).await?;
            tx.commit().await.context("commit tx")?;
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn get_food(&self, key: &str) -> StorageResult<Food> {
        self.run("get_food", 1, async {
            let mut tx = self.begin().await?;
            let food = repo::get(&mut tx, key).await?.ok_or(StorageError::FoodNotFound)?;
            tx.commit().await.context("commit tx")?;
            Ok(food)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_food(&self, pattern: &str) -> StorageResult<Vec<Food>> {
        let re = RegexBuilder::new(&regex::escape(pattern.trim()))
            .case_insensitive(true)
            .build()
            .context("build food search pattern")?;

        self.run("find_food", 1, async {
            let mut tx = self.begin().await?;
            let rows = repo::list_by_name(&mut tx).await?;
            tx.commit().await.context("commit tx")?;

            let found: Vec<Food> = rows
                .into_iter()
                .filter(|f| re.is_match(&f.key) || re.is_match(&f.name) || re.is_match(&f.brand))
                .collect();
            if found.is_empty() {
                return Err(StorageError::FoodEmptyList);
            }
            Ok(found)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn get_food_list(&self) -> StorageResult<Vec<Food>> {
        self.run("get_food_list", 1, async {
            let mut tx = self.begin().await?;
            let rows = repo::list(&mut tx).await?;
            tx.commit().await.context("commit tx")?;
            if rows.is_empty() {
                return Err(StorageError::FoodEmptyList);
            }
            Ok(rows)
        })
        .await
    }

    #[instrument(skip(self, comment))]
    async fn set_food_comment(&self, key: &str, comment: &str) -> StorageResult<()> {
        self.run("set_food_comment", 1, async {
            let mut tx = self.begin_write().await?;
            if !repo::set_comment(&mut tx, key, comment).await? {
                return Err(StorageError::FoodNotFound);
            }
            tx.commit().await.context("commit tx")?;
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete_food(&self, key: &str) -> StorageResult<()> {
        self.run("delete_food", 1, async {
            let mut tx = self.begin_write().await?;
            if repo::count_journal_refs(&mut tx, key).await? > 0 {
                return Err(StorageError::FoodInUse);
            }
            repo::delete(&mut tx, key).await?;
            tx.commit().await.context("commit tx")?;
            Ok(())
        })
        .await
    }
}

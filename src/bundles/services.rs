use anyhow::Context;
use async_trait::async_trait;
use tracing::instrument;

use super::repo;
use crate::error::{StorageError, StorageResult};
use crate::food::repo as food_repo;
use crate::models::Bundle;
use crate::storage::SqliteStorage;

/// Per-user named food sets, expanded into the journal on demand.
#[async_trait]
pub trait BundleStorage: Send + Sync {
    async fn set_bundle(&self, user_id: i64, bundle: &Bundle) -> StorageResult<()>;
    async fn get_bundle(&self, user_id: i64, key: &str) -> StorageResult<Bundle>;
    async fn get_bundle_list(&self, user_id: i64) -> StorageResult<Vec<Bundle>>;
    async fn delete_bundle(&self, user_id: i64, key: &str) -> StorageResult<()>;
}

#[async_trait]
impl BundleStorage for SqliteStorage {
    #[instrument(skip(self, bundle), fields(key = %bundle.key, items = bundle.items.len()))]
    async fn set_bundle(&self, user_id: i64, bundle: &Bundle) -> StorageResult<()> {
        if !bundle.validate() {
            return Err(StorageError::InvalidBundle);
        }
        self.run("set_bundle", 1, async {
            let mut tx = self.begin_write().await?;
            for food_key in bundle.items.keys() {
                if !food_repo::exists(&mut tx, food_key).await? {
                    return Err(StorageError::InvalidBundleFood(food_key.clone()));
                }
            }
            repo::upsert(&mut tx, user_id, bundle).await?;
            tx.commit().await.context("commit tx")?;
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn get_bundle(&self, user_id: i64, key: &str) -> StorageResult<Bundle> {
        self.run("get_bundle", 1, async {
            let mut tx = self.begin().await?;
            let bundle = repo::get(&mut tx, user_id, key)
                .await?
                .ok_or(StorageError::BundleNotFound)?;
            tx.commit().await.context("commit tx")?;
            Ok(bundle)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn get_bundle_list(&self, user_id: i64) -> StorageResult<Vec<Bundle>> {
        self.run("get_bundle_list", 1, async {
            let mut tx = self.begin().await?;
            let rows = repo::list(&mut tx, user_id).await?;
            tx.commit().await.context("commit tx")?;
            if rows.is_empty() {
                return Err(StorageError::BundleEmptyList);
            }
            Ok(rows)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete_bundle(&self, user_id: i64, key: &str) -> StorageResult<()> {
        self.run("delete_bundle", 1, async {
            let mut tx = self.begin_write().await?;
            repo::delete(&mut tx, user_id, key).await?;
            tx.commit().await.context("commit tx")?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::services::FoodStorage;
    use crate::storage::test_support::{food, memory_storage};
    use std::collections::BTreeMap;

    fn bundle(key: &str, items: &[(&str, f64)]) -> Bundle {
        Bundle {
            key: key.into(),
            items: items
                .iter()
                .map(|(k, w)| (k.to_string(), *w))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[tokio::test]
    async fn set_get_and_overwrite() {
        let stg = memory_storage().await;
        stg.set_food(&food("egg", 155.0, 13.0, 11.0, 1.1)).await.unwrap();
        stg.set_food(&food("toast", 260.0, 8.0, 3.0, 50.0)).await.unwrap();

        let b = bundle("breakfast", &[("egg", 100.0), ("toast", 50.0)]);
        stg.set_bundle(1, &b).await.unwrap();
        assert_eq!(stg.get_bundle(1, "breakfast").await.unwrap(), b);

        let b2 = bundle("breakfast", &[("egg", 150.0)]);
        stg.set_bundle(1, &b2).await.unwrap();
        assert_eq!(stg.get_bundle(1, "breakfast").await.unwrap(), b2);
    }

    #[tokio::test]
    async fn bundles_are_scoped_per_user() {
        let stg = memory_storage().await;
        stg.set_food(&food("egg", 155.0, 13.0, 11.0, 1.1)).await.unwrap();
        stg.set_bundle(1, &bundle("b", &[("egg", 100.0)])).await.unwrap();

        let err = stg.get_bundle(2, "b").await.unwrap_err();
        assert!(matches!(err, StorageError::BundleNotFound));
        let err = stg.get_bundle_list(2).await.unwrap_err();
        assert!(matches!(err, StorageError::BundleEmptyList));
    }

    #[tokio::test]
    async fn unknown_food_is_rejected() {
        let stg = memory_storage().await;
        stg.set_food(&food("egg", 155.0, 13.0, 11.0, 1.1)).await.unwrap();

        let err = stg
            .set_bundle(1, &bundle("b", &[("egg", 100.0), ("ghost", 10.0)]))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidBundleFood(ref k) if k == "ghost"));
        assert!(stg.get_bundle(1, "b").await.is_err());
    }

    #[tokio::test]
    async fn invalid_bundles() {
        let stg = memory_storage().await;
        let err = stg.set_bundle(1, &bundle("b", &[])).await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidBundle));
        let err = stg.set_bundle(1, &bundle("", &[("egg", 1.0)])).await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidBundle));
        let err = stg.set_bundle(1, &bundle("b", &[("egg", -1.0)])).await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidBundle));
    }

    #[tokio::test]
    async fn list_ordered_and_delete_idempotent() {
        let stg = memory_storage().await;
        stg.set_food(&food("egg", 155.0, 13.0, 11.0, 1.1)).await.unwrap();
        stg.set_bundle(1, &bundle("lunch", &[("egg", 100.0)])).await.unwrap();
        stg.set_bundle(1, &bundle("dinner", &[("egg", 200.0)])).await.unwrap();

        let keys: Vec<_> = stg
            .get_bundle_list(1)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.key)
            .collect();
        assert_eq!(keys, ["dinner", "lunch"]);

        stg.delete_bundle(1, "lunch").await.unwrap();
        stg.delete_bundle(1, "lunch").await.unwrap();
        assert_eq!(stg.get_bundle_list(1).await.unwrap().len(), 1);
    }
}

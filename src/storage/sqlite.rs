use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use tracing::{info, warn};

use crate::config::StorageConfig;
use crate::error::{StorageError, StorageResult};
use crate::journal::week::WeekStart;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed engine. Cheap to clone; clones share the pools.
///
/// Reads go through `pool`. Every write transaction goes through `writer`,
/// a single-connection pool, so a transaction that reads before it writes
/// never has to upgrade its lock past another connection's commit.
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
    writer: SqlitePool,
    operation_timeout: Duration,
    week_start: WeekStart,
}

impl SqliteStorage {
    /// Opens (or creates) the database and applies migrations.
    pub async fn connect(cfg: &StorageConfig) -> anyhow::Result<Self> {
        let in_memory = cfg.database_url.contains(":memory:");

        let mut options = SqliteConnectOptions::from_str(&cfg.database_url)
            .with_context(|| format!("parse database url {}", cfg.database_url))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let writer = single_connection(in_memory)
            .connect_with(options.clone())
            .await
            .context("connect writer to database")?;

        sqlx::migrate!("./migrations")
            .run(&writer)
            .await
            .context("run migrations")?;

        // Every new connection to :memory: is a fresh empty database, so
        // reads share the writer's only connection.
        let pool = if in_memory {
            writer.clone()
        } else {
            SqlitePoolOptions::new()
                .max_connections(cfg.max_connections.max(1))
                .connect_with(options)
                .await
                .context("connect to database")?
        };

        info!(
            url = %cfg.database_url,
            max_connections = cfg.max_connections,
            week_start = ?cfg.week_start,
            "storage ready"
        );
        Ok(Self {
            pool,
            writer,
            operation_timeout: cfg.operation_timeout,
            week_start: cfg.week_start,
        })
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    /// Starts the read transaction an operation runs in. Dropping it
    /// without `commit` rolls back.
    pub(crate) async fn begin(&self) -> StorageResult<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin().await.context("begin tx")?)
    }

    /// Starts a write transaction on the writer connection. Concurrent
    /// writers queue on the pool until the current one commits or rolls back.
    pub(crate) async fn begin_write(&self) -> StorageResult<Transaction<'static, Sqlite>> {
        Ok(self.writer.begin().await.context("begin write tx")?)
    }

    /// Runs `fut` under the operation deadline scaled by `scale`.
    pub(crate) async fn run<T, F>(&self, op: &'static str, scale: u32, fut: F) -> StorageResult<T>
    where
        F: Future<Output = StorageResult<T>>,
    {
        match tokio::time::timeout(self.operation_timeout * scale, fut).await {
            Ok(res) => res,
            Err(_) => {
                warn!(op, "storage operation deadline exceeded");
                Err(StorageError::Timeout)
            }
        }
    }
}

fn single_connection(keep_alive: bool) -> SqlitePoolOptions {
    let options = SqlitePoolOptions::new().max_connections(1);
    if keep_alive {
        options.min_connections(1).idle_timeout(None).max_lifetime(None)
    } else {
        options
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::models::Food;

    pub(crate) async fn memory_storage() -> SqliteStorage {
        SqliteStorage::connect(&StorageConfig::in_memory())
            .await
            .expect("in-memory storage")
    }

    /// WAL database in a fresh temp dir; keep the dir alive as long as the store.
    pub(crate) async fn file_storage(max_connections: u32) -> (tempfile::TempDir, SqliteStorage) {
        let dir = tempfile::tempdir().expect("temp dir");
        let cfg = StorageConfig {
            database_url: format!("sqlite://{}", dir.path().join("myfood.db").display()),
            max_connections,
            ..StorageConfig::in_memory()
        };
        let stg = SqliteStorage::connect(&cfg).await.expect("file storage");
        (dir, stg)
    }

    pub(crate) fn food(key: &str, cal100: f64, prot100: f64, fat100: f64, carb100: f64) -> Food {
        Food {
            key: key.to_string(),
            name: key.to_string(),
            brand: String::new(),
            cal100,
            prot100,
            fat100,
            carb100,
            comment: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{file_storage, food, memory_storage};
    use super::*;
    use crate::error::ErrorKind;
    use crate::food::services::FoodStorage;
    use crate::measurements::services::MeasurementStorage;
    use crate::models::Weight;
    use time::macros::date;

    #[tokio::test]
    async fn migrations_create_all_tables() {
        let stg = memory_storage().await;
        let mut tables: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT name FROM sqlite_master
            WHERE type = 'table' AND name NOT LIKE '\_%' ESCAPE '\' AND name NOT LIKE 'sqlite%'
        "#,
        )
        .fetch_all(&stg.pool)
        .await
        .unwrap();
        tables.sort();
        assert_eq!(
            tables,
            vec!["activity", "bundle", "food", "journal", "user_settings", "weight"]
        );
    }

    #[tokio::test]
    async fn deadline_rolls_back_open_transaction() {
        let mut cfg = StorageConfig::in_memory();
        cfg.operation_timeout = Duration::from_millis(50);
        let stg = SqliteStorage::connect(&cfg).await.unwrap();

        let res: StorageResult<()> = stg
            .run("slow insert", 1, async {
                let mut tx = stg.begin_write().await?;
                sqlx::query(
                    "INSERT INTO weight (user_id, timestamp, value) VALUES (1, '2024-01-01', 80)",
                )
                .execute(&mut *tx)
                .await
                .context("insert weight")?;
                tokio::time::sleep(Duration::from_secs(2)).await;
                tx.commit().await.context("commit tx")?;
                Ok(())
            })
            .await;

        let err = res.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM weight")
            .fetch_one(&stg.pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writers_on_file_database() {
        let (_dir, stg) = file_storage(8).await;
        let day = date!(2024 - 01 - 01);

        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..32u32 {
            let stg = stg.clone();
            tasks.spawn(async move {
                stg.set_food(&food("egg", 100.0 + f64::from(i), 13.0, 11.0, 1.1)).await?;
                let weight = Weight { timestamp: day, value: 70.0 + f64::from(i) };
                stg.set_weight(i64::from(i), &weight).await?;
                stg.get_food("egg").await.map(|_| ())
            });
        }
        while let Some(res) = tasks.join_next().await {
            res.unwrap().unwrap();
        }

        // same-key upserts: exactly one row, holding one of the written values
        let foods = stg.get_food_list().await.unwrap();
        assert_eq!(foods.len(), 1);
        assert!((100.0..132.0).contains(&foods[0].cal100));

        for user in 0..32i64 {
            let weights = stg.get_weight_list(user, day, day).await.unwrap();
            assert_eq!(weights.len(), 1);
            assert_eq!(weights[0].value, 70.0 + user as f64);
        }
    }

    #[tokio::test]
    async fn file_database_reopens_with_data() {
        let (dir, stg) = file_storage(2).await;
        stg.set_food(&food("egg", 155.0, 13.0, 11.0, 1.1)).await.unwrap();
        stg.pool.close().await;
        stg.writer.close().await;

        let cfg = StorageConfig {
            database_url: format!("sqlite://{}", dir.path().join("myfood.db").display()),
            ..StorageConfig::in_memory()
        };
        let reopened = SqliteStorage::connect(&cfg).await.unwrap();
        assert_eq!(reopened.get_food("egg").await.unwrap().cal100, 155.0);
    }
}

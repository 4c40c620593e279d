use std::collections::BTreeMap;

use anyhow::Context;
use sqlx::types::Json;
use sqlx::{FromRow, SqliteConnection};

use crate::models::Bundle;

#[derive(Debug, FromRow)]
struct BundleRow {
    key: String,
    items: Json<BTreeMap<String, f64>>,
}

impl From<BundleRow> for Bundle {
    fn from(row: BundleRow) -> Self {
        Bundle {
            key: row.key,
            items: row.items.0,
        }
    }
}

pub async fn upsert(
    conn: &mut SqliteConnection,
    user_id: i64,
    bundle: &Bundle,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO bundle (user_id, key, items)
        VALUES (?1, ?2, ?3)
        ON CONFLICT (user_id, key) DO UPDATE SET items = excluded.items
    "#,
    )
    .bind(user_id)
    .bind(&bundle.key)
    .bind(Json(&bundle.items))
    .execute(conn)
    .await
    .context("upsert bundle")?;
    Ok(())
}

pub async fn get(
    conn: &mut SqliteConnection,
    user_id: i64,
    key: &str,
) -> anyhow::Result<Option<Bundle>> {
    let row = sqlx::query_as::<_, BundleRow>(
        "SELECT key, items FROM bundle WHERE user_id = ?1 AND key = ?2",
    )
    .bind(user_id)
    .bind(key)
    .fetch_optional(conn)
    .await
    .context("get bundle")?;
    Ok(row.map(Bundle::from))
}

pub async fn list(conn: &mut SqliteConnection, user_id: i64) -> anyhow::Result<Vec<Bundle>> {
    let rows = sqlx::query_as::<_, BundleRow>(
        "SELECT key, items FROM bundle WHERE user_id = ?1 ORDER BY key",
    )
    .bind(user_id)
    .fetch_all(conn)
    .await
    .context("list bundles")?;
    Ok(rows.into_iter().map(Bundle::from).collect())
}

pub async fn delete(conn: &mut SqliteConnection, user_id: i64, key: &str) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM bundle WHERE user_id = ?1 AND key = ?2")
        .bind(user_id)
        .bind(key)
        .execute(conn)
        .await
        .context("delete bundle")?;
    Ok(())
}

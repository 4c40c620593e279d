use anyhow::Context;
use sqlx::SqliteConnection;

use crate::models::Food;

pub async fn upsert(conn: &mut SqliteConnection, food: &Food) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO food (key, name, brand, cal100, prot100, fat100, carb100, comment)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        ON CONFLICT (key) DO UPDATE SET
            name = excluded.name,
            brand = excluded.brand,
            cal100 = excluded.cal100,
            prot100 = excluded.prot100,
            fat100 = excluded.fat100,
            carb100 = excluded.carb100,
            comment = excluded.comment
    "#,
    )
    .bind(&food.key)
    .bind(&food.name)
    .bind(&food.brand)
    .bind(food.cal100)
    .bind(food.prot100)
    .bind(food.fat100)
    .bind(food.carb100)
    .bind(&food.comment)
    .execute(conn)
    .await
    .context("upsert food")?;
    Ok(())
}

pub async fn get(conn: &mut SqliteConnection, key: &str) -> anyhow::Result<Option<Food>> {
    let row = sqlx::query_as::<_, Food>(
        r#"
        SELECT key, name, brand, cal100, prot100, fat100, carb100, comment
        FROM food
        WHERE key = ?1
    "#,
    )
    .bind(key)
    .fetch_optional(conn)
    .await
    .context("get food")?;
    Ok(row)
}

pub async fn exists(conn: &mut SqliteConnection, key: &str) -> anyhow::Result<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM food WHERE key = ?1")
        .bind(key)
        .fetch_optional(conn)
        .await
        .context("check food exists")?;
    Ok(found.is_some())
}

pub async fn list(conn: &mut SqliteConnection) -> anyhow::Result<Vec<Food>> {
    let rows = sqlx::query_as::<_, Food>(
        r#"
        SELECT key, name, brand, cal100, prot100, fat100, carb100, comment
        FROM food
        ORDER BY key
    "#,
    )
    .fetch_all(conn)
    .await
    .context("list food")?;
    Ok(rows)
}

pub async fn list_by_name(conn: &mut SqliteConnection) -> anyhow::Result<Vec<Food>> {
    let rows = sqlx::query_as::<_, Food>(
        r#"
        SELECT key, name, brand, cal100, prot100, fat100, carb100, comment
        FROM food
        ORDER BY name, key
    "#,
    )
    .fetch_all(conn)
    .await
    .context("list food by name")?;
    Ok(rows)
}

/// Returns false when no row has `key`.
pub async fn set_comment(
    conn: &mut SqliteConnection,
    key: &str,
    comment: &str,
) -> anyhow::Result<bool> {
    let res = sqlx::query("UPDATE food SET comment = ?1 WHERE key = ?2")
        .bind(comment)
        .bind(key)
        .execute(conn)
        .await
        .context("update food comment")?;
    Ok(res.rows_affected() > 0)
}

pub async fn count_journal_refs(conn: &mut SqliteConnection, key: &str) -> anyhow::Result<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM journal WHERE food_key = ?1")
        .bind(key)
        .fetch_one(conn)
        .await
        .context("count journal refs")?;
    Ok(n)
}

pub async fn delete(conn: &mut SqliteConnection, key: &str) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM food WHERE key = ?1")
        .bind(key)
        .execute(conn)
        .await
        .context("delete food")?;
    Ok(())
}

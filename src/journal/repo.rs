use anyhow::Context;
use sqlx::{FromRow, SqliteConnection};
use time::Date;

use crate::models::{JournalEntry, Meal};

#[derive(Debug, FromRow)]
struct JournalRow {
    timestamp: Date,
    meal: i64,
    food_key: String,
    food_weight: f64,
}

impl From<JournalRow> for JournalEntry {
    fn from(row: JournalRow) -> Self {
        JournalEntry {
            timestamp: row.timestamp,
            meal: Meal::from_i64(row.meal),
            food_key: row.food_key,
            food_weight: row.food_weight,
        }
    }
}

pub async fn upsert(
    conn: &mut SqliteConnection,
    user_id: i64,
    entry: &JournalEntry,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO journal (user_id, timestamp, meal, food_key, food_weight)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT (user_id, timestamp, meal, food_key)
        DO UPDATE SET food_weight = excluded.food_weight
    "#,
    )
    .bind(user_id)
    .bind(entry.timestamp)
    .bind(entry.meal.as_i64())
    .bind(&entry.food_key)
    .bind(entry.food_weight)
    .execute(conn)
    .await
    .context("upsert journal")?;
    Ok(())
}

pub async fn delete_entry(
    conn: &mut SqliteConnection,
    user_id: i64,
    timestamp: Date,
    meal: Meal,
    food_key: &str,
) -> anyhow::Result<()> {
    sqlx::query(
        "DELETE FROM journal WHERE user_id = ?1 AND timestamp = ?2 AND meal = ?3 AND food_key = ?4",
    )
    .bind(user_id)
    .bind(timestamp)
    .bind(meal.as_i64())
    .bind(food_key)
    .execute(conn)
    .await
    .context("delete journal entry")?;
    Ok(())
}

pub async fn delete_meal(
    conn: &mut SqliteConnection,
    user_id: i64,
    timestamp: Date,
    meal: Meal,
) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM journal WHERE user_id = ?1 AND timestamp = ?2 AND meal = ?3")
        .bind(user_id)
        .bind(timestamp)
        .bind(meal.as_i64())
        .execute(conn)
        .await
        .context("delete journal meal")?;
    Ok(())
}

pub async fn list_meal(
    conn: &mut SqliteConnection,
    user_id: i64,
    timestamp: Date,
    meal: Meal,
) -> anyhow::Result<Vec<JournalEntry>> {
    let rows = sqlx::query_as::<_, JournalRow>(
        r#"
        SELECT timestamp, meal, food_key, food_weight
        FROM journal
        WHERE user_id = ?1 AND timestamp = ?2 AND meal = ?3
        ORDER BY food_key
    "#,
    )
    .bind(user_id)
    .bind(timestamp)
    .bind(meal.as_i64())
    .fetch_all(conn)
    .await
    .context("list journal meal")?;
    Ok(rows.into_iter().map(JournalEntry::from).collect())
}

pub async fn count_meal(
    conn: &mut SqliteConnection,
    user_id: i64,
    timestamp: Date,
    meal: Meal,
) -> anyhow::Result<i64> {
    let n: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM journal WHERE user_id = ?1 AND timestamp = ?2 AND meal = ?3",
    )
    .bind(user_id)
    .bind(timestamp)
    .bind(meal.as_i64())
    .fetch_one(conn)
    .await
    .context("count journal meal")?;
    Ok(n)
}

pub async fn count_range(
    conn: &mut SqliteConnection,
    user_id: i64,
    from: Date,
    to: Date,
) -> anyhow::Result<i64> {
    let n: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM journal WHERE user_id = ?1 AND timestamp BETWEEN ?2 AND ?3",
    )
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_one(conn)
    .await
    .context("count journal range")?;
    Ok(n)
}

pub async fn list_range(
    conn: &mut SqliteConnection,
    user_id: i64,
    from: Date,
    to: Date,
) -> anyhow::Result<Vec<JournalEntry>> {
    let rows = sqlx::query_as::<_, JournalRow>(
        r#"
        SELECT timestamp, meal, food_key, food_weight
        FROM journal
        WHERE user_id = ?1 AND timestamp BETWEEN ?2 AND ?3
        ORDER BY timestamp, meal, food_key
    "#,
    )
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(conn)
    .await
    .context("list journal range")?;
    Ok(rows.into_iter().map(JournalEntry::from).collect())
}

use anyhow::Context;
use sqlx::SqliteConnection;
use time::Date;

use crate::models::{Activity, Weight};

// --- weight ---

pub async fn upsert_weight(
    conn: &mut SqliteConnection,
    user_id: i64,
    w: &Weight,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO weight (user_id, timestamp, value)
        VALUES (?1, ?2, ?3)
        ON CONFLICT (user_id, timestamp) DO UPDATE SET value = excluded.value
    "#,
    )
    .bind(user_id)
    .bind(w.timestamp)
    .bind(w.value)
    .execute(conn)
    .await
    .context("upsert weight")?;
    Ok(())
}

pub async fn list_weight(
    conn: &mut SqliteConnection,
    user_id: i64,
    from: Date,
    to: Date,
) -> anyhow::Result<Vec<Weight>> {
    let rows = sqlx::query_as::<_, Weight>(
        r#"
        SELECT timestamp, value
        FROM weight
        WHERE user_id = ?1 AND timestamp BETWEEN ?2 AND ?3
        ORDER BY timestamp
    "#,
    )
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(conn)
    .await
    .context("list weight")?;
    Ok(rows)
}

pub async fn delete_weight(
    conn: &mut SqliteConnection,
    user_id: i64,
    timestamp: Date,
) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM weight WHERE user_id = ?1 AND timestamp = ?2")
        .bind(user_id)
        .bind(timestamp)
        .execute(conn)
        .await
        .context("delete weight")?;
    Ok(())
}

// --- activity ---

pub async fn upsert_activity(
    conn: &mut SqliteConnection,
    user_id: i64,
    a: &Activity,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO activity (user_id, timestamp, active_cal)
        VALUES (?1, ?2, ?3)
        ON CONFLICT (user_id, timestamp) DO UPDATE SET active_cal = excluded.active_cal
    "#,
    )
    .bind(user_id)
    .bind(a.timestamp)
    .bind(a.active_cal)
    .execute(conn)
    .await
    .context("upsert activity")?;
    Ok(())
}

pub async fn get_activity(
    conn: &mut SqliteConnection,
    user_id: i64,
    timestamp: Date,
) -> anyhow::Result<Option<Activity>> {
    let row = sqlx::query_as::<_, Activity>(
        "SELECT timestamp, active_cal FROM activity WHERE user_id = ?1 AND timestamp = ?2",
    )
    .bind(user_id)
    .bind(timestamp)
    .fetch_optional(conn)
    .await
    .context("get activity")?;
    Ok(row)
}

pub async fn list_activity(
    conn: &mut SqliteConnection,
    user_id: i64,
    from: Date,
    to: Date,
) -> anyhow::Result<Vec<Activity>> {
    let rows = sqlx::query_as::<_, Activity>(
        r#"
        SELECT timestamp, active_cal
        FROM activity
        WHERE user_id = ?1 AND timestamp BETWEEN ?2 AND ?3
        ORDER BY timestamp
    "#,
    )
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(conn)
    .await
    .context("list activity")?;
    Ok(rows)
}

pub async fn delete_activity(
    conn: &mut SqliteConnection,
    user_id: i64,
    timestamp: Date,
) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM activity WHERE user_id = ?1 AND timestamp = ?2")
        .bind(user_id)
        .bind(timestamp)
        .execute(conn)
        .await
        .context("delete activity")?;
    Ok(())
}

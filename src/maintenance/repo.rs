//! Whole-table reads for backups. Every user's rows are returned.

use std::collections::BTreeMap;

use anyhow::Context;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::{FromRow, SqliteConnection};
use time::Date;

use crate::day_format;
use crate::models::{Food, Meal};

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct BundleRecord {
    pub user_id: i64,
    pub key: String,
    pub items: Json<BTreeMap<String, f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct JournalRecord {
    pub user_id: i64,
    #[serde(with = "day_format")]
    pub timestamp: Date,
    #[sqlx(try_from = "i64")]
    pub meal: Meal,
    pub food_key: String,
    pub food_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct WeightRecord {
    pub user_id: i64,
    #[serde(with = "day_format")]
    pub timestamp: Date,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ActivityRecord {
    pub user_id: i64,
    #[serde(with = "day_format")]
    pub timestamp: Date,
    pub active_cal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct UserSettingsRecord {
    pub user_id: i64,
    pub cal_limit: f64,
    pub default_active_cal: f64,
}

pub async fn foods(conn: &mut SqliteConnection) -> anyhow::Result<Vec<Food>> {
    let rows = sqlx::query_as::<_, Food>(
        "SELECT key, name, brand, cal100, prot100, fat100, carb100, comment FROM food ORDER BY key",
    )
    .fetch_all(conn)
    .await
    .context("backup food")?;
    Ok(rows)
}

pub async fn bundles(conn: &mut SqliteConnection) -> anyhow::Result<Vec<BundleRecord>> {
    let rows = sqlx::query_as::<_, BundleRecord>(
        "SELECT user_id, key, items FROM bundle ORDER BY user_id, key",
    )
    .fetch_all(conn)
    .await
    .context("backup bundle")?;
    Ok(rows)
}

pub async fn journal(conn: &mut SqliteConnection) -> anyhow::Result<Vec<JournalRecord>> {
    let rows = sqlx::query_as::<_, JournalRecord>(
        r#"
        SELECT user_id, timestamp, meal, food_key, food_weight
        FROM journal
        ORDER BY user_id, timestamp, meal, food_key
    "#,
    )
    .fetch_all(conn)
    .await
    .context("backup journal")?;
    Ok(rows)
}

pub async fn weights(conn: &mut SqliteConnection) -> anyhow::Result<Vec<WeightRecord>> {
    let rows = sqlx::query_as::<_, WeightRecord>(
        "SELECT user_id, timestamp, value FROM weight ORDER BY user_id, timestamp",
    )
    .fetch_all(conn)
    .await
    .context("backup weight")?;
    Ok(rows)
}

pub async fn activities(conn: &mut SqliteConnection) -> anyhow::Result<Vec<ActivityRecord>> {
    let rows = sqlx::query_as::<_, ActivityRecord>(
        "SELECT user_id, timestamp, active_cal FROM activity ORDER BY user_id, timestamp",
    )
    .fetch_all(conn)
    .await
    .context("backup activity")?;
    Ok(rows)
}

pub async fn user_settings(conn: &mut SqliteConnection) -> anyhow::Result<Vec<UserSettingsRecord>> {
    let rows = sqlx::query_as::<_, UserSettingsRecord>(
        "SELECT user_id, cal_limit, default_active_cal FROM user_settings ORDER BY user_id",
    )
    .fetch_all(conn)
    .await
    .context("backup user settings")?;
    Ok(rows)
}

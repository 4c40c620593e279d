use anyhow::Context;
use sqlx::{FromRow, SqliteConnection};
use time::Date;

use super::aggregate::ReportLine;
use crate::models::{Food, JournalEntry, Meal};

#[derive(Debug, FromRow)]
struct ReportRow {
    timestamp: Date,
    meal: i64,
    food_key: String,
    food_weight: f64,
    name: String,
    brand: String,
    cal100: f64,
    prot100: f64,
    fat100: f64,
    carb100: f64,
    comment: String,
}

impl From<ReportRow> for ReportLine {
    fn from(r: ReportRow) -> Self {
        ReportLine {
            entry: JournalEntry {
                timestamp: r.timestamp,
                meal: Meal::from_i64(r.meal),
                food_key: r.food_key.clone(),
                food_weight: r.food_weight,
            },
            food: Food {
                key: r.food_key,
                name: r.name,
                brand: r.brand,
                cal100: r.cal100,
                prot100: r.prot100,
                fat100: r.fat100,
                carb100: r.carb100,
                comment: r.comment,
            },
        }
    }
}

/// Journal rows joined with their foods, ordered for report folding.
pub async fn lines(
    conn: &mut SqliteConnection,
    user_id: i64,
    from: Date,
    to: Date,
) -> anyhow::Result<Vec<ReportLine>> {
    let rows = sqlx::query_as::<_, ReportRow>(
        r#"
        SELECT j.timestamp, j.meal, j.food_key, j.food_weight,
               f.name, f.brand, f.cal100, f.prot100, f.fat100, f.carb100, f.comment
        FROM journal j
        JOIN food f ON f.key = j.food_key
        WHERE j.user_id = ?1 AND j.timestamp BETWEEN ?2 AND ?3
        ORDER BY j.timestamp, j.meal, f.name, j.food_key
    "#,
    )
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(conn)
    .await
    .context("select report lines")?;
    Ok(rows.into_iter().map(ReportLine::from).collect())
}

pub async fn food_weights(
    conn: &mut SqliteConnection,
    user_id: i64,
    from: Date,
    to: Date,
    food_key: &str,
) -> anyhow::Result<Vec<f64>> {
    let weights: Vec<f64> = sqlx::query_scalar(
        r#"
        SELECT food_weight
        FROM journal
        WHERE user_id = ?1 AND timestamp BETWEEN ?2 AND ?3 AND food_key = ?4
    "#,
    )
    .bind(user_id)
    .bind(from)
    .bind(to)
    .bind(food_key)
    .fetch_all(conn)
    .await
    .context("select food weights")?;
    Ok(weights)
}

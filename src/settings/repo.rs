use anyhow::Context;
use sqlx::{FromRow, SqliteConnection};

use crate::models::UserSettings;

#[derive(Debug, FromRow)]
struct SettingsRow {
    cal_limit: f64,
    default_active_cal: f64,
}

pub async fn upsert(
    conn: &mut SqliteConnection,
    user_id: i64,
    s: &UserSettings,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_settings (user_id, cal_limit, default_active_cal)
        VALUES (?1, ?2, ?3)
        ON CONFLICT (user_id) DO UPDATE SET
            cal_limit = excluded.cal_limit,
            default_active_cal = excluded.default_active_cal
    "#,
    )
    .bind(user_id)
    .bind(s.cal_limit)
    .bind(s.default_active_cal)
    .execute(conn)
    .await
    .context("upsert user settings")?;
    Ok(())
}

pub async fn get(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> anyhow::Result<Option<UserSettings>> {
    let row = sqlx::query_as::<_, SettingsRow>(
        "SELECT cal_limit, default_active_cal FROM user_settings WHERE user_id = ?1",
    )
    .bind(user_id)
    .fetch_optional(conn)
    .await
    .context("get user settings")?;
    Ok(row.map(|r| UserSettings {
        cal_limit: r.cal_limit,
        default_active_cal: r.default_active_cal,
    }))
}

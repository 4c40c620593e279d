use anyhow::Context;
use async_trait::async_trait;
use time::Date;
use tracing::instrument;

use super::aggregate::{self, MealReport, PeriodReport, PeriodStats};
use super::nutrition::mean;
use super::repo;
use crate::error::{StorageError, StorageResult};
use crate::measurements::repo as measurements_repo;
use crate::models::Meal;
use crate::settings::repo as settings_repo;
use crate::storage::SqliteStorage;

/// Longest accepted report period, in days.
pub const MAX_PERIOD_DAYS: i64 = 3660;

const REPORT_TIMEOUT_SCALE: u32 = 2;

pub fn validate_period(from: Date, to: Date) -> StorageResult<()> {
    if from > to || (to - from).whole_days() + 1 > MAX_PERIOD_DAYS {
        return Err(StorageError::InvalidPeriod);
    }
    Ok(())
}

/// Read-side aggregation over journal and food rows.
#[async_trait]
pub trait ReportStorage: Send + Sync {
    async fn get_journal_meal_report(
        &self,
        user_id: i64,
        timestamp: Date,
        meal: Meal,
    ) -> StorageResult<MealReport>;
    async fn get_journal_report(
        &self,
        user_id: i64,
        from: Date,
        to: Date,
    ) -> StorageResult<PeriodReport>;
    /// Per-day totals for every day of the period, with the calorie delta
    /// against the user's limit and the activity-adjusted budget when
    /// settings exist.
    async fn get_journal_stats(
        &self,
        user_id: i64,
        from: Date,
        to: Date,
    ) -> StorageResult<PeriodStats>;
    async fn get_journal_food_avg_weight(
        &self,
        user_id: i64,
        from: Date,
        to: Date,
        food_key: &str,
    ) -> StorageResult<f64>;
}

#[async_trait]
impl ReportStorage for SqliteStorage {
    #[instrument(skip(self))]
    async fn get_journal_meal_report(
        &self,
        user_id: i64,
        timestamp: Date,
        meal: Meal,
    ) -> StorageResult<MealReport> {
        self.run("get_journal_meal_report", REPORT_TIMEOUT_SCALE, async {
            let mut tx = self.begin().await?;
            let day = repo::lines(&mut tx, user_id, timestamp, timestamp).await?;
            tx.commit().await.context("commit tx")?;
            aggregate::meal_report(timestamp, meal, &day).ok_or(StorageError::JournalReportEmpty)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn get_journal_report(
        &self,
        user_id: i64,
        from: Date,
        to: Date,
    ) -> StorageResult<PeriodReport> {
        validate_period(from, to)?;
        self.run("get_journal_report", REPORT_TIMEOUT_SCALE, async {
            let mut tx = self.begin().await?;
            let lines = repo::lines(&mut tx, user_id, from, to).await?;
            tx.commit().await.context("commit tx")?;
            aggregate::period_report(from, to, &lines).ok_or(StorageError::JournalReportEmpty)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn get_journal_stats(
        &self,
        user_id: i64,
        from: Date,
        to: Date,
    ) -> StorageResult<PeriodStats> {
        validate_period(from, to)?;
        self.run("get_journal_stats", REPORT_TIMEOUT_SCALE, async {
            let mut tx = self.begin().await?;
            let lines = repo::lines(&mut tx, user_id, from, to).await?;
            let activities = measurements_repo::list_activity(&mut tx, user_id, from, to).await?;
            let settings = settings_repo::get(&mut tx, user_id).await?;
            tx.commit().await.context("commit tx")?;
            Ok(aggregate::period_stats(
                from,
                to,
                &lines,
                &activities,
                settings.as_ref(),
            ))
        })
        .await
    }

    #[instrument(skip(self))]
    async fn get_journal_food_avg_weight(
        &self,
        user_id: i64,
        from: Date,
        to: Date,
        food_key: &str,
    ) -> StorageResult<f64> {
        validate_period(from, to)?;
        self.run("get_journal_food_avg_weight", REPORT_TIMEOUT_SCALE, async {
            let mut tx = self.begin().await?;
            let weights = repo::food_weights(&mut tx, user_id, from, to, food_key).await?;
            tx.commit().await.context("commit tx")?;
            mean(&weights).ok_or(StorageError::JournalReportEmpty)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundles::services::BundleStorage;
    use crate::food::services::FoodStorage;
    use crate::journal::services::JournalStorage;
    use crate::measurements::services::MeasurementStorage;
    use crate::models::{Activity, Bundle, JournalEntry, UserSettings};
    use crate::reports::nutrition::Nutrition;
    use crate::settings::services::SettingsStorage;
    use crate::storage::test_support::{food, memory_storage};
    use time::macros::date;

    const USER: i64 = 7;

    async fn log(stg: &SqliteStorage, ts: Date, meal: Meal, key: &str, weight: f64) {
        stg.set_journal(
            USER,
            &JournalEntry {
                timestamp: ts,
                meal,
                food_key: key.into(),
                food_weight: weight,
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn egg_meal_report() {
        let stg = memory_storage().await;
        stg.set_food(&food("egg", 155.0, 13.0, 11.0, 1.1)).await.unwrap();
        let d = date!(2024 - 01 - 01);
        log(&stg, d, Meal::Breakfast, "egg", 100.0).await;

        let r = stg.get_journal_meal_report(USER, d, Meal::Breakfast).await.unwrap();
        assert_eq!(r.items.len(), 1);
        assert_eq!(
            r.total,
            Nutrition { cal: 155.0, prot: 13.0, fat: 11.0, carb: 1.1 }
        );
        assert_eq!(r.day_total, r.total);

        let err = stg.get_journal_meal_report(USER, d, Meal::Lunch).await.unwrap_err();
        assert!(matches!(err, StorageError::JournalReportEmpty));
    }

    #[tokio::test]
    async fn report_after_bundle_expansion() {
        let stg = memory_storage().await;
        stg.set_food(&food("egg", 155.0, 13.0, 11.0, 1.1)).await.unwrap();
        stg.set_food(&food("toast", 260.0, 8.0, 3.0, 50.0)).await.unwrap();
        let bundle = Bundle {
            key: "breakfast".into(),
            items: [("egg".to_string(), 100.0), ("toast".to_string(), 50.0)].into(),
        };
        stg.set_bundle(USER, &bundle).await.unwrap();
        let d = date!(2024 - 01 - 01);
        stg.set_journal_bundle(USER, d, Meal::Breakfast, "breakfast").await.unwrap();

        let r = stg.get_journal_meal_report(USER, d, Meal::Breakfast).await.unwrap();
        assert_eq!(r.items.len(), 2);
        assert!((r.total.cal - 285.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn period_report_and_users_are_isolated() {
        let stg = memory_storage().await;
        stg.set_food(&food("egg", 155.0, 13.0, 11.0, 1.1)).await.unwrap();
        log(&stg, date!(2024 - 01 - 01), Meal::Dinner, "egg", 100.0).await;
        log(&stg, date!(2024 - 01 - 01), Meal::Breakfast, "egg", 50.0).await;
        log(&stg, date!(2024 - 01 - 05), Meal::Lunch, "egg", 200.0).await;

        let r = stg
            .get_journal_report(USER, date!(2024 - 01 - 01), date!(2024 - 01 - 31))
            .await
            .unwrap();
        assert_eq!(r.days.len(), 2);
        assert_eq!(r.days[0].meals[0].meal, Meal::Breakfast);
        assert_eq!(r.days[0].meals[1].meal, Meal::Dinner);
        assert!((r.total.cal - 542.5).abs() < 1e-9);

        let err = stg
            .get_journal_report(USER + 1, date!(2024 - 01 - 01), date!(2024 - 01 - 31))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::JournalReportEmpty));
    }

    #[tokio::test]
    async fn stats_use_settings_limit() {
        let stg = memory_storage().await;
        stg.set_food(&food("egg", 155.0, 13.0, 11.0, 1.1)).await.unwrap();
        log(&stg, date!(2024 - 01 - 02), Meal::Lunch, "egg", 1000.0).await;
        let (from, to) = (date!(2024 - 01 - 01), date!(2024 - 01 - 07));

        let s = stg.get_journal_stats(USER, from, to).await.unwrap();
        assert_eq!(s.days.len(), 7);
        assert!(s.days.iter().all(|d| d.delta.is_none()));

        stg.set_user_settings(USER, &UserSettings { cal_limit: 2000.0, default_active_cal: 0.0 })
            .await
            .unwrap();
        let s = stg.get_journal_stats(USER, from, to).await.unwrap();
        assert_eq!(s.cal_limit, Some(2000.0));
        assert_eq!(s.days[0].delta, Some(-2000.0));
        assert_eq!(s.days[1].delta, Some(-450.0));
        assert!((s.average.cal - 1550.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn stats_budget_counts_activity() {
        let stg = memory_storage().await;
        stg.set_food(&food("egg", 155.0, 13.0, 11.0, 1.1)).await.unwrap();
        log(&stg, date!(2024 - 01 - 01), Meal::Lunch, "egg", 1000.0).await;
        let active = |timestamp, active_cal| Activity { timestamp, active_cal };
        stg.set_activity(USER, &active(date!(2024 - 01 - 01), 400.0)).await.unwrap();
        stg.set_activity(USER + 1, &active(date!(2024 - 01 - 02), 999.0)).await.unwrap();
        stg.set_user_settings(USER, &UserSettings { cal_limit: 2000.0, default_active_cal: 150.0 })
            .await
            .unwrap();

        let s = stg
            .get_journal_stats(USER, date!(2024 - 01 - 01), date!(2024 - 01 - 02))
            .await
            .unwrap();
        assert_eq!(s.days[0].active_cal, Some(400.0));
        assert_eq!(s.days[0].budget_delta, Some(850.0));
        assert_eq!(s.days[0].delta, Some(-450.0));
        assert_eq!(s.days[1].active_cal, Some(150.0));
        assert_eq!(s.days[1].budget_delta, Some(2150.0));
    }

    #[tokio::test]
    async fn period_bounds() {
        let stg = memory_storage().await;
        let err = stg
            .get_journal_stats(USER, date!(2024 - 01 - 02), date!(2024 - 01 - 01))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidPeriod));

        let err = stg
            .get_journal_report(USER, date!(2000 - 01 - 01), date!(2024 - 01 - 01))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidPeriod));

        assert!(validate_period(date!(2024 - 01 - 01), date!(2024 - 01 - 01)).is_ok());
    }

    #[tokio::test]
    async fn food_average_weight() {
        let stg = memory_storage().await;
        stg.set_food(&food("egg", 155.0, 13.0, 11.0, 1.1)).await.unwrap();
        log(&stg, date!(2024 - 01 - 01), Meal::Breakfast, "egg", 100.0).await;
        log(&stg, date!(2024 - 01 - 02), Meal::Breakfast, "egg", 200.0).await;
        log(&stg, date!(2024 - 02 - 01), Meal::Breakfast, "egg", 900.0).await;

        let avg = stg
            .get_journal_food_avg_weight(USER, date!(2024 - 01 - 01), date!(2024 - 01 - 31), "egg")
            .await
            .unwrap();
        assert_eq!(avg, 150.0);

        let err = stg
            .get_journal_food_avg_weight(USER, date!(2024 - 01 - 01), date!(2024 - 01 - 31), "rice")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::JournalReportEmpty));
    }
}

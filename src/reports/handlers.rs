use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use serde::Deserialize;
use time::Date;
use tracing::instrument;

use super::aggregate::{MealReport, PeriodReport, PeriodStats};
use crate::day_format;
use crate::extractors::UserId;
use crate::models::Meal;
use crate::response::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::storage::ReportStorage;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/journal/meal", get(meal_report))
        .route("/journal/report", get(period_report))
        .route("/journal/stats", get(period_stats))
        .route("/journal/food-avg", get(food_avg_weight))
}

#[derive(Debug, Deserialize)]
pub struct MealQuery {
    #[serde(with = "day_format")]
    pub date: Date,
    pub meal: Meal,
}

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    #[serde(with = "day_format")]
    pub from: Date,
    #[serde(with = "day_format")]
    pub to: Date,
}

#[derive(Debug, Deserialize)]
pub struct FoodAvgQuery {
    #[serde(with = "day_format")]
    pub from: Date,
    #[serde(with = "day_format")]
    pub to: Date,
    pub food_key: String,
}

#[instrument(skip(state))]
pub async fn meal_report(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(q): Query<MealQuery>,
) -> ApiResult<MealReport> {
    let res = state
        .storage
        .get_journal_meal_report(user_id, q.date, q.meal)
        .await;
    ApiResponse::from_result("get_journal_meal_report", res)
}

#[instrument(skip(state))]
pub async fn period_report(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(q): Query<PeriodQuery>,
) -> ApiResult<PeriodReport> {
    let res = state.storage.get_journal_report(user_id, q.from, q.to).await;
    ApiResponse::from_result("get_journal_report", res)
}

#[instrument(skip(state))]
pub async fn period_stats(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(q): Query<PeriodQuery>,
) -> ApiResult<PeriodStats> {
    let res = state.storage.get_journal_stats(user_id, q.from, q.to).await;
    ApiResponse::from_result("get_journal_stats", res)
}

#[instrument(skip(state))]
pub async fn food_avg_weight(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(q): Query<FoodAvgQuery>,
) -> ApiResult<f64> {
    let res = state
        .storage
        .get_journal_food_avg_weight(user_id, q.from, q.to, &q.food_key)
        .await;
    ApiResponse::from_result("get_journal_food_avg_weight", res)
}

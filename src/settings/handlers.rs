use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use super::energy::{calc_daily_norms, DailyNorms, Gender};
use crate::error::StorageError;
use crate::extractors::UserId;
use crate::models::UserSettings;
use crate::response::{self, ApiResponse, ApiResult};
use crate::state::AppState;
use crate::storage::SettingsStorage;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/settings", get(get_settings).post(set_settings))
        .route("/settings/norms", get(daily_norms))
}

#[derive(Debug, Deserialize)]
pub struct NormsQuery {
    pub gender: Gender,
    pub weight: f64,
    pub height: f64,
    pub age: f64,
}

#[instrument(skip(state))]
pub async fn get_settings(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> ApiResult<UserSettings> {
    ApiResponse::from_result("get_user_settings", state.storage.get_user_settings(user_id).await)
}

#[instrument(skip(state))]
pub async fn set_settings(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(body): Json<UserSettings>,
) -> ApiResult<&'static str> {
    response::ok(
        "set_user_settings",
        state.storage.set_user_settings(user_id, &body).await,
    )
}

#[instrument]
pub async fn daily_norms(Query(q): Query<NormsQuery>) -> ApiResult<DailyNorms> {
    let res = calc_daily_norms(q.gender, q.weight, q.height, q.age)
        .ok_or(StorageError::InvalidUserSettings);
    ApiResponse::from_result("calc_daily_norms", res)
}

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use time::Date;
use tracing::instrument;

use crate::day_format;
use crate::extractors::UserId;
use crate::models::{Activity, Weight};
use crate::reports::handlers::PeriodQuery;
use crate::response::{self, ApiResponse, ApiResult};
use crate::state::AppState;
use crate::storage::MeasurementStorage;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/weight", get(list_weight).post(set_weight))
        .route("/weight/:date", delete(delete_weight))
        .route("/activity", get(list_activity).post(set_activity))
        .route("/activity/:date", get(get_activity).delete(delete_activity))
}

#[derive(Debug, Deserialize)]
pub struct DayPath {
    #[serde(with = "day_format")]
    pub date: Date,
}

#[instrument(skip(state))]
pub async fn list_weight(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(q): Query<PeriodQuery>,
) -> ApiResult<Vec<Weight>> {
    ApiResponse::from_list(
        "get_weight_list",
        state.storage.get_weight_list(user_id, q.from, q.to).await,
    )
}

#[instrument(skip(state))]
pub async fn set_weight(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(body): Json<Weight>,
) -> ApiResult<&'static str> {
    response::ok("set_weight", state.storage.set_weight(user_id, &body).await)
}

#[instrument(skip(state))]
pub async fn delete_weight(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(p): Path<DayPath>,
) -> ApiResult<&'static str> {
    response::ok("delete_weight", state.storage.delete_weight(user_id, p.date).await)
}

#[instrument(skip(state))]
pub async fn list_activity(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(q): Query<PeriodQuery>,
) -> ApiResult<Vec<Activity>> {
    ApiResponse::from_list(
        "get_activity_list",
        state.storage.get_activity_list(user_id, q.from, q.to).await,
    )
}

#[instrument(skip(state))]
pub async fn get_activity(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(p): Path<DayPath>,
) -> ApiResult<Activity> {
    ApiResponse::from_result("get_activity", state.storage.get_activity(user_id, p.date).await)
}

#[instrument(skip(state))]
pub async fn set_activity(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(body): Json<Activity>,
) -> ApiResult<&'static str> {
    response::ok("set_activity", state.storage.set_activity(user_id, &body).await)
}

#[instrument(skip(state))]
pub async fn delete_activity(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(p): Path<DayPath>,
) -> ApiResult<&'static str> {
    response::ok("delete_activity", state.storage.delete_activity(user_id, p.date).await)
}

use axum::{extract::State, routing::post, Json, Router};
use tracing::instrument;

use super::dto::{
    CopyJournalRequest, CopyWeekRequest, DeleteJournalRequest, DeleteMealRequest,
    ExpandBundleRequest,
};
use crate::extractors::UserId;
use crate::models::JournalEntry;
use crate::response::{self, ApiResponse, ApiResult};
use crate::state::AppState;
use crate::storage::JournalStorage;

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/journal", post(set_journal))
        .route("/journal/delete", post(delete_journal))
        .route("/journal/delete-meal", post(delete_journal_meal))
        .route("/journal/bundle", post(set_journal_bundle))
        .route("/journal/copy", post(copy_journal))
        .route("/journal/copy-week", post(copy_journal_week))
}

#[instrument(skip(state, body))]
pub async fn set_journal(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(body): Json<JournalEntry>,
) -> ApiResult<&'static str> {
    response::ok("set_journal", state.storage.set_journal(user_id, &body).await)
}

#[instrument(skip(state))]
pub async fn delete_journal(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(body): Json<DeleteJournalRequest>,
) -> ApiResult<&'static str> {
    let res = state
        .storage
        .delete_journal(user_id, body.timestamp, body.meal, &body.food_key)
        .await;
    response::ok("delete_journal", res)
}

#[instrument(skip(state))]
pub async fn delete_journal_meal(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(body): Json<DeleteMealRequest>,
) -> ApiResult<&'static str> {
    let res = state
        .storage
        .delete_journal_meal(user_id, body.timestamp, body.meal)
        .await;
    response::ok("delete_journal_meal", res)
}

/// POST /journal/bundle -> number of entries written
#[instrument(skip(state))]
pub async fn set_journal_bundle(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(body): Json<ExpandBundleRequest>,
) -> ApiResult<usize> {
    let res = state
        .storage
        .set_journal_bundle(user_id, body.timestamp, body.meal, &body.bundle_key)
        .await;
    ApiResponse::from_result("set_journal_bundle", res)
}

#[instrument(skip(state))]
pub async fn copy_journal(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(body): Json<CopyJournalRequest>,
) -> ApiResult<usize> {
    let res = state
        .storage
        .copy_journal(user_id, body.from, body.from_meal, body.to, body.to_meal)
        .await;
    ApiResponse::from_result("copy_journal", res)
}

#[instrument(skip(state))]
pub async fn copy_journal_week(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(body): Json<CopyWeekRequest>,
) -> ApiResult<usize> {
    let res = state.storage.copy_journal_week(user_id, body.from, body.to).await;
    ApiResponse::from_result("copy_journal_week", res)
}

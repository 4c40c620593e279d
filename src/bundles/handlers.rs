use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use tracing::instrument;

use super::dto::SetBundleRequest;
use crate::extractors::UserId;
use crate::models::Bundle;
use crate::response::{self, ApiResponse, ApiResult};
use crate::state::AppState;
use crate::storage::BundleStorage;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/bundles", get(list_bundles))
        .route("/bundles/:key", get(get_bundle))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/bundles", post(set_bundle))
        .route("/bundles/:key", delete(delete_bundle))
}

#[instrument(skip(state))]
pub async fn list_bundles(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> ApiResult<Vec<Bundle>> {
    ApiResponse::from_list("get_bundle_list", state.storage.get_bundle_list(user_id).await)
}

#[instrument(skip(state))]
pub async fn get_bundle(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(key): Path<String>,
) -> ApiResult<Bundle> {
    ApiResponse::from_result("get_bundle", state.storage.get_bundle(user_id, &key).await)
}

#[instrument(skip(state, body))]
pub async fn set_bundle(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(body): Json<SetBundleRequest>,
) -> ApiResult<&'static str> {
    let bundle = Bundle::from(body);
    response::ok("set_bundle", state.storage.set_bundle(user_id, &bundle).await)
}

#[instrument(skip(state))]
pub async fn delete_bundle(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(key): Path<String>,
) -> ApiResult<&'static str> {
    response::ok("delete_bundle", state.storage.delete_bundle(user_id, &key).await)
}

use axum::{extract::State, routing::get, Router};
use tracing::instrument;

use super::services::Backup;
use crate::response::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::storage::MaintenanceStorage;

pub fn routes() -> Router<AppState> {
    Router::new().route("/backup", get(backup))
}

#[instrument(skip(state))]
pub async fn backup(State(state): State<AppState>) -> ApiResult<Backup> {
    ApiResponse::from_result("backup", state.storage.backup().await)
}

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{SearchQuery, SetCommentRequest, SetFoodRequest};
use crate::models::Food;
use crate::response::{self, ApiResponse, ApiResult};
use crate::state::AppState;
use crate::storage::FoodStorage;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/food", get(list_food))
        .route("/food/search", get(find_food))
        .route("/food/:key", get(get_food))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/food", post(set_food))
        .route("/food/:key", axum::routing::delete(delete_food))
        .route("/food/:key/comment", post(set_food_comment))
}

#[instrument(skip(state))]
pub async fn list_food(State(state): State<AppState>) -> ApiResult<Vec<Food>> {
    ApiResponse::from_list("get_food_list", state.storage.get_food_list().await)
}

#[instrument(skip(state))]
pub async fn find_food(
    State(state): State<AppState>,
    Query(q): Query<SearchQuery>,
) -> ApiResult<Vec<Food>> {
    ApiResponse::from_list("find_food", state.storage.find_food(&q.q).await)
}

#[instrument(skip(state))]
pub async fn get_food(State(state): State<AppState>, Path(key): Path<String>) -> ApiResult<Food> {
    ApiResponse::from_result("get_food", state.storage.get_food(&key).await)
}

/// POST /food { food, is_edit } -> stored food (new foods get a fresh key)
#[instrument(skip(state, body))]
pub async fn set_food(
    State(state): State<AppState>,
    Json(body): Json<SetFoodRequest>,
) -> ApiResult<Food> {
    let key = if body.is_edit {
        body.food.key.clone()
    } else {
        Uuid::new_v4().to_string()
    };
    let food = body.food.into_food(key);
    let res = state.storage.set_food(&food).await;
    ApiResponse::from_result("set_food", res.map(|_| food))
}

#[instrument(skip(state, body))]
pub async fn set_food_comment(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(body): Json<SetCommentRequest>,
) -> ApiResult<&'static str> {
    response::ok(
        "set_food_comment",
        state.storage.set_food_comment(&key, &body.comment).await,
    )
}

#[instrument(skip(state))]
pub async fn delete_food(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<&'static str> {
    response::ok("delete_food", state.storage.delete_food(&key).await)
}

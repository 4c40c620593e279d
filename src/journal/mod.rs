mod dto;
pub mod handlers;
pub(crate) mod repo;
pub mod services;
pub mod week;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::write_routes())
}

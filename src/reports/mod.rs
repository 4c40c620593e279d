pub mod aggregate;
pub mod handlers;
pub mod nutrition;
mod repo;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::read_routes()
}

//! Admin API endpoints for operating the cache

pub mod cache;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

/// Create admin API router
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route(
            "/cache/stats",
            get(cache::get_stats).delete(cache::reset_stats),
        )
        .route("/cache/cleanup", post(cache::cleanup))
}

//! v1 API consumed by the tool-execution layer

pub mod tool_cache;

use axum::{routing::post, Router};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/tool-cache/search", post(tool_cache::search))
        .route("/tool-cache/store", post(tool_cache::store))
}

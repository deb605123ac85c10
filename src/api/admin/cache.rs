//! Cache statistics and maintenance endpoints

use axum::{extract::State, http::StatusCode};
use serde::Serialize;
use tracing::info;

use crate::api::middleware::RequireService;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::tool_cache::ToolCacheStats;

#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub deleted: usize,
}

/// GET /admin/cache/stats
pub async fn get_stats(
    State(state): State<AppState>,
    _service: RequireService,
) -> Result<Json<ToolCacheStats>, ApiError> {
    Ok(Json(state.tool_cache.stats()))
}

/// DELETE /admin/cache/stats
pub async fn reset_stats(
    State(state): State<AppState>,
    RequireService(caller): RequireService,
) -> Result<StatusCode, ApiError> {
    info!(caller = caller.as_deref().unwrap_or("unknown"), "Resetting tool cache statistics");
    state.tool_cache.reset_stats();

    Ok(StatusCode::NO_CONTENT)
}

/// POST /admin/cache/cleanup
pub async fn cleanup(
    State(state): State<AppState>,
    RequireService(caller): RequireService,
) -> Result<Json<CleanupResponse>, ApiError> {
    if !state.tool_cache.is_ready() {
        return Err(ApiError::unavailable("Tool cache is not ready").with_code("cache_not_ready"));
    }

    info!(caller = caller.as_deref().unwrap_or("unknown"), "Tool cache cleanup requested");
    let deleted = state.tool_cache.cleanup_expired().await;

    Ok(Json(CleanupResponse { deleted }))
}

//! Tool cache lookup and write endpoints
//!
//! A lookup never fails because of the cache itself: outages and denials
//! both come back as `{"hit": null}`.

use axum::extract::State;
use serde::Serialize;
use tracing::debug;

use crate::api::middleware::RequireService;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::tool_cache::{SearchHit, SearchRequest, StoreRequest};

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub hit: Option<SearchHit>,
}

#[derive(Debug, Serialize)]
pub struct StoreResponse {
    pub stored: bool,
}

/// POST /v1/tool-cache/search
pub async fn search(
    State(state): State<AppState>,
    RequireService(caller): RequireService,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    require("tenantId", &request.tenant_id)?;
    require("toolName", &request.tool_name)?;
    require("userId", &request.user_id)?;

    debug!(
        caller = caller.as_deref().unwrap_or("unknown"),
        tenant_id = %request.tenant_id,
        tool_name = %request.tool_name,
        "Tool cache search request"
    );

    let hit = state.tool_cache.search(&request).await;

    Ok(Json(SearchResponse { hit }))
}

/// POST /v1/tool-cache/store
pub async fn store(
    State(state): State<AppState>,
    RequireService(caller): RequireService,
    Json(request): Json<StoreRequest>,
) -> Result<Json<StoreResponse>, ApiError> {
    require("tenantId", &request.tenant_id)?;
    require("toolName", &request.tool_name)?;
    require("userId", &request.user_id)?;

    debug!(
        caller = caller.as_deref().unwrap_or("unknown"),
        tenant_id = %request.tenant_id,
        tool_name = %request.tool_name,
        "Tool cache store request"
    );

    let stored = state.tool_cache.store(&request).await;

    Ok(Json(StoreResponse { stored }))
}

fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(
            ApiError::bad_request(format!("{} is required", field)).with_code("missing_field")
        );
    }

    Ok(())
}

//! Health check endpoints for Kubernetes probes

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::state::AppState;
use crate::api::types::Json;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Ordered so the worst component status wins
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Serialize)]
pub struct HealthCheck {
    pub name: &'static str,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION"),
        checks: None,
        latency_ms: None,
    })
}

/// GET /ready
///
/// A cache that failed to bootstrap still serves (every lookup misses), so it
/// reports degraded with 200. An unreachable vector store is unhealthy.
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let checks = vec![check_bootstrap(&state), check_vector_store(&state).await];
    let status = overall_status(&checks);

    let status_code = match status {
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    };

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        checks: Some(checks),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    (status_code, Json(response))
}

/// GET /live
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

fn overall_status(checks: &[HealthCheck]) -> HealthStatus {
    checks
        .iter()
        .map(|check| check.status)
        .max()
        .unwrap_or(HealthStatus::Healthy)
}

fn check_bootstrap(state: &AppState) -> HealthCheck {
    let ready = state.tool_cache.is_ready();

    HealthCheck {
        name: "tool_cache",
        status: if ready {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded
        },
        message: (!ready).then(|| "cache disabled, all lookups miss".to_string()),
        latency_ms: None,
    }
}

async fn check_vector_store(state: &AppState) -> HealthCheck {
    let start = Instant::now();
    let result = state.tool_cache.health_check().await;

    HealthCheck {
        name: "vector_store",
        status: if result.is_ok() {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        },
        message: result.err().map(|e| e.to_string()),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::DomainError;
    use crate::infrastructure::services::MockToolResultCacheTrait;

    fn check(status: HealthStatus) -> HealthCheck {
        HealthCheck {
            name: "component",
            status,
            message: None,
            latency_ms: None,
        }
    }

    #[test]
    fn test_worst_status_wins() {
        assert_eq!(overall_status(&[]), HealthStatus::Healthy);
        assert_eq!(
            overall_status(&[check(HealthStatus::Healthy), check(HealthStatus::Degraded)]),
            HealthStatus::Degraded
        );
        assert_eq!(
            overall_status(&[check(HealthStatus::Unhealthy), check(HealthStatus::Degraded)]),
            HealthStatus::Unhealthy
        );
    }

    #[test]
    fn test_not_ready_cache_is_degraded() {
        let mut cache = MockToolResultCacheTrait::new();
        cache.expect_is_ready().return_const(false);

        let check = check_bootstrap(&AppState::new(Arc::new(cache)));

        assert_eq!(check.status, HealthStatus::Degraded);
        assert!(check.message.is_some());
    }

    #[tokio::test]
    async fn test_store_failure_is_unhealthy() {
        let mut cache = MockToolResultCacheTrait::new();
        cache
            .expect_health_check()
            .returning(|| Err(DomainError::storage("Connection refused")));

        let check = check_vector_store(&AppState::new(Arc::new(cache))).await;

        assert_eq!(check.status, HealthStatus::Unhealthy);
        assert!(check.message.unwrap().contains("Connection refused"));
    }

    #[test]
    fn test_response_omits_empty_checks() {
        let response = HealthResponse {
            status: HealthStatus::Healthy,
            version: "1.0.0",
            checks: None,
            latency_ms: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(!json.contains("checks"));
    }
}

//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use regex::Regex;

/// Cache lookups, labelled by `outcome`
pub const LOOKUPS_TOTAL: &str = "tool_cache_lookups_total";
/// Cache writes, labelled by `outcome`
pub const STORES_TOTAL: &str = "tool_cache_stores_total";
/// RBAC checks on cross-user candidates, labelled by `decision`
pub const ACCESS_CHECKS_TOTAL: &str = "tool_cache_access_checks_total";
/// Rows removed by expiry sweeps
pub const CLEANUP_DELETED_TOTAL: &str = "tool_cache_cleanup_deleted_total";
/// End-to-end lookup latency
pub const LOOKUP_DURATION_SECONDS: &str = "tool_cache_lookup_duration_seconds";

static UUID_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("valid uuid regex")
});

static NUMERIC_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\d+(/|$)").expect("valid numeric segment regex"));

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Install the Prometheus recorder
///
/// Returns `None` when disabled or when a recorder is already installed;
/// metric macros are then no-ops.
pub fn init_metrics(enabled: bool) -> Option<PrometheusMetrics> {
    if !enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("tool_cache_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
            tracing::info!("Prometheus metrics initialized at /metrics");

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Record the outcome of one cache lookup
pub fn record_lookup(outcome: &'static str, duration: Duration) {
    counter!(LOOKUPS_TOTAL, "outcome" => outcome).increment(1);
    histogram!(LOOKUP_DURATION_SECONDS, "outcome" => outcome).record(duration.as_secs_f64());
}

/// Record the outcome of one cache write
pub fn record_store(outcome: &'static str) {
    counter!(STORES_TOTAL, "outcome" => outcome).increment(1);
}

/// Record one RBAC decision
pub fn record_access_check(decision: &'static str) {
    counter!(ACCESS_CHECKS_TOTAL, "decision" => decision).increment(1);
}

/// Record rows removed by an expiry sweep
pub fn record_cleanup(deleted: usize) {
    counter!(CLEANUP_DELETED_TOTAL).increment(deleted as u64);
}

/// Replace ids in a URL path so labels stay low-cardinality
fn sanitize_path(path: &str) -> String {
    let path = UUID_SEGMENT.replace_all(path, "{id}");
    let path = NUMERIC_SEGMENT.replace_all(&path, "/{id}$1");

    crate::domain::tool_cache::truncate_chars(&path, 50).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path_uuid() {
        let path = "/admin/cache/550e8400-e29b-41d4-a716-446655440000";
        assert_eq!(sanitize_path(path), "/admin/cache/{id}");
    }

    #[test]
    fn test_sanitize_path_numeric_id() {
        assert_eq!(sanitize_path("/v1/tool-cache/123/hits"), "/v1/tool-cache/{id}/hits");
    }

    #[test]
    fn test_sanitize_path_no_id() {
        assert_eq!(sanitize_path("/health"), "/health");
    }

    #[test]
    fn test_sanitize_path_truncates_long_paths() {
        let path = "/very/long/path/that/exceeds/the/maximum/allowed/length/for/metrics";
        assert!(sanitize_path(path).len() <= 50);
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_lookup("hit", Duration::from_millis(3));
        record_store("stored");
        record_access_check("denied");
        record_cleanup(4);
    }
}

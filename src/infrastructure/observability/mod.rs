//! Observability infrastructure - Prometheus metrics

mod metrics;

pub use metrics::{
    create_metrics_router, init_metrics, record_access_check, record_cleanup,
    record_http_request, record_lookup, record_store, PrometheusMetrics, ACCESS_CHECKS_TOTAL,
    CLEANUP_DELETED_TOTAL, LOOKUPS_TOTAL, LOOKUP_DURATION_SECONDS, STORES_TOTAL,
};

//! API middleware components

pub mod metrics;
pub mod service_auth;

pub use metrics::metrics_middleware;
pub use service_auth::{RequireService, SERVICE_AUTH_HEADER, SERVICE_NAME_HEADER};

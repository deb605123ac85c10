//! Infrastructure layer - External service implementations

pub mod access;
pub mod embedding;
pub mod hit_counter;
pub mod http_client;
pub mod logging;
pub mod observability;
pub mod services;
pub mod vector_store;

//! Semantic Tool Cache
//!
//! A cross-user semantic cache for cloud tool results:
//! - Lookups match on embedding similarity within a tenant and tool
//! - Read results scoped to a cloud resource are shared between users
//! - Every cross-user hit is re-checked against the RBAC service
//! - Pluggable vector store, embedding provider and hit counter backends

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::DomainError;
use infrastructure::access::AccessCheckerFactory;
use infrastructure::embedding::EmbeddingProviderFactory;
use infrastructure::hit_counter::HitCounterFactory;
use infrastructure::services::ToolResultCache;
use infrastructure::vector_store::VectorStoreFactory;

/// Build the tool result cache from configuration
///
/// The returned cache is not bootstrapped; call
/// [`ToolResultCache::initialize`] before serving.
pub async fn create_tool_cache(config: &AppConfig) -> Result<Arc<ToolResultCache>, DomainError> {
    let embedder = EmbeddingProviderFactory::create(&config.embedding)?;
    let store = VectorStoreFactory::create(&config.vector_store, &config.cache.collection())?;
    let hit_counter = HitCounterFactory::create(&config.hit_counter).await?;
    let access_checker = AccessCheckerFactory::create(&config.access)?;

    Ok(Arc::new(ToolResultCache::new(
        config.cache.clone(),
        embedder,
        store,
        hit_counter,
        access_checker,
    )))
}

/// Build the HTTP application state around a cache
pub fn create_app_state(config: &AppConfig, tool_cache: Arc<ToolResultCache>) -> AppState {
    AppState::new(tool_cache).with_service_key(config.sidecar.service_key.clone())
}

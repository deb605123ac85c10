//! Vector store factory for runtime selection

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::{VectorStoreBackend, VectorStoreConfig};
use crate::domain::tool_cache::VectorStore;
use crate::domain::DomainError;

use super::in_memory::InMemoryVectorStore;
use super::pgvector::{PgvectorConfig, PgvectorStore};

/// Factory for creating vector store instances
#[derive(Debug, Default)]
pub struct VectorStoreFactory;

impl VectorStoreFactory {
    /// Creates a vector store for the versioned `collection`
    ///
    /// The Postgres pool connects lazily, so an unreachable database surfaces
    /// at bootstrap rather than here.
    pub fn create(
        config: &VectorStoreConfig,
        collection: &str,
    ) -> Result<Arc<dyn VectorStore>, DomainError> {
        match config.backend {
            VectorStoreBackend::InMemory => {
                info!("Using in-memory vector store");
                Ok(Arc::new(InMemoryVectorStore::new()))
            }
            VectorStoreBackend::Pgvector => {
                let database_url = config.database_url.clone().ok_or_else(|| {
                    DomainError::configuration(
                        "vector_store.database_url is required for the pgvector backend",
                    )
                })?;

                let pg_config = PgvectorConfig {
                    database_url,
                    max_connections: config.max_connections,
                    acquire_timeout: Duration::from_secs(config.acquire_timeout_secs),
                };

                let store = PgvectorStore::connect_lazy(&pg_config, collection)?;
                info!(table = %store.table(), "Using pgvector vector store");

                Ok(Arc::new(store))
            }
        }
    }
}

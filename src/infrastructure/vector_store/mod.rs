//! Vector store implementations

mod factory;
mod in_memory;
mod pgvector;

pub use factory::VectorStoreFactory;
pub use in_memory::InMemoryVectorStore;
pub use pgvector::{PgvectorConfig, PgvectorStore};

//! Embedding provider implementations

mod factory;
mod hashing;
mod openai;

pub use factory::EmbeddingProviderFactory;
pub use hashing::{HashingEmbeddingProvider, DEFAULT_HASHING_DIMENSIONS};
pub use openai::{OpenAiEmbeddingProvider, DEFAULT_EMBEDDING_MODEL, DEFAULT_OPENAI_BASE_URL};

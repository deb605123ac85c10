//! Domain layer - Core business logic and entities

pub mod access;
pub mod embedding;
pub mod error;
pub mod tool_cache;

pub use access::{server_id_for_provider, AccessChecker, AccessDecision, AccessSubject};
pub use embedding::{cosine_similarity, EmbeddingProvider};
pub use error::DomainError;
pub use tool_cache::{
    classify_permission, CacheFilter, CachedResult, HitCounter, PermissionClass, ResourceScope,
    ScopeExtractor, ScopeExtractorRegistry, SearchHit, SearchRequest, StoreRequest,
    ToolCacheConfig, ToolCacheStats, VectorStore,
};

//! Vector store trait for cached tool results

use std::fmt::Debug;

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::{CacheFilter, CachedResult};
use crate::domain::DomainError;

/// A row returned by similarity search
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredResult {
    pub row: CachedResult,
    /// Cosine similarity in `[-1, 1]`, higher is closer
    pub similarity: f32,
}

impl ScoredResult {
    pub fn new(row: CachedResult, similarity: f32) -> Self {
        Self { row, similarity }
    }
}

/// Collection of cached results with filtered ANN search
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VectorStore: Send + Sync + Debug {
    /// Create the collection and its indexes if missing
    ///
    /// Fails with a configuration error when an existing collection was
    /// created with a different embedding dimension.
    async fn ensure_collection(&self, dimensions: usize) -> Result<(), DomainError>;

    /// Insert a new row; rows are never updated
    async fn insert(&self, row: CachedResult) -> Result<(), DomainError>;

    /// Rows matching `filter`, best first, at most `limit`
    async fn search(
        &self,
        embedding: &[f32],
        filter: &CacheFilter,
        limit: usize,
    ) -> Result<Vec<ScoredResult>, DomainError>;

    /// Delete rows matching `filter`, returning how many were removed
    async fn delete(&self, filter: &CacheFilter) -> Result<usize, DomainError>;

    /// Number of rows matching `filter`
    async fn count(&self, filter: &CacheFilter) -> Result<usize, DomainError>;

    /// Check backend connectivity
    async fn health_check(&self) -> Result<(), DomainError>;

    /// Backend name, for logs and health output
    fn backend_name(&self) -> &'static str;
}

//! In-memory vector store using linear search

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::embedding::cosine_similarity;
use crate::domain::tool_cache::{CacheFilter, CachedResult, ScoredResult, VectorStore};
use crate::domain::DomainError;

/// In-memory vector store
///
/// Suitable for development and single-replica deployments. For shared or
/// large caches, use [`super::PgvectorStore`].
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    rows: RwLock<HashMap<String, CachedResult>>,
    dimensions: RwLock<Option<usize>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_error(e: impl std::fmt::Display) -> DomainError {
        DomainError::internal(format!("Vector store lock poisoned: {}", e))
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn ensure_collection(&self, dimensions: usize) -> Result<(), DomainError> {
        let mut current = self.dimensions.write().map_err(Self::lock_error)?;

        match *current {
            Some(existing) if existing != dimensions => Err(DomainError::configuration(format!(
                "Collection has dimension {}, embedding provider returns {}; bump the collection version",
                existing, dimensions
            ))),
            _ => {
                *current = Some(dimensions);
                Ok(())
            }
        }
    }

    async fn insert(&self, row: CachedResult) -> Result<(), DomainError> {
        if let Some(dimensions) = *self.dimensions.read().map_err(Self::lock_error)? {
            if row.embedding().len() != dimensions {
                return Err(DomainError::validation(format!(
                    "Embedding has {} dimensions, collection expects {}",
                    row.embedding().len(),
                    dimensions
                )));
            }
        }

        let mut rows = self.rows.write().map_err(Self::lock_error)?;
        rows.insert(row.id().to_string(), row);

        Ok(())
    }

    async fn search(
        &self,
        embedding: &[f32],
        filter: &CacheFilter,
        limit: usize,
    ) -> Result<Vec<ScoredResult>, DomainError> {
        let rows = self.rows.read().map_err(Self::lock_error)?;

        let mut results: Vec<ScoredResult> = rows
            .values()
            .filter(|row| filter.matches(row))
            .map(|row| {
                let similarity = cosine_similarity(embedding, row.embedding());
                ScoredResult::new(row.clone(), similarity)
            })
            .collect();

        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(limit);

        Ok(results)
    }

    async fn delete(&self, filter: &CacheFilter) -> Result<usize, DomainError> {
        let mut rows = self.rows.write().map_err(Self::lock_error)?;

        let before = rows.len();
        rows.retain(|_, row| !filter.matches(row));

        Ok(before - rows.len())
    }

    async fn count(&self, filter: &CacheFilter) -> Result<usize, DomainError> {
        let rows = self.rows.read().map_err(Self::lock_error)?;

        Ok(rows.values().filter(|row| filter.matches(row)).count())
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "in_memory"
    }
}

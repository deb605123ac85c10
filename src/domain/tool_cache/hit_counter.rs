//! Best-effort hit counter kept outside the vector store

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// Fast counter store keyed by cached row id
///
/// Counts may under-count under concurrency. Keys expire with their row.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait HitCounter: Send + Sync + Debug {
    /// Increment the counter for `id`, returning the new value
    async fn increment(&self, id: &str, ttl: Duration) -> Result<u64, DomainError>;

    /// Current count for `id`, zero if unknown
    async fn get(&self, id: &str) -> Result<u64, DomainError>;
}

//! In-memory hit counter using moka

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use moka::Expiry;

use crate::domain::tool_cache::HitCounter;
use crate::domain::DomainError;

#[derive(Debug, Clone)]
struct Counter {
    hits: Arc<AtomicU64>,
    ttl: Duration,
}

/// Each counter lives as long as the row it counts
struct RowTtl;

impl Expiry<String, Counter> for RowTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Counter,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Process-local hit counter
///
/// Bounded by capacity; an evicted counter restarts from zero.
#[derive(Debug)]
pub struct InMemoryHitCounter {
    counters: MokaCache<String, Counter>,
}

impl InMemoryHitCounter {
    pub fn new(max_capacity: u64) -> Self {
        Self {
            counters: MokaCache::builder()
                .max_capacity(max_capacity)
                .expire_after(RowTtl)
                .build(),
        }
    }
}

impl Default for InMemoryHitCounter {
    fn default() -> Self {
        Self::new(100_000)
    }
}

#[async_trait]
impl HitCounter for InMemoryHitCounter {
    async fn increment(&self, id: &str, ttl: Duration) -> Result<u64, DomainError> {
        let counter = self
            .counters
            .get_with(id.to_string(), async {
                Counter {
                    hits: Arc::new(AtomicU64::new(0)),
                    ttl: ttl.max(Duration::from_secs(1)),
                }
            })
            .await;

        Ok(counter.hits.fetch_add(1, Ordering::Relaxed) + 1)
    }

    async fn get(&self, id: &str) -> Result<u64, DomainError> {
        Ok(self
            .counters
            .get(id)
            .await
            .map(|c| c.hits.load(Ordering::Relaxed))
            .unwrap_or(0))
    }
}

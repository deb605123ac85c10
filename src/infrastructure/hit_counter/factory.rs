//! Hit counter factory for runtime selection

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{HitCounterBackend, HitCounterConfig};
use crate::domain::tool_cache::HitCounter;
use crate::domain::DomainError;

use super::in_memory::InMemoryHitCounter;
use super::redis::RedisHitCounter;

/// Factory for creating hit counter instances
#[derive(Debug, Default)]
pub struct HitCounterFactory;

impl HitCounterFactory {
    /// Build the configured counter
    ///
    /// An unreachable Redis is not fatal: the counter falls back to the
    /// in-memory backend, so counts stay per-process until restart.
    pub async fn create(config: &HitCounterConfig) -> Result<Arc<dyn HitCounter>, DomainError> {
        match config.backend {
            HitCounterBackend::InMemory => {
                info!(max_capacity = config.max_capacity, "Using in-memory hit counter");
                Ok(Arc::new(InMemoryHitCounter::new(config.max_capacity)))
            }
            HitCounterBackend::Redis => {
                let url = config.redis_url.as_deref().ok_or_else(|| {
                    DomainError::configuration(
                        "hit_counter.redis_url is required for the redis backend",
                    )
                })?;

                let redis =
                    RedisHitCounter::new(url, config.key_prefix.clone(), config.timeout()).await;

                match redis {
                    Ok(counter) => {
                        info!(key_prefix = %config.key_prefix, "Using Redis hit counter");
                        Ok(Arc::new(counter))
                    }
                    Err(e) => {
                        warn!(
                            error = %e,
                            "Redis hit counter unavailable, falling back to in-memory counts"
                        );
                        Ok(Arc::new(InMemoryHitCounter::new(config.max_capacity)))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_create_in_memory() {
        let counter = HitCounterFactory::create(&HitCounterConfig::default()).await.unwrap();

        counter.increment("row-1", Duration::from_secs(60)).await.unwrap();
        assert_eq!(counter.get("row-1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_redis_requires_url() {
        let config = HitCounterConfig {
            backend: HitCounterBackend::Redis,
            ..Default::default()
        };

        let result = HitCounterFactory::create(&config).await;
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_unreachable_redis_falls_back_to_memory() {
        let config = HitCounterConfig {
            backend: HitCounterBackend::Redis,
            redis_url: Some("redis://127.0.0.1:1".to_string()),
            timeout_ms: 200,
            ..Default::default()
        };

        let created = HitCounterFactory::create(&config);
        let counter = tokio::time::timeout(Duration::from_secs(5), created)
            .await
            .expect("factory returned promptly")
            .unwrap();

        counter.increment("row-1", Duration::from_secs(60)).await.unwrap();
        assert_eq!(counter.get("row-1").await.unwrap(), 1);
    }
}

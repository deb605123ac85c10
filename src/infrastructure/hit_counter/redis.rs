//! Redis hit counter

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, Client};

use crate::domain::tool_cache::HitCounter;
use crate::domain::DomainError;

pub const DEFAULT_KEY_PREFIX: &str = "tool_cache:hits";

/// Hit counter shared by every replica through Redis
///
/// `INCR` then `EXPIRE` on each hit; the two are not atomic, so a crash in
/// between leaves a key that lives until the next hit refreshes it.
#[derive(Clone)]
pub struct RedisHitCounter {
    connection: ConnectionManager,
    key_prefix: String,
}

impl fmt::Debug for RedisHitCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisHitCounter")
            .field("key_prefix", &self.key_prefix)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisHitCounter {
    /// Connect with `timeout` bounding the connect and every command
    ///
    /// Reconnects are attempted once, so an unreachable server fails fast
    /// instead of retrying with backoff.
    pub async fn new(
        url: &str,
        key_prefix: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = Client::open(url)
            .map_err(|e| DomainError::cache(format!("Failed to create Redis client: {}", e)))?;

        let manager_config = ConnectionManagerConfig::new()
            .set_connection_timeout(timeout)
            .set_response_timeout(timeout)
            .set_number_of_retries(1);

        let connection = tokio::time::timeout(
            timeout.saturating_mul(2),
            ConnectionManager::new_with_config(client, manager_config),
        )
        .await
        .map_err(|_| DomainError::cache("Timed out connecting to Redis"))?
        .map_err(|e| DomainError::cache(format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self {
            connection,
            key_prefix: key_prefix.into(),
        })
    }

    fn key(&self, id: &str) -> String {
        format!("{}:{}", self.key_prefix, id)
    }
}

#[async_trait]
impl HitCounter for RedisHitCounter {
    async fn increment(&self, id: &str, ttl: Duration) -> Result<u64, DomainError> {
        let key = self.key(id);
        let mut conn = self.connection.clone();

        let value: u64 = conn.incr(&key, 1u64).await.map_err(|e| {
            DomainError::cache(format!("Failed to increment hit counter '{}': {}", id, e))
        })?;

        let ttl_secs = ttl.as_secs().max(1) as i64;
        let _: bool = conn.expire(&key, ttl_secs).await.map_err(|e| {
            DomainError::cache(format!("Failed to set TTL on hit counter '{}': {}", id, e))
        })?;

        Ok(value)
    }

    async fn get(&self, id: &str) -> Result<u64, DomainError> {
        let mut conn = self.connection.clone();

        let value: Option<u64> = conn.get(self.key(id)).await.map_err(|e| {
            DomainError::cache(format!("Failed to read hit counter '{}': {}", id, e))
        })?;

        Ok(value.unwrap_or(0))
    }
}

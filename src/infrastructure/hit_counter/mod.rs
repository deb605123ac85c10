//! Hit counter implementations

mod factory;
mod in_memory;
mod redis;

pub use factory::HitCounterFactory;
pub use in_memory::InMemoryHitCounter;
pub use redis::{RedisHitCounter, DEFAULT_KEY_PREFIX};

//! Tool result cache configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::SummarizeLimits;

/// Configuration for the tool result cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCacheConfig {
    /// Whether the cache is enabled at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Minimum cosine similarity for a hit (0.0 to 1.0)
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Expiry for tools no TTL rule matches, in seconds
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,

    /// Results up to this many serialized bytes are stored verbatim
    #[serde(default = "default_max_result_bytes")]
    pub max_result_bytes: usize,

    /// Elements kept when an oversized array is truncated
    #[serde(default = "default_max_array_items")]
    pub max_array_items: usize,

    /// Candidates fetched per search
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Base name of the vector collection
    #[serde(default = "default_collection_name")]
    pub collection_name: String,

    /// Collection generation; bump when the embedding model changes
    #[serde(default = "default_collection_version")]
    pub collection_version: u32,

    /// How long bootstrap waits for the collection and its indexes
    #[serde(default = "default_index_build_wait_secs")]
    pub index_build_wait_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_similarity_threshold() -> f32 {
    0.90
}

fn default_ttl_secs() -> u64 {
    86_400
}

fn default_max_result_bytes() -> usize {
    50_000
}

fn default_max_array_items() -> usize {
    20
}

fn default_top_k() -> usize {
    5
}

fn default_collection_name() -> String {
    "tool_result_cache".to_string()
}

fn default_collection_version() -> u32 {
    1
}

fn default_index_build_wait_secs() -> u64 {
    30
}

impl Default for ToolCacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            similarity_threshold: default_similarity_threshold(),
            default_ttl_secs: default_ttl_secs(),
            max_result_bytes: default_max_result_bytes(),
            max_array_items: default_max_array_items(),
            top_k: default_top_k(),
            collection_name: default_collection_name(),
            collection_version: default_collection_version(),
            index_build_wait_secs: default_index_build_wait_secs(),
        }
    }
}

impl ToolCacheConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the similarity threshold, clamped to `[0, 1]`
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the default TTL
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl_secs = ttl.as_secs();
        self
    }

    /// Set the verbatim size threshold
    pub fn with_max_result_bytes(mut self, max_bytes: usize) -> Self {
        self.max_result_bytes = max_bytes;
        self
    }

    /// Enable or disable the cache
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    pub fn index_build_wait(&self) -> Duration {
        Duration::from_secs(self.index_build_wait_secs)
    }

    /// Versioned collection name, e.g. `tool_result_cache_v1`
    pub fn collection(&self) -> String {
        format!("{}_v{}", self.collection_name, self.collection_version)
    }

    pub fn summarize_limits(&self) -> SummarizeLimits {
        SummarizeLimits {
            max_bytes: self.max_result_bytes,
            max_array_items: self.max_array_items,
        }
    }
}

//! Tool result cache domain models and traits
//!
//! A semantic cache for cloud tool invocations. Rows are written once after a
//! live tool call and matched later by embedding similarity. Rows tied to an
//! identifiable cloud resource and produced by a read-only call may be reused
//! across users of the same tenant, but only after a fresh RBAC check.

mod cache_text;
mod config;
mod entry;
mod filter;
mod hit;
mod hit_counter;
mod permission;
pub mod scope;
mod stats;
mod store;
mod summarize;
mod ttl;

pub use cache_text::{build_cache_text, CACHE_TEXT_FIELDS, MAX_CACHE_TEXT_QUERY_CHARS};
pub use config::ToolCacheConfig;
pub use entry::{hash_args, hash_text, CachedResult, MAX_QUERY_TEXT_CHARS};
pub use filter::{CacheField, CacheFilter, FilterValue};
pub use hit::{SearchHit, SearchRequest, StoreRequest};
pub use hit_counter::HitCounter;
pub use permission::{classify_permission, PermissionClass};
pub use scope::{ResourceScope, ScopeExtractor, ScopeExtractorRegistry};
pub use stats::{
    StatsRecorder, ToolCacheStats, COST_SAVED_PER_CROSS_USER_HIT_USD,
    LATENCY_SAVED_PER_CROSS_USER_HIT_MS,
};
pub use store::{ScoredResult, VectorStore};
pub use summarize::{summarize_result, SummarizeLimits};
pub use ttl::{ttl_for_tool, TtlRule, TTL_RULES};

#[cfg(test)]
pub use hit_counter::MockHitCounter;
#[cfg(test)]
pub use store::MockVectorStore;

/// Tool arguments as received from the tool-execution layer
pub type ToolArgs = serde_json::Map<String, serde_json::Value>;

/// Current time as epoch seconds
pub fn now_epoch_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Longest prefix of `text` holding at most `max_chars` characters
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Lowercased alphanumeric tokens of a tool name
///
/// `azure_get-costs.v2` yields `["azure", "get", "costs", "v2"]`.
pub(crate) fn tool_name_tokens(tool_name: &str) -> Vec<String> {
    tool_name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(|token| token.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_tool_name_tokens() {
        assert_eq!(
            tool_name_tokens("Azure_get-costs.v2"),
            vec!["azure", "get", "costs", "v2"]
        );
        assert!(tool_name_tokens("__").is_empty());
    }
}

//! Cached tool result row

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::{now_epoch_secs, truncate_chars, PermissionClass, ResourceScope, ToolArgs};

/// Upper bound on the stored query text, in characters
pub const MAX_QUERY_TEXT_CHARS: usize = 2000;

/// One row per cache write
///
/// Rows are immutable after insert. `hit_count` is the base count written at
/// insert time; live increments are kept by a [`super::HitCounter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedResult {
    pub(crate) id: String,
    pub(crate) tenant_id: String,
    pub(crate) tool_name: String,
    pub(crate) args_hash: String,
    pub(crate) query_text: String,
    pub(crate) result: String,
    pub(crate) result_hash: String,
    pub(crate) embedding: Vec<f32>,
    pub(crate) created_at: i64,
    pub(crate) expires_at: i64,
    pub(crate) hit_count: u64,
    pub(crate) original_user_id: String,
    pub(crate) resource_scope: Option<String>,
    pub(crate) is_shared: bool,
}

impl CachedResult {
    /// Create a new private row with a fresh id
    pub fn new(
        tenant_id: impl Into<String>,
        tool_name: impl Into<String>,
        original_user_id: impl Into<String>,
        embedding: Vec<f32>,
        result: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        let now = now_epoch_secs();
        let result = result.into();
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);

        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id: tenant_id.into(),
            tool_name: tool_name.into(),
            args_hash: String::new(),
            query_text: String::new(),
            result_hash: hash_text(&result),
            result,
            embedding,
            created_at: now,
            expires_at: now.saturating_add(ttl_secs),
            hit_count: 0,
            original_user_id: original_user_id.into(),
            resource_scope: None,
            is_shared: false,
        }
    }

    /// Set the hash of the tool arguments
    pub fn with_args_hash(mut self, args_hash: impl Into<String>) -> Self {
        self.args_hash = args_hash.into();
        self
    }

    /// Set the query text, bounded to [`MAX_QUERY_TEXT_CHARS`]
    pub fn with_query_text(mut self, query_text: &str) -> Self {
        self.query_text = truncate_chars(query_text, MAX_QUERY_TEXT_CHARS).to_string();
        self
    }

    /// Attach the resource scope and derive shareability
    ///
    /// A row is shared only when it has a scope and came from a read call.
    pub fn with_sharing(
        mut self,
        scope: Option<&ResourceScope>,
        permission: PermissionClass,
    ) -> Self {
        self.resource_scope = scope.map(ResourceScope::to_string);
        self.is_shared = scope.is_some() && permission.is_read();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn args_hash(&self) -> &str {
        &self.args_hash
    }

    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    /// Serialized result payload
    pub fn result(&self) -> &str {
        &self.result
    }

    pub fn result_hash(&self) -> &str {
        &self.result_hash
    }

    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    pub fn hit_count(&self) -> u64 {
        self.hit_count
    }

    pub fn original_user_id(&self) -> &str {
        &self.original_user_id
    }

    pub fn resource_scope(&self) -> Option<&str> {
        self.resource_scope.as_deref()
    }

    pub fn is_shared(&self) -> bool {
        self.is_shared
    }

    /// Whether the row can still be matched at `now`
    pub fn is_live_at(&self, now: i64) -> bool {
        self.expires_at > now
    }

    /// Seconds left before expiry, zero once expired
    pub fn remaining_ttl(&self, now: i64) -> Duration {
        Duration::from_secs(u64::try_from(self.expires_at - now).unwrap_or(0))
    }

    /// Deserialize the stored payload, falling back to the raw string
    pub fn result_value(&self) -> serde_json::Value {
        serde_json::from_str(&self.result)
            .unwrap_or_else(|_| serde_json::Value::String(self.result.clone()))
    }
}

/// Lowercase hex SHA-256 of a string
pub fn hash_text(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Hash of the canonical JSON form of tool arguments
///
/// Keys are sorted at every level, so argument order never changes the hash.
pub fn hash_args(args: &ToolArgs) -> String {
    let canonical = canonicalize(&serde_json::Value::Object(args.clone()));
    hash_text(&serde_json::to_string(&canonical).unwrap_or_default())
}

fn canonicalize(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut entries: Vec<(&String, &serde_json::Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            let mut sorted = serde_json::Map::new();
            for (key, inner) in entries {
                sorted.insert(key.clone(), canonicalize(inner));
            }

            serde_json::Value::Object(sorted)
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(canonicalize).collect())
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_row() -> CachedResult {
        CachedResult::new(
            "tenant-1",
            "azure_get_costs",
            "user-a",
            vec![1.0, 0.0],
            r#"{"total": 42}"#,
            Duration::from_secs(3600),
        )
    }

    #[test]
    fn test_new_row_is_private_and_live() {
        let row = create_row();

        assert!(!row.id().is_empty());
        assert_eq!(row.hit_count(), 0);
        assert!(!row.is_shared());
        assert!(row.resource_scope().is_none());
        assert_eq!(row.expires_at() - row.created_at(), 3600);
        assert!(row.is_live_at(now_epoch_secs()));
        assert_eq!(row.result_hash(), hash_text(r#"{"total": 42}"#));
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(create_row().id(), create_row().id());
    }

    #[test]
    fn test_read_with_scope_is_shared() {
        let scope = ResourceScope::new("azure", "sub-123");
        let row = create_row().with_sharing(Some(&scope), PermissionClass::Read);

        assert!(row.is_shared());
        assert_eq!(row.resource_scope(), Some("azure:sub-123"));
    }

    #[test]
    fn test_write_with_scope_is_not_shared() {
        let scope = ResourceScope::new("azure", "sub-123");
        let row = create_row().with_sharing(Some(&scope), PermissionClass::Write);

        assert!(!row.is_shared());
        assert_eq!(row.resource_scope(), Some("azure:sub-123"));
    }

    #[test]
    fn test_read_without_scope_is_not_shared() {
        let row = create_row().with_sharing(None, PermissionClass::Read);

        assert!(!row.is_shared());
    }

    #[test]
    fn test_query_text_is_bounded() {
        let long = "q".repeat(MAX_QUERY_TEXT_CHARS + 50);
        let row = create_row().with_query_text(&long);

        assert_eq!(row.query_text().chars().count(), MAX_QUERY_TEXT_CHARS);
    }

    #[test]
    fn test_result_value_falls_back_to_raw_string() {
        let mut row = create_row();
        assert_eq!(row.result_value(), json!({"total": 42}));

        row.result = "not json {".to_string();
        assert_eq!(row.result_value(), json!("not json {"));
    }

    #[test]
    fn test_remaining_ttl_saturates() {
        let row = create_row();

        assert_eq!(row.remaining_ttl(row.expires_at() + 10), Duration::ZERO);
        assert_eq!(row.remaining_ttl(row.created_at()), Duration::from_secs(3600));
    }

    #[test]
    fn test_args_hash_ignores_key_order() {
        let a: ToolArgs = serde_json::from_value(json!({"a": 1, "b": "x"})).unwrap();
        let b: ToolArgs = serde_json::from_value(json!({"b": "x", "a": 1})).unwrap();

        assert_eq!(hash_args(&a), hash_args(&b));
        assert_eq!(hash_args(&a).len(), 64);
    }
}

//! Search and store inputs, and the hit returned to callers

use serde::{Deserialize, Serialize};

use super::ToolArgs;

/// A cache lookup on behalf of one user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub tenant_id: String,
    pub tool_name: String,
    #[serde(default)]
    pub tool_args: ToolArgs,
    #[serde(default)]
    pub query_text: Option<String>,
    pub user_id: String,
    #[serde(default)]
    pub user_groups: Vec<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// A fresh tool result to cache
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreRequest {
    pub tenant_id: String,
    pub user_id: String,
    pub tool_name: String,
    #[serde(default)]
    pub tool_args: ToolArgs,
    pub result: serde_json::Value,
    #[serde(default)]
    pub query_text: Option<String>,
}

/// A cached result released to the requester
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub result: serde_json::Value,
    pub similarity: f32,
    pub cache_id: String,
    pub tool_name: String,
    /// Epoch seconds of the original write
    pub cached_at: i64,
    pub hit_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_scope: Option<String>,
    pub cross_user_hit: bool,
    /// Set only when the row was cached by another user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_user_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_request_from_camel_case() {
        let request: SearchRequest = serde_json::from_value(json!({
            "tenantId": "t1",
            "toolName": "azure_get_costs",
            "toolArgs": {"subscription_id": "sub-123"},
            "userId": "user-b",
            "userGroups": ["finops"]
        }))
        .unwrap();

        assert_eq!(request.tenant_id, "t1");
        assert_eq!(request.user_groups, vec!["finops"]);
        assert!(!request.is_admin);
        assert!(request.query_text.is_none());
    }

    #[test]
    fn test_hit_omits_original_user_for_own_rows() {
        let hit = SearchHit {
            result: json!({"total": 1}),
            similarity: 0.95,
            cache_id: "c1".to_string(),
            tool_name: "azure_get_costs".to_string(),
            cached_at: 1_700_000_000,
            hit_count: 1,
            resource_scope: None,
            cross_user_hit: false,
            original_user_id: None,
        };

        let value = serde_json::to_value(&hit).unwrap();
        assert_eq!(value["cacheId"], "c1");
        assert_eq!(value["crossUserHit"], false);
        assert!(value.get("originalUserId").is_none());
        assert!(value.get("resourceScope").is_none());
    }
}

//! Text surrogate of a tool call used for embedding

use super::{truncate_chars, ToolArgs};

/// Argument fields folded into the cache text, in output order
pub const CACHE_TEXT_FIELDS: &[&str] = &[
    "subscription_id",
    "resource_group",
    "resource_type",
    "resource_name",
    "account_id",
    "project_id",
    "region",
    "zone",
    "cluster",
    "namespace",
    "service",
    "metric",
    "timeframe",
    "start_date",
    "end_date",
    "granularity",
    "group_by",
    "filter",
];

/// Free-text query budget, in characters
pub const MAX_CACHE_TEXT_QUERY_CHARS: usize = 500;

/// Build the deterministic cache text for a tool call
///
/// `azure_get_costs({subscription_id: "Sub-123"})` yields
/// `azure get costs subscription_id=sub-123`.
pub fn build_cache_text(tool_name: &str, args: &ToolArgs, query_text: Option<&str>) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(CACHE_TEXT_FIELDS.len() + 2);

    parts.push(tool_name.replace(['_', '-', '.', '/', ':'], " "));

    for field in CACHE_TEXT_FIELDS {
        let Some(value) = args.get(*field) else {
            continue;
        };

        let rendered = match value {
            serde_json::Value::Null => continue,
            serde_json::Value::String(s) if s.trim().is_empty() => continue,
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        parts.push(format!("{}={}", field, rendered));
    }

    if let Some(query) = query_text.map(str::trim).filter(|q| !q.is_empty()) {
        parts.push(truncate_chars(query, MAX_CACHE_TEXT_QUERY_CHARS).to_string());
    }

    parts
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

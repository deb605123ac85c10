//! Size-bounded shaping of tool results before they are stored

use serde_json::{json, Map, Value};

/// Bytes reserved for the marker keys around a truncated field preview
const FIELD_MARKER_OVERHEAD: usize = 64;

/// Thresholds for result shaping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummarizeLimits {
    /// Serialized results up to this size are stored verbatim
    pub max_bytes: usize,
    /// Elements kept from a truncated array
    pub max_array_items: usize,
}

impl Default for SummarizeLimits {
    fn default() -> Self {
        Self {
            max_bytes: 50_000,
            max_array_items: 20,
        }
    }
}

/// Serialize a tool result, shrinking it when it exceeds `limits.max_bytes`
///
/// Arrays keep their first items, objects have oversized fields replaced one
/// level deep. Anything still too large collapses into a preview envelope.
/// The output is always valid JSON.
pub fn summarize_result(result: &Value, limits: &SummarizeLimits) -> String {
    let serialized = result.to_string();

    if serialized.len() <= limits.max_bytes {
        return serialized;
    }

    let original_length = serialized.len();

    let shaped = match result {
        Value::Array(items) => Some(json!({
            "items": first_items(items, limits.max_array_items),
            "total": items.len(),
            "truncated": true,
            "originalLength": original_length,
        })),
        Value::Object(map) => Some(truncate_object(map, original_length, limits)),
        _ => None,
    };

    if let Some(shaped) = shaped {
        let shaped = shaped.to_string();
        if shaped.len() <= limits.max_bytes {
            return shaped;
        }
    }

    preview_envelope(&serialized, original_length, limits.max_bytes)
}

fn first_items(items: &[Value], max_items: usize) -> Vec<Value> {
    items.iter().take(max_items).cloned().collect()
}

/// Replace each field whose share of the budget is exceeded
fn truncate_object(
    map: &Map<String, Value>,
    original_length: usize,
    limits: &SummarizeLimits,
) -> Value {
    let field_budget = limits.max_bytes / map.len().max(1);
    let mut shaped = Map::with_capacity(map.len() + 2);

    for (key, value) in map {
        let size = value.to_string().len();

        let value = if size <= field_budget {
            value.clone()
        } else {
            truncate_field(value, field_budget, limits.max_array_items)
        };

        shaped.insert(key.clone(), value);
    }

    shaped.insert("_truncated".to_string(), Value::Bool(true));
    shaped.insert("_originalLength".to_string(), json!(original_length));

    Value::Object(shaped)
}

fn truncate_field(value: &Value, field_budget: usize, max_items: usize) -> Value {
    match value {
        Value::Array(items) => json!({
            "items": first_items(items, max_items),
            "total": items.len(),
            "truncated": true,
        }),
        Value::String(text) => json!({
            "preview": truncate_bytes(text, field_budget.saturating_sub(FIELD_MARKER_OVERHEAD)),
            "total": text.chars().count(),
            "truncated": true,
        }),
        Value::Object(inner) => json!({
            "keys": inner.keys().take(max_items).collect::<Vec<_>>(),
            "total": inner.len(),
            "truncated": true,
        }),
        other => other.clone(),
    }
}

/// Preview envelope, halving the preview until the envelope fits
fn preview_envelope(serialized: &str, original_length: usize, max_bytes: usize) -> String {
    let mut preview = truncate_bytes(serialized, max_bytes);

    loop {
        let envelope = json!({
            "truncated": true,
            "originalLength": original_length,
            "preview": preview,
        })
        .to_string();

        if envelope.len() <= max_bytes || preview.is_empty() {
            return envelope;
        }

        preview = truncate_bytes(preview, preview.len() / 2);
    }
}

/// Longest prefix of `text` of at most `max_bytes` bytes on a char boundary
fn truncate_bytes(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }

    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(max_bytes: usize) -> SummarizeLimits {
        SummarizeLimits {
            max_bytes,
            max_array_items: 20,
        }
    }

    fn parse(text: &str) -> Value {
        serde_json::from_str(text).expect("summary is valid json")
    }

    #[test]
    fn test_small_result_is_verbatim() {
        let result = json!({"total": 42.5, "currency": "USD"});

        assert_eq!(summarize_result(&result, &limits(1000)), result.to_string());
    }

    #[test]
    fn test_large_array_keeps_first_items() {
        let result = Value::Array((0..500).map(|i| json!({"id": i})).collect());
        let original = result.to_string().len();

        let summary = parse(&summarize_result(&result, &limits(2000)));

        assert_eq!(summary["items"].as_array().unwrap().len(), 20);
        assert_eq!(summary["items"][0], json!({"id": 0}));
        assert_eq!(summary["total"], 500);
        assert_eq!(summary["truncated"], true);
        assert_eq!(summary["originalLength"], original);
    }

    #[test]
    fn test_object_fields_truncated_one_level() {
        let result = json!({
            "subscription": "sub-123",
            "rows": (0..1000).map(|i| json!([i, "2024-01-01", 1.5])).collect::<Vec<_>>(),
            "notes": "n".repeat(5000),
            "nested": {"a": "x".repeat(3000), "b": 1},
        });

        let text = summarize_result(&result, &limits(4000));
        assert!(text.len() <= 4000);

        let summary = parse(&text);
        assert_eq!(summary["subscription"], "sub-123");
        assert_eq!(summary["rows"]["total"], 1000);
        assert_eq!(summary["rows"]["truncated"], true);
        assert_eq!(summary["rows"]["items"].as_array().unwrap().len(), 20);
        assert_eq!(summary["notes"]["total"], 5000);
        assert_eq!(summary["nested"]["keys"], json!(["a", "b"]));
        assert_eq!(summary["_truncated"], true);
        assert_eq!(summary["_originalLength"], result.to_string().len());
    }

    #[test]
    fn test_oversized_scalar_uses_preview_envelope() {
        let result = Value::String("é".repeat(10_000));
        let original = result.to_string().len();

        let text = summarize_result(&result, &limits(1000));
        assert!(text.len() <= 1000);

        let summary = parse(&text);
        assert_eq!(summary["truncated"], true);
        assert_eq!(summary["originalLength"], original);
        assert!(!summary["preview"].as_str().unwrap().is_empty());
    }

    #[test]
    fn test_shaped_value_still_too_large_falls_back() {
        // Twenty huge items cannot fit, so the array shape is abandoned
        let result = Value::Array((0..50).map(|_| json!("y".repeat(1000))).collect());

        let text = summarize_result(&result, &limits(2000));
        assert!(text.len() <= 2000);

        let summary = parse(&text);
        assert_eq!(summary["truncated"], true);
        assert!(summary.get("preview").is_some());
        assert!(summary.get("items").is_none());
    }

    #[test]
    fn test_tiny_threshold_still_bounded_by_envelope() {
        let result = Value::String("z".repeat(500));

        let summary = parse(&summarize_result(&result, &limits(10)));
        assert_eq!(summary["truncated"], true);
        assert_eq!(summary["preview"], "");
    }

    #[test]
    fn test_truncate_bytes_char_boundary() {
        assert_eq!(truncate_bytes("héllo", 2), "h");
        assert_eq!(truncate_bytes("héllo", 3), "hé");
        assert_eq!(truncate_bytes("abc", 10), "abc");
    }
}

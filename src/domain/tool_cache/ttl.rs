//! Pattern-keyed expiry buckets

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// One row of the TTL table
#[derive(Debug)]
pub struct TtlRule {
    pub name: &'static str,
    pub pattern: Regex,
    pub ttl: Duration,
}

fn rule(name: &'static str, pattern: &str, ttl_secs: u64) -> TtlRule {
    TtlRule {
        name,
        pattern: Regex::new(pattern).expect("ttl rule pattern is valid"),
        ttl: Duration::from_secs(ttl_secs),
    }
}

/// TTL table, first match wins
pub static TTL_RULES: Lazy<Vec<TtlRule>> = Lazy::new(|| {
    vec![
        rule(
            "volatile",
            r"(?i)metric|status|health|alert|log|events?|activity",
            5 * MINUTE,
        ),
        rule(
            "identity",
            r"(?i)subscription|tenant|identity|role|location|region|account|user|group",
            7 * DAY,
        ),
        rule("billing", r"(?i)cost|billing|budget|usage|invoice|price", 6 * HOUR),
        rule("inventory", r"(?i)resource|list|describe|get|inventory", HOUR),
    ]
});

/// Expiry for a tool's results
pub fn ttl_for_tool(tool_name: &str, default_ttl: Duration) -> Duration {
    TTL_RULES
        .iter()
        .find(|rule| rule.pattern.is_match(tool_name))
        .map(|rule| rule.ttl)
        .unwrap_or(default_ttl)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: Duration = Duration::from_secs(86_400);

    #[test]
    fn test_buckets() {
        assert_eq!(ttl_for_tool("azure_get_metrics", DEFAULT), Duration::from_secs(300));
        assert_eq!(
            ttl_for_tool("azure_list_subscriptions", DEFAULT),
            Duration::from_secs(7 * 86_400)
        );
        assert_eq!(ttl_for_tool("aws_budget_report", DEFAULT), Duration::from_secs(6 * 3600));
        assert_eq!(ttl_for_tool("gcp_describe_instance", DEFAULT), Duration::from_secs(3600));
    }

    #[test]
    fn test_first_match_wins() {
        // "get" is inventory, but billing comes first
        assert_eq!(ttl_for_tool("azure_get_costs", DEFAULT), Duration::from_secs(6 * 3600));
        // "status" is volatile even though "resource" also matches
        assert_eq!(ttl_for_tool("resource_status", DEFAULT), Duration::from_secs(300));
        // "region" is identity-like even inside a cost tool
        assert_eq!(ttl_for_tool("cost_by_region", DEFAULT), Duration::from_secs(7 * 86_400));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(ttl_for_tool("AzureHealthCheck", DEFAULT), Duration::from_secs(300));
    }

    #[test]
    fn test_default_fallback() {
        assert_eq!(ttl_for_tool("weather_now", DEFAULT), DEFAULT);
        assert_eq!(ttl_for_tool("", Duration::from_secs(5)), Duration::from_secs(5));
    }
}

use once_cell::sync::Lazy;
use regex::Regex;

use super::{first_identifier, first_path_match, ResourceScope, ScopeExtractor};
use crate::domain::tool_cache::ToolArgs;

static RESOURCE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|/)projects/([^/?#\s]+)(?:/(?:zones|locations|regions)/([^/?#\s]+))?")
        .expect("gcp resource name pattern is valid")
});

const PATH_KEYS: &[&str] = &["resource_name", "resourceName", "name", "parent", "path"];
const PROJECT_KEYS: &[&str] = &["project_id", "projectId", "project"];
const ZONE_KEYS: &[&str] = &["zone", "region", "location"];

/// `gcp:<project>[:<zone>]`
#[derive(Debug, Default)]
pub struct GcpScopeExtractor;

impl ScopeExtractor for GcpScopeExtractor {
    fn provider(&self) -> &'static str {
        "gcp"
    }

    fn namespaces(&self) -> &'static [&'static str] {
        &["gcp", "google"]
    }

    fn extract(&self, args: &ToolArgs) -> Option<ResourceScope> {
        let (project, path_zone) = match first_path_match(args, PATH_KEYS, &RESOURCE_NAME) {
            Some((project, zone)) => (project, zone),
            None => (first_identifier(args, PROJECT_KEYS)?, None),
        };

        let zone = path_zone.or_else(|| first_identifier(args, ZONE_KEYS));

        Some(ResourceScope::new(self.provider(), project).with_secondary(zone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extract(value: serde_json::Value) -> Option<String> {
        let args: ToolArgs = serde_json::from_value(value).unwrap();
        GcpScopeExtractor.extract(&args).map(|s| s.to_string())
    }

    #[test]
    fn test_resource_name_path() {
        assert_eq!(
            extract(json!({"name": "projects/my-proj/zones/us-central1-a/instances/vm-1"})),
            Some("gcp:my-proj:us-central1-a".to_string())
        );
        assert_eq!(
            extract(json!({"parent": "//compute.googleapis.com/projects/My-Proj"})),
            Some("gcp:my-proj".to_string())
        );
    }

    #[test]
    fn test_project_fields() {
        assert_eq!(
            extract(json!({"project_id": "analytics-prod", "zone": "europe-west1-b"})),
            Some("gcp:analytics-prod:europe-west1-b".to_string())
        );
        assert_eq!(extract(json!({"projectId": "p1"})), Some("gcp:p1".to_string()));
    }

    #[test]
    fn test_plain_name_is_not_a_path() {
        assert_eq!(extract(json!({"name": "my-instance"})), None);
    }

    #[test]
    fn test_handles_gcp_tools() {
        assert!(GcpScopeExtractor.handles("gcp_billing_report"));
        assert!(GcpScopeExtractor.handles("google_compute_list"));
        assert!(!GcpScopeExtractor.handles("aws_list_buckets"));
    }
}

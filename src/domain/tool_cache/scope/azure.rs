use once_cell::sync::Lazy;
use regex::Regex;

use super::{first_identifier, first_path_match, ResourceScope, ScopeExtractor};
use crate::domain::tool_cache::ToolArgs;

static RESOURCE_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)/subscriptions/([^/?#\s]+)(?:/resourcegroups/([^/?#\s]+))?")
        .expect("azure resource path pattern is valid")
});

const PATH_KEYS: &[&str] = &["resource_id", "resourceId", "scope", "resource_uri", "id", "path"];
const SUBSCRIPTION_KEYS: &[&str] = &["subscription_id", "subscriptionId", "subscription"];
const RESOURCE_GROUP_KEYS: &[&str] = &["resource_group", "resourceGroup", "resource_group_name"];

/// `azure:<subscription>[:<resource group>]`
#[derive(Debug, Default)]
pub struct AzureScopeExtractor;

impl ScopeExtractor for AzureScopeExtractor {
    fn provider(&self) -> &'static str {
        "azure"
    }

    fn namespaces(&self) -> &'static [&'static str] {
        &["azure"]
    }

    fn extract(&self, args: &ToolArgs) -> Option<ResourceScope> {
        let (subscription, path_group) = match first_path_match(args, PATH_KEYS, &RESOURCE_PATH) {
            Some((subscription, group)) => (subscription, group),
            None => (first_identifier(args, SUBSCRIPTION_KEYS)?, None),
        };

        let group = path_group.or_else(|| first_identifier(args, RESOURCE_GROUP_KEYS));

        Some(ResourceScope::new(self.provider(), subscription).with_secondary(group))
    }
}

//! Resource scope extraction
//!
//! A resource scope names the cloud resource a tool call reads, e.g.
//! `azure:sub-123:rg-prod`. It is the boundary inside which cached results may
//! be shared between users. Each cloud provider contributes its own
//! [`ScopeExtractor`] to a [`ScopeExtractorRegistry`].

mod aws;
mod azure;
mod gcp;
mod kubernetes;
mod registry;

use std::fmt::{self, Debug, Display};

use regex::Regex;

use super::{tool_name_tokens, ToolArgs};
use crate::domain::access::server_id_for_provider;

pub use aws::AwsScopeExtractor;
pub use azure::AzureScopeExtractor;
pub use gcp::GcpScopeExtractor;
pub use kubernetes::KubernetesScopeExtractor;
pub use registry::ScopeExtractorRegistry;

/// Provider-qualified resource identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceScope {
    provider: String,
    primary: String,
    secondary: Option<String>,
}

impl ResourceScope {
    pub fn new(provider: impl Into<String>, primary: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            primary: primary.into(),
            secondary: None,
        }
    }

    /// Narrow the scope one level down the provider hierarchy
    pub fn with_secondary(mut self, secondary: Option<String>) -> Self {
        self.secondary = secondary;
        self
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn secondary(&self) -> Option<&str> {
        self.secondary.as_deref()
    }

    /// RBAC server id guarding this scope
    pub fn server_id(&self) -> String {
        server_id_for_provider(&self.provider)
    }
}

impl Display for ResourceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider, self.primary)?;

        if let Some(ref secondary) = self.secondary {
            write!(f, ":{}", secondary)?;
        }

        Ok(())
    }
}

/// Provider-specific scope extraction strategy
pub trait ScopeExtractor: Send + Sync + Debug {
    /// Provider tag, also the suffix of the RBAC server id
    fn provider(&self) -> &'static str;

    /// Tool name tokens marking this provider's namespace
    fn namespaces(&self) -> &'static [&'static str];

    /// Derive a scope from tool arguments; `None` if no resource is identifiable
    fn extract(&self, args: &ToolArgs) -> Option<ResourceScope>;

    /// Whether a tool belongs to this provider
    fn handles(&self, tool_name: &str) -> bool {
        let namespaces = self.namespaces();
        let lowered = tool_name.to_ascii_lowercase();

        tool_name_tokens(tool_name)
            .iter()
            .any(|token| namespaces.contains(&token.as_str()))
            || namespaces.iter().any(|ns| lowered.starts_with(ns))
    }
}

/// First non-empty identifier among `keys`, trimmed and lowercased
pub(crate) fn first_identifier(args: &ToolArgs, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| args.get(*key).and_then(identifier_from_value))
}

/// Apply `pattern` to the first string argument among `keys` it matches
///
/// Returns the normalized capture groups 1 and 2.
pub(crate) fn first_path_match(
    args: &ToolArgs,
    keys: &[&str],
    pattern: &Regex,
) -> Option<(String, Option<String>)> {
    keys.iter().find_map(|key| {
        let text = args.get(*key)?.as_str()?;
        let captures = pattern.captures(text)?;
        let first = normalize(captures.get(1)?.as_str())?;
        let second = captures.get(2).and_then(|m| normalize(m.as_str()));

        Some((first, second))
    })
}

fn identifier_from_value(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => normalize(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

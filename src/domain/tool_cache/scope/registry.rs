//! Scope Extractor Registry
//!
//! Ordered set of provider strategies, keyed by provider tag.

use std::sync::Arc;

use tracing::debug;

use super::{
    AwsScopeExtractor, AzureScopeExtractor, GcpScopeExtractor, KubernetesScopeExtractor,
    ResourceScope, ScopeExtractor,
};
use crate::domain::tool_cache::ToolArgs;

/// Registry of scope extraction strategies
#[derive(Debug, Clone, Default)]
pub struct ScopeExtractorRegistry {
    extractors: Vec<Arc<dyn ScopeExtractor>>,
}

impl ScopeExtractorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in cloud providers
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(AzureScopeExtractor));
        registry.register(Arc::new(AwsScopeExtractor));
        registry.register(Arc::new(GcpScopeExtractor));
        registry.register(Arc::new(KubernetesScopeExtractor));
        registry
    }

    /// Register a strategy, replacing any existing one with the same tag
    pub fn register(&mut self, extractor: Arc<dyn ScopeExtractor>) {
        let tag = extractor.provider();

        match self.extractors.iter().position(|e| e.provider() == tag) {
            Some(idx) => {
                debug!(provider = %tag, "Replacing scope extractor");
                self.extractors[idx] = extractor;
            }
            None => {
                debug!(provider = %tag, "Registering scope extractor");
                self.extractors.push(extractor);
            }
        }
    }

    /// Provider tags in registration order
    pub fn providers(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.provider()).collect()
    }

    /// Derive the resource scope of a tool call
    ///
    /// The first strategy claiming the tool name decides; `None` means the
    /// result is never shared across users.
    pub fn extract(&self, tool_name: &str, args: &ToolArgs) -> Option<ResourceScope> {
        self.extractors
            .iter()
            .find(|e| e.handles(tool_name))
            .and_then(|e| e.extract(args))
    }
}

//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::services::ToolResultCacheTrait;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub tool_cache: Arc<dyn ToolResultCacheTrait>,
    /// Shared secret expected from the tool-execution layer; `None` disables the check
    pub service_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(tool_cache: Arc<dyn ToolResultCacheTrait>) -> Self {
        Self {
            tool_cache,
            service_key: None,
        }
    }

    pub fn with_service_key(mut self, service_key: Option<String>) -> Self {
        self.service_key = service_key
            .filter(|key| !key.trim().is_empty())
            .map(Arc::from);
        self
    }
}

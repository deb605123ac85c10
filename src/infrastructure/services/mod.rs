//! Infrastructure services

mod tool_result_cache_service;

pub use tool_result_cache_service::{ToolResultCache, ToolResultCacheTrait};

#[cfg(test)]
pub use tool_result_cache_service::MockToolResultCacheTrait;

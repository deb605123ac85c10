//! Filter expressions over cached result rows
//!
//! Backends compile a [`CacheFilter`] to their native form; the in-memory
//! store evaluates it directly with [`CacheFilter::matches`].

use std::fmt;

use super::{now_epoch_secs, CachedResult};

/// Filterable row columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheField {
    TenantId,
    ToolName,
    ExpiresAt,
    IsShared,
    ResourceScope,
    OriginalUserId,
}

impl CacheField {
    /// Column name in snake_case
    pub fn column(&self) -> &'static str {
        match self {
            Self::TenantId => "tenant_id",
            Self::ToolName => "tool_name",
            Self::ExpiresAt => "expires_at",
            Self::IsShared => "is_shared",
            Self::ResourceScope => "resource_scope",
            Self::OriginalUserId => "original_user_id",
        }
    }

    fn value_of(&self, row: &CachedResult) -> Option<FilterValue> {
        match self {
            Self::TenantId => Some(FilterValue::Text(row.tenant_id.clone())),
            Self::ToolName => Some(FilterValue::Text(row.tool_name.clone())),
            Self::ExpiresAt => Some(FilterValue::Integer(row.expires_at)),
            Self::IsShared => Some(FilterValue::Boolean(row.is_shared)),
            Self::ResourceScope => row.resource_scope.clone().map(FilterValue::Text),
            Self::OriginalUserId => Some(FilterValue::Text(row.original_user_id.clone())),
        }
    }
}

/// Comparison operand
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
    Boolean(bool),
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{:?}", s),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// Boolean filter expression
#[derive(Debug, Clone, PartialEq)]
pub enum CacheFilter {
    Eq(CacheField, FilterValue),
    Gt(CacheField, FilterValue),
    Lt(CacheField, FilterValue),
    And(Vec<CacheFilter>),
}

impl CacheFilter {
    pub fn eq(field: CacheField, value: impl Into<FilterValue>) -> Self {
        Self::Eq(field, value.into())
    }

    pub fn gt(field: CacheField, value: impl Into<FilterValue>) -> Self {
        Self::Gt(field, value.into())
    }

    pub fn lt(field: CacheField, value: impl Into<FilterValue>) -> Self {
        Self::Lt(field, value.into())
    }

    /// Conjunction; an empty conjunction matches every row
    pub fn and(filters: Vec<CacheFilter>) -> Self {
        Self::And(filters)
    }

    /// Filter matching every row
    pub fn all() -> Self {
        Self::And(Vec::new())
    }

    /// Rows of `tenant_id` for `tool_name` still live at `now`
    pub fn live_for_tool(tenant_id: &str, tool_name: &str, now: i64) -> Vec<CacheFilter> {
        vec![
            Self::eq(CacheField::TenantId, tenant_id),
            Self::eq(CacheField::ToolName, tool_name),
            Self::gt(CacheField::ExpiresAt, now),
        ]
    }

    /// Rows expired strictly before `now`
    pub fn expired_before(now: i64) -> Self {
        Self::lt(CacheField::ExpiresAt, now)
    }

    /// Rows expired at the current time
    pub fn expired() -> Self {
        Self::expired_before(now_epoch_secs())
    }

    /// Evaluate against a row
    ///
    /// A comparison on an absent value (unscoped row) never matches.
    pub fn matches(&self, row: &CachedResult) -> bool {
        match self {
            Self::Eq(field, value) => field.value_of(row).as_ref() == Some(value),
            Self::Gt(field, value) => compare(field.value_of(row), value, |a, b| a > b),
            Self::Lt(field, value) => compare(field.value_of(row), value, |a, b| a < b),
            Self::And(filters) => filters.iter().all(|f| f.matches(row)),
        }
    }
}

fn compare(
    actual: Option<FilterValue>,
    expected: &FilterValue,
    op: impl Fn(i64, i64) -> bool,
) -> bool {
    match (actual, expected) {
        (Some(FilterValue::Integer(a)), FilterValue::Integer(b)) => op(a, *b),
        _ => false,
    }
}

impl fmt::Display for CacheFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq(field, value) => write!(f, "{} == {}", field.column(), value),
            Self::Gt(field, value) => write!(f, "{} > {}", field.column(), value),
            Self::Lt(field, value) => write!(f, "{} < {}", field.column(), value),
            Self::And(filters) if filters.is_empty() => write!(f, "true"),
            Self::And(filters) => {
                for (idx, filter) in filters.iter().enumerate() {
                    if idx > 0 {
                        write!(f, " && ")?;
                    }
                    if matches!(filter, Self::And(_)) {
                        write!(f, "({})", filter)?;
                    } else {
                        write!(f, "{}", filter)?;
                    }
                }
                Ok(())
            }
        }
    }
}

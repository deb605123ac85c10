//! RBAC access checks for cross-user cache reads

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// Prefix of every RBAC server id derived from a provider tag
pub const SERVER_ID_PREFIX: &str = "awp_";

/// RBAC server id for a provider tag, e.g. `awp_azure`
pub fn server_id_for_provider(provider: &str) -> String {
    format!("{}{}", SERVER_ID_PREFIX, provider)
}

/// Identity of the user a check is made for
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessSubject {
    pub user_id: String,
    #[serde(default)]
    pub user_groups: Vec<String>,
    #[serde(default)]
    pub is_admin: bool,
}

impl AccessSubject {
    pub fn new(user_id: impl Into<String>, user_groups: Vec<String>, is_admin: bool) -> Self {
        Self {
            user_id: user_id.into(),
            user_groups,
            is_admin,
        }
    }
}

/// Outcome of an access check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecision {
    pub allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AccessDecision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

/// External RBAC policy evaluator
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AccessChecker: Send + Sync + Debug {
    /// Whether `subject` may currently read data guarded by `server_id`
    async fn check_access(
        &self,
        subject: &AccessSubject,
        server_id: &str,
    ) -> Result<AccessDecision, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_id() {
        assert_eq!(server_id_for_provider("azure"), "awp_azure");
        assert_eq!(server_id_for_provider("kubernetes"), "awp_kubernetes");
    }

    #[test]
    fn test_decision_constructors() {
        assert!(AccessDecision::allow().allowed);

        let denied = AccessDecision::deny("not a member");
        assert!(!denied.allowed);
        assert_eq!(denied.reason.as_deref(), Some("not a member"));
    }
}

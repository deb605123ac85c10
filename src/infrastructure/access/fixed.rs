use async_trait::async_trait;

use crate::domain::access::{AccessChecker, AccessDecision, AccessSubject};
use crate::domain::DomainError;

/// Access checker with a constant answer
///
/// `deny_all` is the fallback when no RBAC service is configured, which turns
/// cross-user sharing off while keeping per-user reuse.
#[derive(Debug, Clone, Copy)]
pub struct FixedAccessChecker {
    allowed: bool,
}

impl FixedAccessChecker {
    pub fn allow_all() -> Self {
        Self { allowed: true }
    }

    pub fn deny_all() -> Self {
        Self { allowed: false }
    }
}

#[async_trait]
impl AccessChecker for FixedAccessChecker {
    async fn check_access(
        &self,
        _subject: &AccessSubject,
        _server_id: &str,
    ) -> Result<AccessDecision, DomainError> {
        if self.allowed {
            Ok(AccessDecision::allow())
        } else {
            Ok(AccessDecision::deny("no RBAC service configured"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_answers() {
        let subject = AccessSubject::new("user-b", vec![], false);

        let granted = FixedAccessChecker::allow_all()
            .check_access(&subject, "awp_azure")
            .await
            .unwrap();
        let denied = FixedAccessChecker::deny_all()
            .check_access(&subject, "awp_azure")
            .await
            .unwrap();

        assert!(granted.allowed);
        assert!(!denied.allowed);
    }
}

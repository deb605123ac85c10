//! Access checker factory for runtime selection

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::{AccessConfig, AccessMode};
use crate::domain::access::AccessChecker;
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClient;

use super::fixed::FixedAccessChecker;
use super::http::HttpAccessChecker;

/// Factory for creating access checker instances
#[derive(Debug, Default)]
pub struct AccessCheckerFactory;

impl AccessCheckerFactory {
    pub fn create(config: &AccessConfig) -> Result<Arc<dyn AccessChecker>, DomainError> {
        match config.mode {
            AccessMode::DenyAll => {
                info!("No RBAC service configured, cross-user hits are disabled");
                Ok(Arc::new(FixedAccessChecker::deny_all()))
            }
            AccessMode::AllowAll => {
                warn!("Access checks disabled, every cross-user candidate is granted");
                Ok(Arc::new(FixedAccessChecker::allow_all()))
            }
            AccessMode::Http => {
                let base_url = config
                    .base_url
                    .as_deref()
                    .filter(|url| !url.trim().is_empty())
                    .ok_or_else(|| {
                        DomainError::configuration("access.base_url is required for http mode")
                    })?;

                if config.service_key.is_empty() {
                    warn!("access.service_key is empty, the RBAC service may reject checks");
                }

                let client =
                    HttpClient::with_timeout("rbac", Duration::from_secs(config.timeout_secs))?;
                let checker = HttpAccessChecker::new(client, base_url, &config.service_key)
                    .with_service_name(&config.service_name);

                info!(base_url = %base_url, "Using RBAC service for access checks");

                Ok(Arc::new(checker))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::access::AccessSubject;

    fn subject() -> AccessSubject {
        AccessSubject::new("user-b", vec![], false)
    }

    #[tokio::test]
    async fn test_default_denies() {
        let checker = AccessCheckerFactory::create(&AccessConfig::default()).unwrap();
        let decision = checker.check_access(&subject(), "awp_azure").await.unwrap();
        assert!(!decision.allowed);
    }

    #[tokio::test]
    async fn test_allow_all() {
        let config = AccessConfig {
            mode: AccessMode::AllowAll,
            ..Default::default()
        };

        let checker = AccessCheckerFactory::create(&config).unwrap();
        assert!(checker.check_access(&subject(), "awp_aws").await.unwrap().allowed);
    }

    #[test]
    fn test_http_requires_base_url() {
        let config = AccessConfig {
            mode: AccessMode::Http,
            ..Default::default()
        };

        let result = AccessCheckerFactory::create(&config);
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }
}

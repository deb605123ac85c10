//! RBAC service client

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::access::{AccessChecker, AccessDecision, AccessSubject};
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

pub const DEFAULT_SERVICE_NAME: &str = "semantic-tool-cache";

/// Asks the platform RBAC service whether a user may use an MCP server
///
/// Decisions are never cached; every cross-user read triggers a fresh check.
#[derive(Debug)]
pub struct HttpAccessChecker<C: HttpClientTrait> {
    client: C,
    base_url: String,
    service_key: String,
    service_name: String,
}

impl<C: HttpClientTrait> HttpAccessChecker<C> {
    pub fn new(client: C, base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
        }
    }

    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = service_name.into();
        self
    }

    fn access_check_url(&self) -> String {
        format!("{}/api/rbac/access-check", self.base_url)
    }
}

#[async_trait]
impl<C: HttpClientTrait> AccessChecker for HttpAccessChecker<C> {
    async fn check_access(
        &self,
        subject: &AccessSubject,
        server_id: &str,
    ) -> Result<AccessDecision, DomainError> {
        let user_id = subject.user_id.trim();
        if user_id.is_empty() || user_id == "default" {
            warn!(server_id = %server_id, "Access check without a real user id, denying");
            return Ok(AccessDecision::deny("missing user id"));
        }

        let body = serde_json::json!({
            "userId": user_id,
            "serverId": server_id,
            "userGroups": subject.user_groups,
            "isAdmin": subject.is_admin,
        });

        let headers = vec![
            ("X-Service-Auth", self.service_key.as_str()),
            ("X-Service-Name", self.service_name.as_str()),
        ];

        let json = self
            .client
            .post_json(&self.access_check_url(), headers, &body)
            .await
            .map_err(|e| DomainError::access_check(e.to_string()))?;

        let response: AccessCheckResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::access_check(format!("Failed to parse access check response: {}", e))
        })?;

        let allowed = response.allowed.or(response.has_access).unwrap_or(false);

        debug!(
            user_id = %user_id,
            server_id = %server_id,
            allowed,
            "RBAC access check"
        );

        Ok(AccessDecision {
            allowed,
            reason: response.reason,
        })
    }
}

/// Either field name is accepted; a response with neither is a denial
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessCheckResponse {
    allowed: Option<bool>,
    has_access: Option<bool>,
    reason: Option<String>,
}

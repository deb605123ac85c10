//! Service-to-service authentication
//!
//! The `/v1` and `/admin` routes trust the user identity in the request body,
//! so only the tool-execution layer may call them. It proves itself with the
//! shared key in `X-Service-Auth` (or `Authorization: Bearer <key>`).

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::types::ApiError;

pub const SERVICE_AUTH_HEADER: &str = "x-service-auth";
pub const SERVICE_NAME_HEADER: &str = "x-service-name";

/// Extractor that requires the sidecar service key
///
/// Holds the caller's `X-Service-Name`, when sent.
#[derive(Debug, Clone)]
pub struct RequireService(pub Option<String>);

impl FromRequestParts<AppState> for RequireService {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let caller = parts
            .headers
            .get(SERVICE_NAME_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let Some(expected) = state.service_key.as_deref() else {
            return Ok(RequireService(caller));
        };

        let provided = extract_service_key(&parts.headers)?;

        if !keys_match(expected, &provided) {
            warn!(caller = caller.as_deref().unwrap_or("unknown"), "Rejected service key");
            return Err(ApiError::unauthorized("Invalid service key"));
        }

        debug!(caller = caller.as_deref().unwrap_or("unknown"), "Service authenticated");
        Ok(RequireService(caller))
    }
}

fn extract_service_key(headers: &HeaderMap) -> Result<String, ApiError> {
    if let Some(value) = headers.get(SERVICE_AUTH_HEADER) {
        let key = value
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid X-Service-Auth header encoding"))?;

        return Ok(key.trim().to_string());
    }

    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let auth = value
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid Authorization header encoding"))?;

        if let Some(token) = auth.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
    }

    Err(ApiError::unauthorized(
        "Service key required. Provide via 'X-Service-Auth: <key>' header",
    ))
}

/// Compare digests so the comparison time does not depend on the key prefix
fn keys_match(expected: &str, provided: &str) -> bool {
    let expected = Sha256::digest(expected.as_bytes());
    let provided = Sha256::digest(provided.as_bytes());

    expected
        .iter()
        .zip(provided.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

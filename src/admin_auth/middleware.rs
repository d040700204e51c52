//! Axum middleware guarding the admin routes.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::Response;

use super::error::{AdminAuthCode, AdminAuthError};
use crate::gateway::state::AppState;
use crate::registry::RegistryError;

pub const HEADER_USERNAME: &str = "x-username";
pub const HEADER_PASSWORD: &str = "x-password";

/// Pull the credential pair out of the request headers.
pub fn extract_credentials(headers: &HeaderMap) -> Result<(String, String), AdminAuthError> {
    let get = |name: &str| -> Result<String, AdminAuthError> {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| AdminAuthError::from_code(AdminAuthCode::MissingCredentials))
    };
    Ok((get(HEADER_USERNAME)?, get(HEADER_PASSWORD)?))
}

/// Verify the admin credential against the seeded config rows.
///
/// A malformed credential store is a schema-integrity fault and surfaces
/// as an internal error, distinct from a plain rejection.
pub async fn admin_auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AdminAuthError> {
    let (username, password) = extract_credentials(request.headers())?;

    let verified = state
        .db
        .verify_admin(&username, &password)
        .await
        .map_err(|e| match e {
            RegistryError::CorruptConfig => {
                tracing::error!("config table malformed during admin verification");
                AdminAuthError::from_code(AdminAuthCode::InternalError)
            }
            other => {
                tracing::error!("admin verification failed: {other}");
                AdminAuthError::from_code(AdminAuthCode::InternalError)
            }
        })?;

    if !verified {
        return Err(AdminAuthError::from_code(AdminAuthCode::InvalidCredentials));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_credentials() {
        let mut headers = HeaderMap::new();
        headers.insert(HEADER_USERNAME, HeaderValue::from_static("admin"));
        headers.insert(HEADER_PASSWORD, HeaderValue::from_static("hunter2"));

        let (username, password) = extract_credentials(&headers).unwrap();
        assert_eq!(username, "admin");
        assert_eq!(password, "hunter2");
    }

    #[test]
    fn test_extract_credentials_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(HEADER_USERNAME, HeaderValue::from_static("admin"));

        let err = extract_credentials(&headers).unwrap_err();
        assert_eq!(err.code, AdminAuthCode::MissingCredentials);
    }
}

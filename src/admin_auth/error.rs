//! Admin authentication error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Admin authentication error codes (2001-2003).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum AdminAuthCode {
    /// 2001: credential headers absent or malformed
    MissingCredentials = 2001,
    /// 2002: username/password mismatch
    InvalidCredentials = 2002,
    /// 2003: credential store unreadable or malformed
    InternalError = 2003,
}

impl AdminAuthCode {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::MissingCredentials => "MISSING_CREDENTIALS",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    pub fn http_status(self) -> StatusCode {
        match self {
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

/// Admin authentication error with message.
#[derive(Debug, Clone)]
pub struct AdminAuthError {
    pub code: AdminAuthCode,
    pub message: String,
}

impl AdminAuthError {
    pub fn new(code: AdminAuthCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn from_code(code: AdminAuthCode) -> Self {
        let message = match code {
            AdminAuthCode::MissingCredentials => "Missing admin credential headers",
            AdminAuthCode::InvalidCredentials => "Invalid admin username or password",
            AdminAuthCode::InternalError => "Could not verify admin credentials",
        };
        Self::new(code, message)
    }
}

/// JSON response body for admin auth errors.
#[derive(Debug, Serialize)]
pub struct AdminAuthErrorResponse {
    pub code: i32,
    pub error: &'static str,
    pub message: String,
}

impl IntoResponse for AdminAuthError {
    fn into_response(self) -> Response {
        let body = AdminAuthErrorResponse {
            code: self.code.code(),
            error: self.code.name(),
            message: self.message,
        };
        (self.code.http_status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AdminAuthCode::MissingCredentials.code(), 2001);
        assert_eq!(AdminAuthCode::InvalidCredentials.code(), 2002);
        assert_eq!(AdminAuthCode::InternalError.code(), 2003);
    }

    #[test]
    fn test_http_status() {
        assert_eq!(
            AdminAuthCode::InvalidCredentials.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AdminAuthCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_from_code() {
        let err = AdminAuthError::from_code(AdminAuthCode::InvalidCredentials);
        assert_eq!(err.code, AdminAuthCode::InvalidCredentials);
        assert!(err.message.contains("Invalid"));
    }
}

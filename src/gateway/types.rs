//! API response types and error codes.

use serde::Serialize;
use utoipa::ToSchema;

/// Unified API response wrapper.
///
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or null (error)
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response code: 0 for success, non-zero for errors
    #[schema(example = 0)]
    pub code: i32,
    /// Response message
    #[schema(example = "ok")]
    pub msg: String,
    /// Response data (only present when code == 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }

    /// Create error response
    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

/// Response body for the payment gateway IPN endpoint, in the gateway's
/// own schema.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct IpnResponse {
    /// "00" updated, "02" already applied, "97" invalid signature,
    /// "99" missing required fields
    #[schema(example = "00")]
    pub rsp_code: String,
    #[schema(example = "Data has been updated successfully")]
    pub message: String,
}

impl IpnResponse {
    pub fn new(rsp_code: &str, message: &str) -> Self {
        Self {
            rsp_code: rsp_code.to_string(),
            message: message.to_string(),
        }
    }
}

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Registration intake failures are 101-107; see registry::RejectCode.

    // Auth errors (2xxx)
    pub const MISSING_AUTH: i32 = 2001;
    pub const AUTH_FAILED: i32 = 2002;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipn_response_field_names() {
        let body = serde_json::to_value(IpnResponse::new("00", "ok")).unwrap();
        assert_eq!(body["RspCode"], "00");
        assert_eq!(body["Message"], "ok");
    }

    #[test]
    fn test_error_response_omits_data() {
        let body = serde_json::to_value(ApiResponse::<()>::error(107, "conflict")).unwrap();
        assert_eq!(body["code"], 107);
        assert!(body.get("data").is_none());
    }
}

//! Admin credential verification for the management routes.

pub mod error;
pub mod middleware;

pub use error::{AdminAuthCode, AdminAuthError};
pub use middleware::{HEADER_PASSWORD, HEADER_USERNAME, admin_auth_middleware, extract_credentials};

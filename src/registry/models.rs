//! Data models for the registration queue and resident records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A pending registration request. One row in `register_queue`.
///
/// Immutable once created; removed exactly once by admission or rejection.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RegistrationRequest {
    pub request_id: i64,
    pub name: String,
    pub room: i32,
    pub birthday: Option<DateTime<Utc>>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub username: String,
    pub hashed_password: String,
}

impl RegistrationRequest {
    /// Projection safe to return to clients (no credential material).
    pub fn to_public(&self) -> PublicInfo {
        PublicInfo {
            id: self.request_id,
            name: self.name.clone(),
            room: self.room,
            birthday: self.birthday,
            phone: self.phone.clone(),
            email: self.email.clone(),
            username: self.username.clone(),
        }
    }
}

/// An admitted resident. One row in `residents`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Resident {
    pub resident_id: i64,
    pub name: String,
    pub room: i32,
    pub birthday: Option<DateTime<Utc>>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub username: String,
    pub hashed_password: String,
}

/// Public projection of a request or resident.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicInfo {
    #[schema(example = 1234567890123_i64)]
    pub id: i64,
    #[schema(example = "Bob Smith")]
    pub name: String,
    #[schema(example = 12)]
    pub room: i32,
    pub birthday: Option<DateTime<Utc>>,
    #[schema(example = "0123456789")]
    pub phone: Option<String>,
    #[schema(example = "bob@example.com")]
    pub email: Option<String>,
    #[schema(example = "bob")]
    pub username: String,
}

/// A fee schedule entry. Owned by the fee-management collaborator; this
/// service only reads it. `lower <= upper` is enforced by a table CHECK.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Fee {
    pub fee_id: i64,
    pub name: String,
    pub lower: i64,
    pub upper: i64,
    pub effective_date: DateTime<Utc>,
    pub description: Option<String>,
}

/// Raw intake fields for a registration request, before validation.
/// `password` is the plaintext credential; it is hashed before storage.
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub name: String,
    pub room: i32,
    pub birthday: Option<DateTime<Utc>>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub username: String,
    pub password: String,
}

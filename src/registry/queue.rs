//! Registration queue: validated intake, search and counting.
//!
//! Intake runs the field validators in a fixed order and maps the first
//! failure to its numeric code. The insert itself is a single conditional
//! statement so the cross-table username guard cannot race a concurrent
//! intake for the same username.

use sqlx::{PgPool, Postgres, QueryBuilder};

use super::error::RegistryError;
use super::models::{NewRegistration, RegistrationRequest};
use super::password::hash_password;
use crate::snowflake::IdAllocator;
use crate::validation::{
    validate_email, validate_name, validate_password, validate_phone, validate_room,
    validate_username,
};

/// Numeric failure codes for registration intake, one per field plus the
/// username-conflict code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum RejectCode {
    Name = 101,
    Room = 102,
    Phone = 103,
    Email = 104,
    Username = 105,
    Password = 106,
    UsernameTaken = 107,
}

impl RejectCode {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Name => "Invalid name",
            Self::Room => "Invalid room number",
            Self::Phone => "Invalid phone number",
            Self::Email => "Invalid email address",
            Self::Username => "Invalid username",
            Self::Password => "Password does not meet the strength policy",
            Self::UsernameTaken => "Username already registered or pending",
        }
    }
}

/// Result of an intake attempt. Rejections are ordinary data, not faults.
#[derive(Debug)]
pub enum CreateOutcome {
    Created(RegistrationRequest),
    Rejected(RejectCode),
}

/// Normalize optional fields and run the validators in intake order.
///
/// Empty optional strings become absent before their validators run, so a
/// blank phone or email field is simply "not provided".
pub fn validate_intake(input: &mut NewRegistration) -> Option<RejectCode> {
    if matches!(&input.phone, Some(p) if p.is_empty()) {
        input.phone = None;
    }
    if matches!(&input.email, Some(e) if e.is_empty()) {
        input.email = None;
    }

    if !validate_name(&input.name) {
        return Some(RejectCode::Name);
    }
    if !validate_room(input.room) {
        return Some(RejectCode::Room);
    }
    if let Some(phone) = &input.phone {
        if !validate_phone(phone) {
            return Some(RejectCode::Phone);
        }
    }
    if let Some(email) = &input.email {
        if !validate_email(email) {
            return Some(RejectCode::Email);
        }
    }
    if !validate_username(&input.username) {
        return Some(RejectCode::Username);
    }
    if !validate_password(&input.password) {
        return Some(RejectCode::Password);
    }

    None
}

/// Optional filters shared by `query` and `count`.
#[derive(Debug, Clone, Default)]
pub struct QueueFilter {
    /// Equality match on request id.
    pub id: Option<i64>,
    /// Substring match on name.
    pub name: Option<String>,
    /// Equality match on room.
    pub room: Option<i32>,
    /// Equality match on username.
    pub username: Option<String>,
}

impl QueueFilter {
    /// A filter whose value fails its validator matches nothing; the search
    /// short-circuits to an empty result instead of erroring.
    fn is_satisfiable(&self) -> bool {
        if matches!(&self.name, Some(n) if !validate_name(n)) {
            return false;
        }
        if matches!(self.room, Some(r) if !validate_room(r)) {
            return false;
        }
        if matches!(&self.username, Some(u) if !validate_username(u)) {
            return false;
        }
        true
    }

    fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        let mut sep = " WHERE ";
        if let Some(id) = self.id {
            qb.push(sep).push("request_id = ").push_bind(id);
            sep = " AND ";
        }
        if let Some(name) = &self.name {
            qb.push(sep)
                .push("POSITION(")
                .push_bind(name.clone())
                .push(" IN name) > 0");
            sep = " AND ";
        }
        if let Some(room) = self.room {
            qb.push(sep).push("room = ").push_bind(room);
            sep = " AND ";
        }
        if let Some(username) = &self.username {
            qb.push(sep).push("username = ").push_bind(username.clone());
        }
    }
}

/// Sortable columns. Anything outside the allow-list silently falls back
/// to the id column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBy {
    #[default]
    RequestId,
    Name,
    Room,
    Username,
}

impl OrderBy {
    pub fn from_param(value: &str) -> Self {
        match value {
            "name" => Self::Name,
            "room" => Self::Room,
            "username" => Self::Username,
            _ => Self::RequestId,
        }
    }

    fn column(self) -> &'static str {
        match self {
            Self::RequestId => "request_id",
            Self::Name => "name",
            Self::Room => "room",
            Self::Username => "username",
        }
    }
}

const REQUEST_COLUMNS: &str =
    "request_id, name, room, birthday, phone, email, username, hashed_password";

/// Repository for the pending queue.
pub struct RegistrationQueue;

impl RegistrationQueue {
    /// Validate and insert a new registration request.
    ///
    /// The insert is conditional on the username existing in neither the
    /// resident table nor the queue: the NOT EXISTS guard and the unique
    /// index on `register_queue.username` are evaluated inside one
    /// statement, so of any number of concurrent intakes for a username at
    /// most one row lands and the rest report the conflict code.
    pub async fn create(
        pool: &PgPool,
        ids: &IdAllocator,
        mut input: NewRegistration,
    ) -> Result<CreateOutcome, RegistryError> {
        if let Some(code) = validate_intake(&mut input) {
            return Ok(CreateOutcome::Rejected(code));
        }

        let hashed = hash_password(&input.password)?;
        let request_id = ids.next_i64();

        let row: Option<RegistrationRequest> = sqlx::query_as(
            r#"
            INSERT INTO register_queue
                (request_id, name, room, birthday, phone, email, username, hashed_password)
            SELECT $1::bigint, $2::varchar, $3::int, $4::timestamptz,
                   $5::varchar, $6::varchar, $7::varchar, $8::varchar
            WHERE NOT EXISTS (SELECT 1 FROM residents WHERE username = $7)
            ON CONFLICT (username) DO NOTHING
            RETURNING request_id, name, room, birthday, phone, email, username, hashed_password
            "#,
        )
        .bind(request_id)
        .bind(&input.name)
        .bind(input.room)
        .bind(input.birthday)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.username)
        .bind(&hashed)
        .fetch_optional(pool)
        .await?;

        match row {
            Some(request) => {
                tracing::info!(
                    request_id = request.request_id,
                    username = %request.username,
                    "registration request queued"
                );
                Ok(CreateOutcome::Created(request))
            }
            None => Ok(CreateOutcome::Rejected(RejectCode::UsernameTaken)),
        }
    }

    /// Fetch one page of the queue.
    pub async fn query(
        pool: &PgPool,
        filter: &QueueFilter,
        offset: i64,
        page_size: i64,
        order_by: OrderBy,
        ascending: bool,
    ) -> Result<Vec<RegistrationRequest>, RegistryError> {
        if !filter.is_satisfiable() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::new(format!("SELECT {REQUEST_COLUMNS} FROM register_queue"));
        filter.push_where(&mut qb);
        qb.push(" ORDER BY ")
            .push(order_by.column())
            .push(if ascending { " ASC" } else { " DESC" });
        qb.push(" LIMIT ").push_bind(page_size);
        qb.push(" OFFSET ").push_bind(offset);

        let rows = qb.build_query_as().fetch_all(pool).await?;
        Ok(rows)
    }

    /// Count queue rows matching the filter.
    pub async fn count(pool: &PgPool, filter: &QueueFilter) -> Result<i64, RegistryError> {
        if !filter.is_satisfiable() {
            return Ok(0);
        }

        let mut qb = QueryBuilder::new("SELECT COUNT(request_id) FROM register_queue");
        filter.push_where(&mut qb);

        let count = qb.build_query_scalar().fetch_one(pool).await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intake(name: &str, room: i32, username: &str, password: &str) -> NewRegistration {
        NewRegistration {
            name: name.to_string(),
            room,
            birthday: None,
            phone: None,
            email: None,
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_reject_codes() {
        assert_eq!(RejectCode::Name.code(), 101);
        assert_eq!(RejectCode::Password.code(), 106);
        assert_eq!(RejectCode::UsernameTaken.code(), 107);
    }

    #[test]
    fn test_validation_order_name_first() {
        // Both name and room invalid: name's code wins.
        let mut input = intake(&"x".repeat(300), -1, "bob", "Str0ng!pwd");
        assert_eq!(validate_intake(&mut input), Some(RejectCode::Name));
    }

    #[test]
    fn test_validation_each_field() {
        let mut input = intake("Bob", -1, "bob", "Str0ng!pwd");
        assert_eq!(validate_intake(&mut input), Some(RejectCode::Room));

        let mut input = intake("Bob", 5, "bob", "Str0ng!pwd");
        input.phone = Some("abc".to_string());
        assert_eq!(validate_intake(&mut input), Some(RejectCode::Phone));

        let mut input = intake("Bob", 5, "bob", "Str0ng!pwd");
        input.email = Some("not-an-email".to_string());
        assert_eq!(validate_intake(&mut input), Some(RejectCode::Email));

        let mut input = intake("Bob", 5, "x", "Str0ng!pwd");
        assert_eq!(validate_intake(&mut input), Some(RejectCode::Username));

        let mut input = intake("Bob", 5, "bob", "weak");
        assert_eq!(validate_intake(&mut input), Some(RejectCode::Password));

        let mut input = intake("Bob", 5, "bob", "Str0ng!pwd");
        assert_eq!(validate_intake(&mut input), None);
    }

    #[test]
    fn test_empty_optionals_normalized_before_validation() {
        let mut input = intake("Bob", 5, "bob", "Str0ng!pwd");
        input.phone = Some(String::new());
        input.email = Some(String::new());
        assert_eq!(validate_intake(&mut input), None);
        assert!(input.phone.is_none());
        assert!(input.email.is_none());
    }

    #[test]
    fn test_order_by_allow_list() {
        assert_eq!(OrderBy::from_param("username"), OrderBy::Username);
        assert_eq!(OrderBy::from_param("room"), OrderBy::Room);
        // Unknown columns silently fall back to the id ordering.
        assert_eq!(OrderBy::from_param("hashed_password"), OrderBy::RequestId);
        assert_eq!(OrderBy::from_param(""), OrderBy::RequestId);
    }

    #[test]
    fn test_unsatisfiable_filter() {
        let filter = QueueFilter {
            room: Some(-1),
            ..Default::default()
        };
        assert!(!filter.is_satisfiable());

        let filter = QueueFilter {
            username: Some("not a username!".to_string()),
            ..Default::default()
        };
        assert!(!filter.is_satisfiable());

        assert!(QueueFilter::default().is_satisfiable());
    }
}

//! Read access to admitted residents.

use sqlx::PgPool;

use super::models::Resident;

pub struct ResidentRepository;

impl ResidentRepository {
    /// Get resident by id.
    pub async fn get_by_id(pool: &PgPool, resident_id: i64) -> Result<Option<Resident>, sqlx::Error> {
        let row: Option<Resident> = sqlx::query_as(
            r#"SELECT resident_id, name, room, birthday, phone, email, username, hashed_password
               FROM residents WHERE resident_id = $1"#,
        )
        .bind(resident_id)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }

    /// Get resident by username.
    pub async fn get_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Resident>, sqlx::Error> {
        let row: Option<Resident> = sqlx::query_as(
            r#"SELECT resident_id, name, room, birthday, phone, email, username, hashed_password
               FROM residents WHERE username = $1"#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }
}

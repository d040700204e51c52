//! Read-only access to the fee schedule.
//!
//! Fee rows are owned by the fee-management collaborator; the settlement
//! path only reads them.

use sqlx::PgPool;

use super::models::Fee;

pub struct FeeRepository;

impl FeeRepository {
    pub async fn get_by_id(pool: &PgPool, fee_id: i64) -> Result<Option<Fee>, sqlx::Error> {
        let row: Option<Fee> = sqlx::query_as(
            r#"SELECT fee_id, name, lower, upper, effective_date, description
               FROM fees WHERE fee_id = $1"#,
        )
        .bind(fee_id)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }
}

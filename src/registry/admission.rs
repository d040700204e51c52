//! Bulk admission and rejection of pending registration requests.
//!
//! A request row belongs to exactly one of {register_queue, residents} at
//! any time. `accept` moves rows with a single data-modifying statement
//! (DELETE feeding an INSERT through a CTE), so a row can never be lost
//! between the delete and the insert, nor end up in both tables.

use sqlx::PgPool;

use super::error::RegistryError;
use crate::snowflake::IdAllocator;

pub struct AdmissionEngine;

impl AdmissionEngine {
    /// Admit the given pending requests as residents.
    ///
    /// Each matched queue row is deleted and re-inserted into `residents`
    /// under a freshly allocated resident id, all fields carried over
    /// unchanged. Ids not present in the queue are skipped without error,
    /// which also makes re-submission of an already-processed batch a
    /// no-op. Returns the number of rows moved.
    pub async fn accept(
        pool: &PgPool,
        ids: &IdAllocator,
        request_ids: &[i64],
    ) -> Result<u64, RegistryError> {
        if request_ids.is_empty() {
            return Ok(0);
        }

        let resident_ids: Vec<i64> = request_ids.iter().map(|_| ids.next_i64()).collect();

        let result = sqlx::query(
            r#"
            WITH mapping AS (
                SELECT request_id, resident_id
                FROM UNNEST($1::bigint[], $2::bigint[]) AS t(request_id, resident_id)
            ), moved AS (
                DELETE FROM register_queue q
                USING mapping m
                WHERE q.request_id = m.request_id
                RETURNING m.resident_id, q.name, q.room, q.birthday,
                          q.phone, q.email, q.username, q.hashed_password
            )
            INSERT INTO residents
                (resident_id, name, room, birthday, phone, email, username, hashed_password)
            SELECT resident_id, name, room, birthday, phone, email, username, hashed_password
            FROM moved
            "#,
        )
        .bind(request_ids)
        .bind(&resident_ids)
        .execute(pool)
        .await?;

        let moved = result.rows_affected();
        tracing::info!(requested = request_ids.len(), moved, "admission batch accepted");
        Ok(moved)
    }

    /// Reject the given pending requests, deleting their queue rows.
    ///
    /// Unknown ids are skipped without error. Returns the number of rows
    /// deleted.
    pub async fn reject(pool: &PgPool, request_ids: &[i64]) -> Result<u64, RegistryError> {
        if request_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM register_queue WHERE request_id = ANY($1)")
            .bind(request_ids)
            .execute(pool)
            .await?;

        let deleted = result.rows_affected();
        tracing::info!(requested = request_ids.len(), deleted, "admission batch rejected");
        Ok(deleted)
    }
}

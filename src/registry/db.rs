//! Database connection management and schema bootstrap.

use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use super::error::RegistryError;
use super::password::{hash_password, verify_password};

/// PostgreSQL database connection pool.
///
/// Constructed once at startup and shared by reference through the gateway
/// state. Callers beyond pool capacity queue for a connection; a queued
/// acquisition that outlives the timeout surfaces as a transient error.
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        tracing::info!("PostgreSQL connection pool established");
        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Create the tables this service owns and seed the admin credential.
    ///
    /// Idempotent: every statement is `IF NOT EXISTS` / `ON CONFLICT DO
    /// NOTHING`, so a restart against an initialized database changes
    /// nothing. The admin seed only lands on first initialization; the
    /// config rows are read-only afterwards.
    pub async fn init_schema(
        &self,
        admin_username: &str,
        admin_password: &str,
    ) -> Result<(), RegistryError> {
        tracing::info!("Initializing registry schema...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS residents (
                resident_id BIGINT PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                room INT NOT NULL,
                birthday TIMESTAMPTZ,
                phone VARCHAR(15),
                email VARCHAR(255),
                username VARCHAR(255) UNIQUE NOT NULL,
                hashed_password VARCHAR(255) NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS register_queue (
                request_id BIGINT PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                room INT NOT NULL,
                birthday TIMESTAMPTZ,
                phone VARCHAR(15),
                email VARCHAR(255),
                username VARCHAR(255) UNIQUE NOT NULL,
                hashed_password VARCHAR(255) NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS fees (
                fee_id BIGINT PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                lower BIGINT NOT NULL,
                upper BIGINT NOT NULL,
                effective_date TIMESTAMPTZ NOT NULL,
                description VARCHAR(255),
                CHECK (lower <= upper)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS payments (
                room INT NOT NULL,
                fee_id BIGINT NOT NULL,
                amount BIGINT NOT NULL,
                nonce BIGINT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                PRIMARY KEY (room, fee_id, amount, nonce)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS config (
                name VARCHAR(255) PRIMARY KEY,
                value VARCHAR(255) NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        let hashed = hash_password(admin_password)?;
        sqlx::query(
            r#"
            INSERT INTO config (name, value)
            VALUES ('admin_username', $1), ('admin_hashed_password', $2)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(admin_username)
        .bind(&hashed)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Verify the admin credential against the seeded config rows.
    ///
    /// Exactly two rows must exist; anything else is a schema-integrity
    /// fault and aborts the current request rather than degrading to a
    /// silent auth failure.
    pub async fn verify_admin(
        &self,
        username: &str,
        password: &str,
    ) -> Result<bool, RegistryError> {
        let rows = sqlx::query(
            "SELECT name, value FROM config WHERE name IN ('admin_username', 'admin_hashed_password')",
        )
        .fetch_all(&self.pool)
        .await?;

        if rows.len() != 2 {
            return Err(RegistryError::CorruptConfig);
        }

        for row in rows {
            let name: String = row.get("name");
            let value: String = row.get("value");
            if name == "admin_username" {
                if username != value {
                    return Ok(false);
                }
            } else if !verify_password(password, &value) {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

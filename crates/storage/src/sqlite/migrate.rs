use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Newest schema version this build knows how to create.
pub const SCHEMA_VERSION: i64 = 1;

/// Applies schema migrations that have not run yet and returns the schema
/// version now in place.
///
/// Version 1 creates the `climb_sessions` table. Routes and exercises are
/// stored as JSON arrays in text columns; duration is whole minutes.
pub async fn run_migrations(pool: &SqlitePool) -> Result<i64, SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    if is_applied(pool, SCHEMA_VERSION).await? {
        tracing::debug!(version = SCHEMA_VERSION, "schema up to date");
        return Ok(SCHEMA_VERSION);
    }

    let mut tx = pool.begin().await?;

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS climb_sessions (
                id INTEGER PRIMARY KEY,
                user_id TEXT NOT NULL,
                date TEXT NOT NULL,
                location TEXT,
                duration_minutes INTEGER CHECK (duration_minutes IS NULL OR duration_minutes >= 0),
                exercises TEXT NOT NULL DEFAULT '[]',
                routes TEXT NOT NULL DEFAULT '[]'
            );
        ",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
            CREATE INDEX IF NOT EXISTS idx_climb_sessions_user_date
                ON climb_sessions (user_id, date);
        ",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
            INSERT INTO schema_migrations (version, applied_at)
            VALUES (?1, ?2)
            ON CONFLICT(version) DO NOTHING
        ",
    )
    .bind(SCHEMA_VERSION)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::info!(version = SCHEMA_VERSION, "applied schema migration");

    Ok(SCHEMA_VERSION)
}

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

use crate::repository::{SessionRepository, Storage};

mod mapping;
mod migrate;
mod session_repo;

pub use migrate::SCHEMA_VERSION;

/// Connections kept by the session store pool.
const MAX_CONNECTIONS: u32 = 5;
/// How long a writer waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// `SQLite`-backed session store.
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Connection options for a session database: WAL journal and a busy
/// timeout so concurrent writers wait instead of failing.
///
/// # Errors
///
/// Returns `SqliteInitError` if `database_url` is not a valid `SQLite` URL.
pub fn connect_options(database_url: &str) -> Result<SqliteConnectOptions, SqliteInitError> {
    Ok(SqliteConnectOptions::from_str(database_url)?
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT))
}

impl SqliteRepository {
    /// Connect to `SQLite` using the given URL.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the URL is invalid or the pool cannot be
    /// opened.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        Self::connect_with(connect_options(database_url)?).await
    }

    /// Connect with explicit options, e.g. from [`connect_options`].
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the pool cannot be opened.
    pub async fn connect_with(options: SqliteConnectOptions) -> Result<Self, SqliteInitError> {
        let filename = options.get_filename().display().to_string();
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(BUSY_TIMEOUT)
            .connect_with(options)
            .await?;
        tracing::debug!(db = %filename, "opened session store");
        Ok(Self { pool })
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Bring the `climb_sessions` schema up to date and return its version.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if migration queries fail.
    pub async fn migrate(&self) -> Result<i64, SqliteInitError> {
        migrate::run_migrations(&self.pool).await
    }
}

impl Storage {
    /// Build a `Storage` backed by `SQLite`, running migrations first.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if connection or migrations cannot be
    /// completed.
    pub async fn sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        let repo = SqliteRepository::connect(database_url).await?;
        let version = repo.migrate().await?;
        tracing::info!(schema_version = version, "session store ready");
        let sessions: Arc<dyn SessionRepository> = Arc::new(repo);
        Ok(Self { sessions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SqliteRepository>();
    }

    #[test]
    fn options_keep_the_database_path() {
        let options = connect_options("sqlite://data/climb.sqlite3").unwrap();
        assert!(options.get_filename().ends_with("climb.sqlite3"));
        assert!(connect_options("sqlite://climb.sqlite3?mode=nonsense").is_err());
    }

    #[tokio::test]
    async fn migrate_reports_the_schema_version() {
        let options = connect_options("sqlite:file:memdb_version?mode=memory&cache=shared")
            .unwrap();
        let repo = SqliteRepository::connect_with(options).await.unwrap();
        assert_eq!(repo.migrate().await.unwrap(), SCHEMA_VERSION);
        assert_eq!(repo.migrate().await.unwrap(), SCHEMA_VERSION);
    }
}

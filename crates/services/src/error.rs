//! Shared error types for the services crate.

use thiserror::Error;

use climb_core::model::{SessionError, SessionId};
use storage::legacy::LegacyError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `StatsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatsError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `SessionLogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionLogError {
    #[error("session {0} not found")]
    NotFound(SessionId),
    #[error("session {0} belongs to another user")]
    NotOwner(SessionId),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ImportService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ImportError {
    #[error("row {index}: {source}")]
    Row {
        index: usize,
        #[source]
        source: LegacyError,
    },
    #[error("row {index}: {source}")]
    Invalid {
        index: usize,
        #[source]
        source: SessionError,
    },
    #[error(transparent)]
    Legacy(#[from] LegacyError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by identity providers and `AuthSession`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AuthError {
    #[error("not signed in")]
    SignedOut,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("an account with this email already exists")]
    EmailTaken,
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("password must be at least {min} characters")]
    WeakPassword { min: usize },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}

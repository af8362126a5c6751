use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::import_service::ImportService;
use crate::session_log_service::SessionLogService;
use crate::stats_service::StatsService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    session_log: Arc<SessionLogService>,
    stats: Arc<StatsService>,
    import: Arc<ImportService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock))
    }

    /// Build services over a fresh in-memory store.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::from_storage(&Storage::in_memory(), clock)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        Self {
            session_log: Arc::new(SessionLogService::new(Arc::clone(&storage.sessions))),
            stats: Arc::new(StatsService::new(clock, Arc::clone(&storage.sessions))),
            import: Arc::new(ImportService::new(Arc::clone(&storage.sessions))),
        }
    }

    #[must_use]
    pub fn session_log(&self) -> Arc<SessionLogService> {
        Arc::clone(&self.session_log)
    }

    #[must_use]
    pub fn stats(&self) -> Arc<StatsService> {
        Arc::clone(&self.stats)
    }

    #[must_use]
    pub fn import(&self) -> Arc<ImportService> {
        Arc::clone(&self.import)
    }
}

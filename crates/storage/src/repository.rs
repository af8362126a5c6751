use async_trait::async_trait;
use chrono::NaiveDate;
use climb_core::model::{ClimbSession, SessionDetails, SessionId, UserId};
use climb_core::stats::sort_newest_first;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("store unavailable: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Insert payload for a session that has no id yet.
#[derive(Debug, Clone)]
pub struct NewSessionRecord {
    pub user_id: UserId,
    pub details: SessionDetails,
}

impl NewSessionRecord {
    #[must_use]
    pub fn new(user_id: UserId, details: SessionDetails) -> Self {
        Self { user_id, details }
    }
}

/// Repository contract for climbing sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Sessions owned by `user_id`, newest first. `from` drops sessions dated
    /// before it; callers still filter precisely on their side.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be queried. An empty result
    /// is `Ok(vec![])`, never an error.
    async fn list_sessions(
        &self,
        user_id: UserId,
        from: Option<NaiveDate>,
    ) -> Result<Vec<ClimbSession>, StorageError>;

    /// Fetch a session by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn get_session(&self, id: SessionId) -> Result<Option<ClimbSession>, StorageError>;

    /// Insert a session and return its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be stored.
    async fn insert_session(&self, record: NewSessionRecord) -> Result<SessionId, StorageError>;

    /// Insert several sessions as one unit: on error none of them is stored.
    /// IDs are returned in input order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if any session cannot be stored.
    async fn insert_sessions(
        &self,
        records: Vec<NewSessionRecord>,
    ) -> Result<Vec<SessionId>, StorageError>;

    /// Overwrite an existing session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no session has this ID.
    async fn update_session(&self, session: &ClimbSession) -> Result<(), StorageError>;

    /// Delete a session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no session has this ID.
    async fn delete_session(&self, id: SessionId) -> Result<(), StorageError>;
}

#[derive(Default)]
struct InMemoryState {
    next_id: u64,
    sessions: BTreeMap<SessionId, ClimbSession>,
}

impl InMemoryState {
    fn insert(&mut self, record: NewSessionRecord) -> SessionId {
        self.next_id += 1;
        let id = SessionId::new(self.next_id);
        self.sessions
            .insert(id, ClimbSession::new(id, record.user_id, record.details));
        id
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, InMemoryState>, StorageError> {
        self.state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

#[async_trait]
impl SessionRepository for InMemoryRepository {
    async fn list_sessions(
        &self,
        user_id: UserId,
        from: Option<NaiveDate>,
    ) -> Result<Vec<ClimbSession>, StorageError> {
        let guard = self.lock()?;
        let mut found: Vec<ClimbSession> = guard
            .sessions
            .values()
            .filter(|s| s.user_id() == user_id)
            .filter(|s| from.is_none_or(|from| s.date() >= from))
            .cloned()
            .collect();
        sort_newest_first(&mut found);
        Ok(found)
    }

    async fn get_session(&self, id: SessionId) -> Result<Option<ClimbSession>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.sessions.get(&id).cloned())
    }

    async fn insert_session(&self, record: NewSessionRecord) -> Result<SessionId, StorageError> {
        let mut guard = self.lock()?;
        Ok(guard.insert(record))
    }

    async fn insert_sessions(
        &self,
        records: Vec<NewSessionRecord>,
    ) -> Result<Vec<SessionId>, StorageError> {
        let mut guard = self.lock()?;
        Ok(records.into_iter().map(|record| guard.insert(record)).collect())
    }

    async fn update_session(&self, session: &ClimbSession) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        match guard.sessions.get_mut(&session.id()) {
            Some(slot) => {
                *slot = session.clone();
                Ok(())
            }
            None => Err(StorageError::NotFound),
        }
    }

    async fn delete_session(&self, id: SessionId) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        guard
            .sessions
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }
}

/// Repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub sessions: Arc<dyn SessionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let sessions: Arc<dyn SessionRepository> = Arc::new(InMemoryRepository::new());
        Self { sessions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use climb_core::model::{RouteAttempt, SessionDraft};
    use climb_core::time::days_ago;

    fn details(days: i64) -> SessionDetails {
        SessionDraft {
            date: Some(days_ago(days)),
            location: "Boulders".into(),
            duration: "1t".into(),
            exercises: vec![],
            routes: vec![RouteAttempt::colored("Gul")],
        }
        .validate()
        .unwrap()
    }

    #[tokio::test]
    async fn lists_only_the_owners_sessions_newest_first() {
        let repo = InMemoryRepository::new();
        let alice = UserId::random();
        let bob = UserId::random();
        let old = repo
            .insert_session(NewSessionRecord::new(alice, details(5)))
            .await
            .unwrap();
        let new = repo
            .insert_session(NewSessionRecord::new(alice, details(1)))
            .await
            .unwrap();
        repo.insert_session(NewSessionRecord::new(bob, details(0)))
            .await
            .unwrap();

        let ids: Vec<_> = repo
            .list_sessions(alice, None)
            .await
            .unwrap()
            .iter()
            .map(ClimbSession::id)
            .collect();
        assert_eq!(ids, vec![new, old]);

        let recent = repo.list_sessions(alice, Some(days_ago(3))).await.unwrap();
        assert_eq!(recent.len(), 1);
    }

    #[tokio::test]
    async fn update_and_delete_require_existing_rows() {
        let repo = InMemoryRepository::new();
        let user = UserId::random();
        let ghost = ClimbSession::new(SessionId::new(99), user, details(0));
        assert!(matches!(
            repo.update_session(&ghost).await,
            Err(StorageError::NotFound)
        ));
        assert!(matches!(
            repo.delete_session(SessionId::new(99)).await,
            Err(StorageError::NotFound)
        ));

        let id = repo
            .insert_session(NewSessionRecord::new(user, details(0)))
            .await
            .unwrap();
        repo.delete_session(id).await.unwrap();
        assert!(repo.get_session(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn batch_insert_assigns_ids_in_order() {
        let repo = InMemoryRepository::new();
        let user = UserId::random();
        let ids = repo
            .insert_sessions(vec![
                NewSessionRecord::new(user, details(3)),
                NewSessionRecord::new(user, details(2)),
            ])
            .await
            .unwrap();
        assert_eq!(ids, vec![SessionId::new(1), SessionId::new(2)]);
        assert_eq!(
            repo.get_session(ids[0]).await.unwrap().unwrap().date(),
            days_ago(3)
        );
        assert!(repo.insert_sessions(Vec::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let storage = Storage::in_memory();
        let sessions = storage
            .sessions
            .list_sessions(UserId::random(), None)
            .await
            .unwrap();
        assert!(sessions.is_empty());
    }
}

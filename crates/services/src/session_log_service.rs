use std::sync::Arc;

use climb_core::model::{ClimbSession, SessionDraft, SessionId, SessionPatch, UserId};
use climb_core::stats::distinct_locations;
use storage::repository::{NewSessionRecord, SessionRepository, StorageError};

use crate::error::SessionLogError;

/// Create, edit and list the sessions in a user's log.
#[derive(Clone)]
pub struct SessionLogService {
    sessions: Arc<dyn SessionRepository>,
}

impl SessionLogService {
    #[must_use]
    pub fn new(sessions: Arc<dyn SessionRepository>) -> Self {
        Self { sessions }
    }

    /// Validate a form draft and store it for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `SessionLogError::Session` if the draft is invalid.
    /// Returns `SessionLogError::Storage` if persistence fails.
    pub async fn create_session(
        &self,
        user_id: UserId,
        draft: SessionDraft,
    ) -> Result<SessionId, SessionLogError> {
        let details = draft.validate()?;
        let id = self
            .sessions
            .insert_session(NewSessionRecord::new(user_id, details))
            .await?;
        tracing::debug!(%user_id, session_id = %id, "session created");
        Ok(id)
    }

    /// Apply `patch` to one of the user's sessions and return the result.
    ///
    /// # Errors
    ///
    /// Returns `SessionLogError::NotFound` or `SessionLogError::NotOwner`
    /// when the session is missing or owned by someone else.
    /// Returns `SessionLogError::Session` if the patch is invalid.
    /// Returns `SessionLogError::Storage` if repository access fails.
    pub async fn update_session(
        &self,
        user_id: UserId,
        id: SessionId,
        patch: SessionPatch,
    ) -> Result<ClimbSession, SessionLogError> {
        let mut session = self.owned_session(user_id, id).await?;
        if patch.is_empty() {
            return Ok(session);
        }
        patch.apply(session.details_mut())?;
        self.sessions
            .update_session(&session)
            .await
            .map_err(|err| not_found_as(err, id))?;
        Ok(session)
    }

    /// Delete one of the user's sessions.
    ///
    /// # Errors
    ///
    /// Returns `SessionLogError::NotFound` or `SessionLogError::NotOwner`
    /// when the session is missing or owned by someone else.
    /// Returns `SessionLogError::Storage` if repository access fails.
    pub async fn delete_session(&self, user_id: UserId, id: SessionId) -> Result<(), SessionLogError> {
        self.owned_session(user_id, id).await?;
        self.sessions
            .delete_session(id)
            .await
            .map_err(|err| not_found_as(err, id))?;
        tracing::debug!(%user_id, session_id = %id, "session deleted");
        Ok(())
    }

    /// All of the user's sessions, newest first.
    ///
    /// # Errors
    ///
    /// Returns `SessionLogError::Storage` if repository access fails.
    pub async fn list_sessions(&self, user_id: UserId) -> Result<Vec<ClimbSession>, SessionLogError> {
        Ok(self.sessions.list_sessions(user_id, None).await?)
    }

    /// Locations the user has climbed at, for the location picker.
    ///
    /// # Errors
    ///
    /// Returns `SessionLogError::Storage` if repository access fails.
    pub async fn list_locations(&self, user_id: UserId) -> Result<Vec<String>, SessionLogError> {
        let sessions = self.sessions.list_sessions(user_id, None).await?;
        Ok(distinct_locations(&sessions))
    }

    async fn owned_session(
        &self,
        user_id: UserId,
        id: SessionId,
    ) -> Result<ClimbSession, SessionLogError> {
        let session = self
            .sessions
            .get_session(id)
            .await?
            .ok_or(SessionLogError::NotFound(id))?;
        if session.user_id() != user_id {
            tracing::warn!(%user_id, session_id = %id, "session owned by another user");
            return Err(SessionLogError::NotOwner(id));
        }
        Ok(session)
    }
}

fn not_found_as(err: StorageError, id: SessionId) -> SessionLogError {
    match err {
        StorageError::NotFound => SessionLogError::NotFound(id),
        other => SessionLogError::Storage(other),
    }
}

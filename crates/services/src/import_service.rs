use std::sync::Arc;

use climb_core::model::UserId;
use storage::legacy::parse_export;
use storage::repository::{NewSessionRecord, SessionRepository};

use crate::error::ImportError;

/// Imports session exports from the hosted store.
#[derive(Clone)]
pub struct ImportService {
    sessions: Arc<dyn SessionRepository>,
}

impl ImportService {
    #[must_use]
    pub fn new(sessions: Arc<dyn SessionRepository>) -> Self {
        Self { sessions }
    }

    /// Import every row of a JSON export for `user_id`.
    ///
    /// All rows are normalized and validated before anything is written, then
    /// stored in one batch. A bad row or a failed write leaves the store
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::Legacy` if the document is not a row array,
    /// `ImportError::Row`/`ImportError::Invalid` for the first bad row, and
    /// `ImportError::Storage` if the batch cannot be stored.
    pub async fn import_json(&self, user_id: UserId, json: &str) -> Result<usize, ImportError> {
        let rows = parse_export(json)?;

        let mut records = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            let draft = row
                .into_draft()
                .map_err(|source| ImportError::Row { index, source })?;
            let details = draft
                .validate()
                .map_err(|source| ImportError::Invalid { index, source })?;
            records.push(NewSessionRecord::new(user_id, details));
        }

        let count = self.sessions.insert_sessions(records).await?.len();
        tracing::info!(%user_id, count, "imported sessions");
        Ok(count)
    }
}

use std::sync::Arc;

use climb_core::model::UserId;
use climb_core::stats::{ExerciseTarget, Period, SessionStats};
use storage::repository::SessionRepository;

use crate::Clock;
use crate::error::StatsError;

/// Loads a user's sessions and aggregates them over a time window.
#[derive(Clone)]
pub struct StatsService {
    clock: Clock,
    sessions: Arc<dyn SessionRepository>,
}

impl StatsService {
    #[must_use]
    pub fn new(clock: Clock, sessions: Arc<dyn SessionRepository>) -> Self {
        Self { clock, sessions }
    }

    /// Statistics for `period` with the default exercise targets.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::Storage` if sessions cannot be loaded.
    pub async fn overview(&self, user_id: UserId, period: Period) -> Result<SessionStats, StatsError> {
        self.overview_with(user_id, period, &ExerciseTarget::defaults())
            .await
    }

    /// Statistics for `period` with caller-supplied exercise targets.
    ///
    /// The store is asked only for sessions on or after the window's cutoff;
    /// the aggregator applies the window again so adapters may over-fetch.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::Storage` if sessions cannot be loaded. A user
    /// with no sessions gets zeroed statistics, not an error.
    pub async fn overview_with(
        &self,
        user_id: UserId,
        period: Period,
        targets: &[ExerciseTarget],
    ) -> Result<SessionStats, StatsError> {
        let now = self.clock.now();
        let cutoff = period.cutoff(now);
        let sessions = self
            .sessions
            .list_sessions(user_id, Some(cutoff))
            .await
            .inspect_err(|err| tracing::warn!(%user_id, error = %err, "stats load failed"))?;

        let stats = SessionStats::compute(&sessions, period, now, targets);
        tracing::debug!(
            %user_id,
            %period,
            loaded = sessions.len(),
            in_window = stats.session_count(),
            "computed session stats"
        );
        Ok(stats)
    }
}

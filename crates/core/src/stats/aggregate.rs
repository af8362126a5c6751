use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::model::ClimbSession;
use crate::stats::{ColorTally, ExerciseTarget, ExerciseTotals, Period};

/// Derived numbers for one user over one period.
///
/// A completed route without a color still counts toward
/// `total_completed_routes`; it is only left out of the color tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    period: Period,
    cutoff: NaiveDate,
    session_count: usize,
    total_minutes: u32,
    hours: u32,
    minutes_remainder: u32,
    total_completed_routes: u32,
    color_tally: ColorTally,
    exercise_totals: ExerciseTotals,
}

impl SessionStats {
    /// Aggregate `sessions` over the window of `period` ending at `now`.
    #[must_use]
    pub fn compute(
        sessions: &[ClimbSession],
        period: Period,
        now: DateTime<Utc>,
        targets: &[ExerciseTarget],
    ) -> Self {
        let window = period.window(now);
        let in_window: Vec<&ClimbSession> = window.filter(sessions).collect();

        let total_minutes = in_window
            .iter()
            .fold(0_u32, |acc, s| acc.saturating_add(s.minutes()));

        let completed_routes = in_window
            .iter()
            .flat_map(|s| s.routes())
            .filter(|r| r.is_completed());
        let total_completed_routes =
            u32::try_from(completed_routes.clone().count()).unwrap_or(u32::MAX);
        let color_tally = ColorTally::from_routes(completed_routes);

        let exercise_totals =
            ExerciseTotals::tally(in_window.iter().flat_map(|s| s.exercises()), targets);

        Self {
            period,
            cutoff: window.cutoff(),
            session_count: in_window.len(),
            total_minutes,
            hours: total_minutes / 60,
            minutes_remainder: total_minutes % 60,
            total_completed_routes,
            color_tally,
            exercise_totals,
        }
    }

    #[must_use]
    pub fn period(&self) -> Period {
        self.period
    }

    #[must_use]
    pub fn cutoff(&self) -> NaiveDate {
        self.cutoff
    }

    /// Sessions that fell inside the window.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.session_count
    }

    #[must_use]
    pub fn total_minutes(&self) -> u32 {
        self.total_minutes
    }

    #[must_use]
    pub fn hours(&self) -> u32 {
        self.hours
    }

    #[must_use]
    pub fn minutes_remainder(&self) -> u32 {
        self.minutes_remainder
    }

    #[must_use]
    pub fn total_completed_routes(&self) -> u32 {
        self.total_completed_routes
    }

    #[must_use]
    pub fn color_tally(&self) -> &ColorTally {
        &self.color_tally
    }

    #[must_use]
    pub fn exercise_totals(&self) -> &ExerciseTotals {
        &self.exercise_totals
    }
}

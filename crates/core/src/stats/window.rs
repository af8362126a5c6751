use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ClimbSession;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PeriodError {
    #[error("unknown period {0:?}; expected week, month or year")]
    Unknown(String),
}

/// Rolling window the statistics are computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    Month,
    Year,
}

impl Period {
    /// Window length in days (fixed; no calendar-month arithmetic).
    #[must_use]
    pub fn days(self) -> i64 {
        match self {
            Period::Week => 7,
            Period::Month => 30,
            Period::Year => 365,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        }
    }

    /// Earliest session date inside the window ending at `now`.
    #[must_use]
    pub fn cutoff(self, now: DateTime<Utc>) -> NaiveDate {
        now.date_naive() - Duration::days(self.days())
    }

    #[must_use]
    pub fn window(self, now: DateTime<Utc>) -> TimeWindow {
        TimeWindow {
            period: self,
            cutoff: self.cutoff(now),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            _ => Err(PeriodError::Unknown(s.to_string())),
        }
    }
}

/// A period anchored at a concrete cutoff date. Inclusive of the cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    period: Period,
    cutoff: NaiveDate,
}

impl TimeWindow {
    #[must_use]
    pub fn period(&self) -> Period {
        self.period
    }

    #[must_use]
    pub fn cutoff(&self) -> NaiveDate {
        self.cutoff
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.cutoff
    }

    /// Sessions dated on or after the cutoff, in input order.
    pub fn filter<'a>(
        &self,
        sessions: &'a [ClimbSession],
    ) -> impl Iterator<Item = &'a ClimbSession> + use<'a> {
        let window = *self;
        sessions.iter().filter(move |s| window.contains(s.date()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SessionDraft, SessionId, UserId};
    use crate::time::{days_ago, fixed_now};

    fn session(id: u64, days: i64) -> ClimbSession {
        let details = SessionDraft::new(days_ago(days)).validate().unwrap();
        ClimbSession::new(SessionId::new(id), UserId::random(), details)
    }

    fn kept(period: Period, sessions: &[ClimbSession]) -> Vec<u64> {
        period
            .window(fixed_now())
            .filter(sessions)
            .map(|s| s.id().value())
            .collect()
    }

    #[test]
    fn parses_known_selectors_only() {
        assert_eq!("week".parse::<Period>().unwrap(), Period::Week);
        assert_eq!(" Month ".parse::<Period>().unwrap(), Period::Month);
        assert_eq!("YEAR".parse::<Period>().unwrap(), Period::Year);
        assert_eq!(
            "day".parse::<Period>().unwrap_err(),
            PeriodError::Unknown("day".into())
        );
        assert!("".parse::<Period>().is_err());
    }

    #[test]
    fn windows_keep_sessions_on_or_after_cutoff() {
        let sessions = vec![session(1, 0), session(2, 10), session(3, 40)];
        assert_eq!(kept(Period::Week, &sessions), vec![1]);
        assert_eq!(kept(Period::Month, &sessions), vec![1, 2]);
        assert_eq!(kept(Period::Year, &sessions), vec![1, 2, 3]);
    }

    #[test]
    fn cutoff_day_itself_is_inside() {
        let sessions = vec![session(1, 7), session(2, 8)];
        assert_eq!(kept(Period::Week, &sessions), vec![1]);
        assert_eq!(Period::Week.cutoff(fixed_now()), days_ago(7));
    }
}

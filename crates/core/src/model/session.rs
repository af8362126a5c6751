use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::normalize_optional;
use crate::model::{ClimbDuration, ExerciseEntry, RouteAttempt, SessionId, UserId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session date is required")]
    MissingDate,

    #[error("route {index} has zero attempts")]
    ZeroAttempts { index: usize },
}

//
// ─── DETAILS ──────────────────────────────────────────────────────────────────
//

/// User-editable content of a session, already normalized.
///
/// Duration and exercise reps are structured here; the free text they were
/// typed as is parsed once by [`SessionDraft::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDetails {
    date: NaiveDate,
    location: Option<String>,
    duration: Option<ClimbDuration>,
    exercises: Vec<ExerciseEntry>,
    routes: Vec<RouteAttempt>,
}

impl SessionDetails {
    /// Rehydrate details from persisted storage.
    #[must_use]
    pub fn from_persisted(
        date: NaiveDate,
        location: Option<String>,
        duration: Option<ClimbDuration>,
        exercises: Vec<ExerciseEntry>,
        routes: Vec<RouteAttempt>,
    ) -> Self {
        Self {
            date,
            location: normalize_optional(location),
            duration,
            exercises,
            routes,
        }
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    #[must_use]
    pub fn duration(&self) -> Option<ClimbDuration> {
        self.duration
    }

    #[must_use]
    pub fn exercises(&self) -> &[ExerciseEntry] {
        &self.exercises
    }

    #[must_use]
    pub fn routes(&self) -> &[RouteAttempt] {
        &self.routes
    }

    /// A draft lacks a location or a duration.
    #[must_use]
    pub fn is_draft(&self) -> bool {
        self.location.is_none() || self.duration.is_none()
    }
}

//
// ─── SESSION ──────────────────────────────────────────────────────────────────
//

/// A stored climbing session owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClimbSession {
    id: SessionId,
    user_id: UserId,
    #[serde(flatten)]
    details: SessionDetails,
}

impl ClimbSession {
    #[must_use]
    pub fn new(id: SessionId, user_id: UserId, details: SessionDetails) -> Self {
        Self {
            id,
            user_id,
            details,
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn details(&self) -> &SessionDetails {
        &self.details
    }

    pub fn details_mut(&mut self) -> &mut SessionDetails {
        &mut self.details
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.details.date
    }

    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.details.location()
    }

    #[must_use]
    pub fn duration(&self) -> Option<ClimbDuration> {
        self.details.duration
    }

    /// Minutes climbed; sessions without a duration count as zero.
    #[must_use]
    pub fn minutes(&self) -> u32 {
        self.details.duration.map_or(0, ClimbDuration::minutes)
    }

    #[must_use]
    pub fn exercises(&self) -> &[ExerciseEntry] {
        &self.details.exercises
    }

    #[must_use]
    pub fn routes(&self) -> &[RouteAttempt] {
        &self.details.routes
    }

    #[must_use]
    pub fn is_draft(&self) -> bool {
        self.details.is_draft()
    }
}

//
// ─── DRAFT ────────────────────────────────────────────────────────────────────
//

/// Raw session form input.
#[derive(Debug, Clone, Default)]
pub struct SessionDraft {
    pub date: Option<NaiveDate>,
    pub location: String,
    pub duration: String,
    pub exercises: Vec<String>,
    pub routes: Vec<RouteAttempt>,
}

impl SessionDraft {
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }

    /// Validate and normalize the draft.
    ///
    /// A blank location or duration is allowed and yields a draft session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::MissingDate` without a date, or
    /// `SessionError::ZeroAttempts` when a route records zero tries.
    pub fn validate(self) -> Result<SessionDetails, SessionError> {
        let date = self.date.ok_or(SessionError::MissingDate)?;
        if let Some(index) = self.routes.iter().position(|r| r.attempts == Some(0)) {
            return Err(SessionError::ZeroAttempts { index });
        }

        Ok(SessionDetails {
            date,
            location: normalize_optional(Some(self.location)),
            duration: parse_duration_field(&self.duration),
            exercises: self
                .exercises
                .iter()
                .filter_map(|line| ExerciseEntry::parse(line))
                .collect(),
            routes: self.routes,
        })
    }
}

fn parse_duration_field(text: &str) -> Option<ClimbDuration> {
    if text.trim().is_empty() {
        None
    } else {
        Some(ClimbDuration::parse(text))
    }
}

//
// ─── PATCH ────────────────────────────────────────────────────────────────────
//

/// Partial edit of an existing session. `None` leaves a field untouched;
/// an empty string clears location or duration.
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub date: Option<NaiveDate>,
    pub location: Option<String>,
    pub duration: Option<String>,
    pub exercises: Option<Vec<String>>,
    pub routes: Option<Vec<RouteAttempt>>,
}

impl SessionPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.location.is_none()
            && self.duration.is_none()
            && self.exercises.is_none()
            && self.routes.is_none()
    }

    /// Apply the patch in place.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ZeroAttempts` if replacement routes are invalid;
    /// `details` is left unchanged in that case.
    pub fn apply(self, details: &mut SessionDetails) -> Result<(), SessionError> {
        if let Some(routes) = self.routes.as_ref() {
            if let Some(index) = routes.iter().position(|r| r.attempts == Some(0)) {
                return Err(SessionError::ZeroAttempts { index });
            }
        }
        if let Some(date) = self.date {
            details.date = date;
        }
        if let Some(location) = self.location {
            details.location = normalize_optional(Some(location));
        }
        if let Some(duration) = self.duration {
            details.duration = parse_duration_field(&duration);
        }
        if let Some(lines) = self.exercises {
            details.exercises = lines
                .iter()
                .filter_map(|line| ExerciseEntry::parse(line))
                .collect();
        }
        if let Some(routes) = self.routes {
            details.routes = routes;
        }
        Ok(())
    }
}

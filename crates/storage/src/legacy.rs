//! Rows exported from the hosted session table the web client used.
//!
//! That table was loosely typed: `routes` and `exercises` arrive either as
//! JSON arrays or as JSON encoded into a string, numbers sometimes arrive as
//! strings, and the oldest rows only carry `minutes`/`boulders` counters.
//! Everything is normalized here, once, into a `SessionDraft`.

use chrono::NaiveDate;
use climb_core::model::{RouteAttempt, RouteColor, SessionDraft};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt;
use thiserror::Error;

/// Most uncolored routes an oldest-schema `boulders` counter may expand to.
pub const MAX_LEGACY_BOULDERS: u32 = 500;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LegacyError {
    #[error("row has no date")]
    MissingDate,

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid embedded {field} JSON: {source}")]
    Embedded {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{field} counter {value} exceeds {max}")]
    Counter {
        field: &'static str,
        value: u32,
        max: u32,
    },

    #[error("invalid export: {0}")]
    Export(#[from] serde_json::Error),
}

/// A number that may have been stored as a JSON number or as text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Int(u64),
    Float(f64),
    Text(String),
}

impl LooseNumber {
    /// Whole, non-negative value if there is one.
    #[must_use]
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            LooseNumber::Int(v) => u32::try_from(*v).ok(),
            LooseNumber::Float(_) => None,
            LooseNumber::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for LooseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LooseNumber::Int(v) => write!(f, "{v}"),
            LooseNumber::Float(v) => write!(f, "{v}"),
            LooseNumber::Text(s) => f.write_str(s.trim()),
        }
    }
}

/// A list column that is either a real array or a JSON string holding one.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Embedded<T> {
    List(Vec<T>),
    Encoded(String),
}

impl<T: DeserializeOwned> Embedded<T> {
    fn decode(self, field: &'static str) -> Result<Vec<T>, LegacyError> {
        match self {
            Embedded::List(items) => Ok(items),
            Embedded::Encoded(raw) if raw.trim().is_empty() => Ok(Vec::new()),
            Embedded::Encoded(raw) => serde_json::from_str::<Option<Vec<T>>>(&raw)
                .map(Option::unwrap_or_default)
                .map_err(|source| LegacyError::Embedded { field, source }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LegacyExercise {
    Text(String),
    Structured {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        sets: Option<LooseNumber>,
        #[serde(default)]
        reps: Option<LooseNumber>,
    },
}

impl LegacyExercise {
    /// Text line the exercise is stored as. Structured entries spell out
    /// their total so the rep parser picks it up.
    fn into_line(self) -> String {
        match self {
            LegacyExercise::Text(text) => text,
            LegacyExercise::Structured { name, sets, reps } => {
                let name = name
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| "Ukendt øvelse".to_string());
                let sets = sets.as_ref().and_then(LooseNumber::as_u32);
                let reps = reps.as_ref().and_then(LooseNumber::as_u32);
                match (sets, reps) {
                    (Some(sets), Some(reps)) => {
                        format!("{name} - {sets}x{reps}: {} reps", sets.saturating_mul(reps))
                    }
                    (None, Some(reps)) => format!("{name}: {reps} reps"),
                    _ => name,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyRoute {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub number: Option<LooseNumber>,
    #[serde(default)]
    pub attempts: Option<LooseNumber>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default, alias = "wallHeight")]
    pub wall_height: Option<LooseNumber>,
}

impl LegacyRoute {
    fn into_attempt(self) -> RouteAttempt {
        let mut route = RouteAttempt::new(self.color.as_deref().and_then(RouteColor::parse));
        if let Some(number) = self.number {
            route = route.with_number(number.to_string());
        }
        if let Some(attempts) = self
            .attempts
            .as_ref()
            .and_then(LooseNumber::as_u32)
            .filter(|&n| n > 0)
        {
            route = route.with_attempts(attempts);
        }
        if let Some(note) = self.note {
            route = route.with_note(note);
        }
        if let Some(height) = self.wall_height {
            route = route.with_wall_height(height.to_string());
        }
        route
    }
}

/// One exported session row.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacySessionRow {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub exercises: Option<Embedded<LegacyExercise>>,
    #[serde(default)]
    pub routes: Option<Embedded<LegacyRoute>>,
    /// Oldest schema: minutes climbed as a plain number.
    #[serde(default)]
    pub minutes: Option<LooseNumber>,
    /// Oldest schema: completed boulders without any route detail.
    #[serde(default)]
    pub boulders: Option<LooseNumber>,
}

fn parse_date(raw: &str) -> Result<NaiveDate, LegacyError> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|_| LegacyError::InvalidDate(raw.to_string()))
}

impl LegacySessionRow {
    /// Normalize the row into a form draft.
    ///
    /// # Errors
    ///
    /// Returns `LegacyError` if the date is missing or malformed, or if an
    /// embedded JSON column cannot be decoded.
    pub fn into_draft(self) -> Result<SessionDraft, LegacyError> {
        let raw_date = self.date.ok_or(LegacyError::MissingDate)?;
        let date = parse_date(&raw_date)?;

        let duration = match (self.duration, self.minutes.as_ref().and_then(LooseNumber::as_u32)) {
            (Some(text), _) if !text.trim().is_empty() => text,
            (_, Some(minutes)) => format!("{minutes} min"),
            _ => String::new(),
        };

        let exercises = self
            .exercises
            .map(|e| e.decode("exercises"))
            .transpose()?
            .unwrap_or_default()
            .into_iter()
            .map(LegacyExercise::into_line)
            .collect();

        let mut routes: Vec<RouteAttempt> = self
            .routes
            .map(|r| r.decode("routes"))
            .transpose()?
            .unwrap_or_default()
            .into_iter()
            .map(LegacyRoute::into_attempt)
            .collect();

        if routes.is_empty() {
            let boulders = self.boulders.as_ref().and_then(LooseNumber::as_u32).unwrap_or(0);
            if boulders > MAX_LEGACY_BOULDERS {
                return Err(LegacyError::Counter {
                    field: "boulders",
                    value: boulders,
                    max: MAX_LEGACY_BOULDERS,
                });
            }
            routes = (0..boulders).map(|_| RouteAttempt::new(None)).collect();
        }

        Ok(SessionDraft {
            date: Some(date),
            location: self.location.unwrap_or_default(),
            duration,
            exercises,
            routes,
        })
    }
}

/// Parse a JSON export: an array of rows.
///
/// # Errors
///
/// Returns `LegacyError::Export` if the document is not an array of rows.
pub fn parse_export(json: &str) -> Result<Vec<LegacySessionRow>, LegacyError> {
    Ok(serde_json::from_str(json)?)
}

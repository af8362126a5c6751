use serde::{Deserialize, Serialize};

use crate::model::RouteColor;
use crate::model::normalize_optional;
use crate::stats::is_completed;

/// Wall height (metres) assumed when none was recorded.
pub const DEFAULT_WALL_HEIGHT: &str = "5";

fn default_wall_height() -> String {
    DEFAULT_WALL_HEIGHT.to_string()
}

/// A single boulder problem tried during a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteAttempt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<RouteColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default = "default_wall_height")]
    pub wall_height: String,
}

impl RouteAttempt {
    #[must_use]
    pub fn new(color: Option<RouteColor>) -> Self {
        Self {
            color,
            number: None,
            attempts: None,
            note: None,
            wall_height: default_wall_height(),
        }
    }

    /// Route with a color parsed from user input.
    #[must_use]
    pub fn colored(label: &str) -> Self {
        Self::new(RouteColor::parse(label))
    }

    #[must_use]
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = normalize_optional(Some(number.into()));
        self
    }

    #[must_use]
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = Some(attempts);
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = normalize_optional(Some(note.into()));
        self
    }

    /// Blank heights fall back to [`DEFAULT_WALL_HEIGHT`].
    #[must_use]
    pub fn with_wall_height(mut self, height: impl Into<String>) -> Self {
        self.wall_height =
            normalize_optional(Some(height.into())).unwrap_or_else(default_wall_height);
        self
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        is_completed(self.note.as_deref())
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::parse::parse_duration_minutes;

/// Time spent climbing in one session, stored as whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClimbDuration(u32);

impl ClimbDuration {
    #[must_use]
    pub fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    /// Read a hand-typed duration such as `"1t 30m"`. Unreadable text is zero.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self(parse_duration_minutes(text))
    }

    #[must_use]
    pub fn minutes(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn hours(self) -> u32 {
        self.0 / 60
    }

    #[must_use]
    pub fn minutes_remainder(self) -> u32 {
        self.0 % 60
    }
}

impl fmt::Display for ClimbDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hours() > 0 {
            write!(f, "{}t {}m", self.hours(), self.minutes_remainder())
        } else {
            write!(f, "{}m", self.minutes_remainder())
        }
    }
}

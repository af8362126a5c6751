use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

//
// ─── DIFFICULTY COLOR ─────────────────────────────────────────────────────────
//

/// Hold colors used by the gym, listed hardest first.
///
/// The declaration order is the difficulty order; it is unrelated to the
/// alphabetical order of the labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DifficultyColor {
    Sort,
    Rod,
    Lilla,
    Bla,
    Gron,
    Orange,
    Gul,
    Hvid,
    Pink,
}

impl DifficultyColor {
    /// Every known color, hardest first.
    pub const ALL: [DifficultyColor; 9] = [
        DifficultyColor::Sort,
        DifficultyColor::Rod,
        DifficultyColor::Lilla,
        DifficultyColor::Bla,
        DifficultyColor::Gron,
        DifficultyColor::Orange,
        DifficultyColor::Gul,
        DifficultyColor::Hvid,
        DifficultyColor::Pink,
    ];

    /// Position in the difficulty order (0 = hardest).
    #[must_use]
    pub fn rank(self) -> usize {
        self as usize
    }

    /// Canonical label as shown to climbers.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DifficultyColor::Sort => "Sort",
            DifficultyColor::Rod => "Rød",
            DifficultyColor::Lilla => "Lilla",
            DifficultyColor::Bla => "Blå",
            DifficultyColor::Gron => "Grøn",
            DifficultyColor::Orange => "Orange",
            DifficultyColor::Gul => "Gul",
            DifficultyColor::Hvid => "Hvid",
            DifficultyColor::Pink => "Pink",
        }
    }

    /// Case-insensitive lookup by Danish label or English color name.
    #[must_use]
    pub fn from_label(raw: &str) -> Option<Self> {
        let key = raw.trim().to_lowercase();
        if let Some(color) = Self::ALL
            .into_iter()
            .find(|color| color.label().to_lowercase() == key)
        {
            return Some(color);
        }
        let color = match key.as_str() {
            "black" => DifficultyColor::Sort,
            "red" => DifficultyColor::Rod,
            "purple" => DifficultyColor::Lilla,
            "blue" => DifficultyColor::Bla,
            "green" => DifficultyColor::Gron,
            "yellow" => DifficultyColor::Gul,
            "white" => DifficultyColor::Hvid,
            _ => return None,
        };
        Some(color)
    }
}

impl fmt::Display for DifficultyColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//
// ─── ROUTE COLOR ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ColorError {
    #[error("route color cannot be empty")]
    Empty,
}

/// Color recorded on a route: one of the graded colors, or a label the
/// difficulty table does not know about (kept verbatim).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RouteColor {
    Known(DifficultyColor),
    Other(String),
}

impl RouteColor {
    /// Parse a user-entered label. Blank input has no color.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(
            DifficultyColor::from_label(trimmed)
                .map_or_else(|| RouteColor::Other(trimmed.to_string()), RouteColor::Known),
        )
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            RouteColor::Known(color) => color.label(),
            RouteColor::Other(label) => label,
        }
    }

    /// Difficulty rank, or `None` for colors outside the table.
    #[must_use]
    pub fn rank(&self) -> Option<usize> {
        match self {
            RouteColor::Known(color) => Some(color.rank()),
            RouteColor::Other(_) => None,
        }
    }
}

impl From<DifficultyColor> for RouteColor {
    fn from(color: DifficultyColor) -> Self {
        RouteColor::Known(color)
    }
}

impl TryFrom<String> for RouteColor {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RouteColor::parse(&value).ok_or(ColorError::Empty)
    }
}

impl From<RouteColor> for String {
    fn from(color: RouteColor) -> Self {
        color.label().to_string()
    }
}

impl fmt::Display for RouteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

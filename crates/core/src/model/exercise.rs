use serde::{Deserialize, Serialize};

use crate::parse::parse_reps;

/// One auxiliary exercise line, e.g. `"Pull ups: 10 reps"`.
///
/// The rep count is read from the text once, when the entry is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    text: String,
    #[serde(default)]
    reps: u32,
}

impl ExerciseEntry {
    /// Build an entry from a typed line. Blank lines yield `None`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            reps: parse_reps(text),
        })
    }

    /// Quick-add form: `"{name}: {reps} reps"`.
    #[must_use]
    pub fn with_reps(name: &str, reps: u32) -> Self {
        Self {
            text: format!("{}: {reps} reps", name.trim()),
            reps,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn reps(&self) -> u32 {
        self.reps
    }

    /// Case-insensitive substring test against the entry text.
    #[must_use]
    pub fn mentions(&self, needle: &str) -> bool {
        self.text.to_lowercase().contains(&needle.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_extracts_reps() {
        let entry = ExerciseEntry::parse("  Pull ups: 10 reps ").unwrap();
        assert_eq!(entry.text(), "Pull ups: 10 reps");
        assert_eq!(entry.reps(), 10);
        assert!(ExerciseEntry::parse("   ").is_none());
    }

    #[test]
    fn quick_add_formats_text() {
        let entry = ExerciseEntry::with_reps("Dips", 12);
        assert_eq!(entry.text(), "Dips: 12 reps");
        assert_eq!(entry.reps(), 12);
        assert!(entry.mentions("DIP"));
    }

    #[test]
    fn lines_without_reps_token_count_zero() {
        let entry = ExerciseEntry::parse("10 pull ups").unwrap();
        assert_eq!(entry.reps(), 0);
        assert!(entry.mentions("pull"));
    }
}

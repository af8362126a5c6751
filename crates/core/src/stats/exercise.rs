use serde::Serialize;

use crate::model::ExerciseEntry;

/// A named exercise to total up, matched by substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseTarget {
    pub name: String,
    pub needle: String,
}

impl ExerciseTarget {
    #[must_use]
    pub fn new(name: impl Into<String>, needle: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            needle: needle.into().to_lowercase(),
        }
    }

    /// Pull-ups and dips, the two exercises shown on the overview.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![Self::new("Pull-ups", "pull"), Self::new("Dips", "dip")]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseTotal {
    pub name: String,
    pub reps: u32,
}

/// Rep totals per target, in target order. Targets nobody trained stay at zero.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ExerciseTotals {
    totals: Vec<ExerciseTotal>,
}

impl ExerciseTotals {
    /// Sum reps of every entry mentioning a target. One entry may count
    /// toward several targets.
    pub fn tally<'a>(
        entries: impl IntoIterator<Item = &'a ExerciseEntry>,
        targets: &[ExerciseTarget],
    ) -> Self {
        let mut totals: Vec<ExerciseTotal> = targets
            .iter()
            .map(|t| ExerciseTotal {
                name: t.name.clone(),
                reps: 0,
            })
            .collect();

        for entry in entries {
            for (target, total) in targets.iter().zip(totals.iter_mut()) {
                if entry.mentions(&target.needle) {
                    total.reps = total.reps.saturating_add(entry.reps());
                }
            }
        }

        Self { totals }
    }

    /// Same as [`ExerciseTotals::tally`] for raw typed lines.
    #[must_use]
    pub fn from_lines<S: AsRef<str>>(lines: &[S], targets: &[ExerciseTarget]) -> Self {
        let entries: Vec<ExerciseEntry> = lines
            .iter()
            .filter_map(|line| ExerciseEntry::parse(line.as_ref()))
            .collect();
        Self::tally(&entries, targets)
    }

    #[must_use]
    pub fn totals(&self) -> &[ExerciseTotal] {
        &self.totals
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<u32> {
        self.totals.iter().find(|t| t.name == name).map(|t| t.reps)
    }
}

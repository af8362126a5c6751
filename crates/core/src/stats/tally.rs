use serde::Serialize;

use crate::model::{RouteAttempt, RouteColor};

/// Completed routes of one color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorCount {
    pub color: RouteColor,
    pub count: u32,
}

/// Completed-route counts per color, hardest color first.
///
/// Colors outside the difficulty table follow every known color, in the
/// order they were first seen. Uncolored routes are not listed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ColorTally {
    entries: Vec<ColorCount>,
}

impl ColorTally {
    /// Tally the completed, colored routes in `routes`.
    pub fn from_routes<'a>(routes: impl IntoIterator<Item = &'a RouteAttempt>) -> Self {
        let mut tally = Self::default();
        for route in routes {
            if !route.is_completed() {
                continue;
            }
            if let Some(color) = route.color.as_ref() {
                tally.record(color);
            }
        }
        tally.sort();
        tally
    }

    fn record(&mut self, color: &RouteColor) {
        match self.entries.iter_mut().find(|e| &e.color == color) {
            Some(entry) => entry.count = entry.count.saturating_add(1),
            None => self.entries.push(ColorCount {
                color: color.clone(),
                count: 1,
            }),
        }
    }

    // `sort_by_key` is stable, so unknown colors keep first-seen order.
    fn sort(&mut self) {
        self.entries
            .sort_by_key(|e| e.color.rank().unwrap_or(usize::MAX));
    }

    #[must_use]
    pub fn entries(&self) -> &[ColorCount] {
        &self.entries
    }

    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.color.label()).collect()
    }

    /// Count for a label; known colors match case-insensitively.
    #[must_use]
    pub fn count(&self, label: &str) -> u32 {
        let Some(color) = RouteColor::parse(label) else {
            return 0;
        };
        self.entries
            .iter()
            .find(|e| e.color == color)
            .map_or(0, |e| e.count)
    }

    /// Sum over all listed colors.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.entries
            .iter()
            .fold(0_u32, |acc, e| acc.saturating_add(e.count))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

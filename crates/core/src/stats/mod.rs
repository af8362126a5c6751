//! Statistics derived from a user's recorded sessions.
//!
//! Everything here is a pure function of its inputs: callers load a
//! snapshot of sessions and recompute whenever they need fresh numbers.

mod aggregate;
mod completion;
mod exercise;
mod grouping;
mod tally;
mod window;

pub use aggregate::SessionStats;
pub use completion::{FAILED_MARKER, is_completed};
pub use exercise::{ExerciseTarget, ExerciseTotal, ExerciseTotals};
pub use grouping::{distinct_locations, routes_by_wall_height, sort_newest_first};
pub use tally::{ColorCount, ColorTally};
pub use window::{Period, PeriodError, TimeWindow};

mod color;
mod duration;
mod exercise;
mod ids;
mod route;
mod session;

pub use color::{ColorError, DifficultyColor, RouteColor};
pub use duration::ClimbDuration;
pub use exercise::ExerciseEntry;
pub use ids::{ParseIdError, SessionId, UserId};
pub use route::{DEFAULT_WALL_HEIGHT, RouteAttempt};
pub use session::{ClimbSession, SessionDetails, SessionDraft, SessionError, SessionPatch};

/// Trim a user-entered value; blank becomes `None`.
pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

use chrono::NaiveDate;
use climb_core::model::{
    ClimbDuration, ClimbSession, ExerciseEntry, RouteAttempt, SessionDetails, SessionId, UserId,
};
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn session_id_to_i64(id: SessionId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("session_id overflow".into()))
}

pub(crate) fn session_id_from_i64(v: i64) -> Result<SessionId, StorageError> {
    u64::try_from(v)
        .map(SessionId::new)
        .map_err(|_| StorageError::Serialization("session_id sign overflow".into()))
}

pub(crate) fn duration_to_i64(duration: Option<ClimbDuration>) -> Option<i64> {
    duration.map(|d| i64::from(d.minutes()))
}

fn duration_from_i64(v: Option<i64>) -> Result<Option<ClimbDuration>, StorageError> {
    v.map(|minutes| {
        u32::try_from(minutes)
            .map(ClimbDuration::from_minutes)
            .map_err(|_| StorageError::Serialization(format!("invalid duration_minutes: {minutes}")))
    })
    .transpose()
}

pub(crate) fn routes_to_json(routes: &[RouteAttempt]) -> Result<String, StorageError> {
    serde_json::to_string(routes).map_err(ser)
}

pub(crate) fn exercises_to_json(exercises: &[ExerciseEntry]) -> Result<String, StorageError> {
    serde_json::to_string(exercises).map_err(ser)
}

pub(crate) fn map_session_row(row: &sqlx::sqlite::SqliteRow) -> Result<ClimbSession, StorageError> {
    let id = session_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?;
    let user_id: UserId = row
        .try_get::<String, _>("user_id")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;
    let date: NaiveDate = row.try_get("date").map_err(ser)?;
    let location: Option<String> = row.try_get("location").map_err(ser)?;
    let duration = duration_from_i64(row.try_get("duration_minutes").map_err(ser)?)?;

    let exercises: Vec<ExerciseEntry> =
        serde_json::from_str(&row.try_get::<String, _>("exercises").map_err(ser)?).map_err(ser)?;
    let routes: Vec<RouteAttempt> =
        serde_json::from_str(&row.try_get::<String, _>("routes").map_err(ser)?).map_err(ser)?;

    let details = SessionDetails::from_persisted(date, location, duration, exercises, routes);
    Ok(ClimbSession::new(id, user_id, details))
}

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use climb_core::model::{ClimbSession, RouteAttempt, SessionDraft, SessionId, UserId};
use climb_core::stats::{ExerciseTarget, Period};
use climb_core::time::{days_ago, fixed_now};
use services::{AppServices, Clock, ImportError, ImportService, StatsError, StatsService};
use storage::repository::{NewSessionRecord, SessionRepository, StorageError};

fn session_two_days_ago() -> SessionDraft {
    let mut draft = SessionDraft::new(days_ago(2));
    draft.location = "Boulders Sydhavn".into();
    draft.duration = "1 time 50 min".into();
    draft.exercises = vec![
        "Pull ups: 10 reps".into(),
        "Dips: 12 reps".into(),
        "Pull-ups og dips: 5 reps".into(),
        "Hangboard".into(),
    ];
    draft.routes = vec![
        RouteAttempt::colored("Blå").with_attempts(2),
        RouteAttempt::colored("Sort"),
        RouteAttempt::colored("Gul").with_note("Fejl på toppen"),
        RouteAttempt::new(None),
    ];
    draft
}

fn draft_six_days_ago() -> SessionDraft {
    let mut draft = SessionDraft::new(days_ago(6));
    draft.routes = vec![RouteAttempt::colored("gul")];
    draft
}

fn session_ten_days_ago() -> SessionDraft {
    let mut draft = SessionDraft::new(days_ago(10));
    draft.location = "Beta Boulders".into();
    draft.duration = "30 min".into();
    draft.routes = vec![RouteAttempt::colored("Rød")];
    draft
}

async fn seeded() -> (AppServices, UserId) {
    let services = AppServices::in_memory(Clock::fixed(fixed_now()));
    let user = UserId::random();
    let log = services.session_log();
    for draft in [session_two_days_ago(), draft_six_days_ago(), session_ten_days_ago()] {
        log.create_session(user, draft).await.expect("create");
    }
    (services, user)
}

#[tokio::test]
async fn weekly_overview_aggregates_the_window() {
    let (services, user) = seeded().await;
    let stats = services.stats().overview(user, Period::Week).await.unwrap();

    assert_eq!(stats.period(), Period::Week);
    assert_eq!(stats.cutoff(), days_ago(7));
    assert_eq!(stats.session_count(), 2);
    assert_eq!(stats.total_minutes(), 110);
    assert_eq!(stats.hours(), 1);
    assert_eq!(stats.minutes_remainder(), 50);
    // Blå, Sort, the uncolored route, and the draft's Gul.
    assert_eq!(stats.total_completed_routes(), 4);
    assert_eq!(stats.color_tally().labels(), vec!["Sort", "Blå", "Gul"]);
    assert_eq!(stats.color_tally().count("Gul"), 1);
    assert_eq!(stats.exercise_totals().get("Pull-ups"), Some(15));
    assert_eq!(stats.exercise_totals().get("Dips"), Some(17));
}

#[tokio::test]
async fn monthly_overview_includes_older_sessions() {
    let (services, user) = seeded().await;
    let stats = services.stats().overview(user, Period::Month).await.unwrap();

    assert_eq!(stats.session_count(), 3);
    assert_eq!(stats.total_minutes(), 140);
    assert_eq!(stats.color_tally().labels(), vec!["Sort", "Rød", "Blå", "Gul"]);
}

#[tokio::test]
async fn custom_targets_replace_the_defaults() {
    let (services, user) = seeded().await;
    let targets = [ExerciseTarget::new("Hangboard", "HANG")];
    let stats = services
        .stats()
        .overview_with(user, Period::Year, &targets)
        .await
        .unwrap();

    let totals = stats.exercise_totals().totals();
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].name, "Hangboard");
    assert_eq!(totals[0].reps, 0);
}

#[tokio::test]
async fn other_users_sessions_are_not_counted() {
    let (services, _) = seeded().await;
    let stats = services
        .stats()
        .overview(UserId::random(), Period::Year)
        .await
        .unwrap();

    assert_eq!(stats.session_count(), 0);
    assert_eq!(stats.total_minutes(), 0);
    assert!(stats.color_tally().is_empty());
    assert_eq!(stats.exercise_totals().get("Pull-ups"), Some(0));
}

#[tokio::test]
async fn repeated_overviews_are_identical() {
    let (services, user) = seeded().await;
    let first = services.stats().overview(user, Period::Month).await.unwrap();
    let second = services.stats().overview(user, Period::Month).await.unwrap();
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

struct UnavailableRepository;

#[async_trait]
impl SessionRepository for UnavailableRepository {
    async fn list_sessions(
        &self,
        _user_id: UserId,
        _from: Option<NaiveDate>,
    ) -> Result<Vec<ClimbSession>, StorageError> {
        Err(StorageError::Connection("connection refused".into()))
    }

    async fn get_session(&self, _id: SessionId) -> Result<Option<ClimbSession>, StorageError> {
        Err(StorageError::Connection("connection refused".into()))
    }

    async fn insert_session(&self, _record: NewSessionRecord) -> Result<SessionId, StorageError> {
        Err(StorageError::Connection("connection refused".into()))
    }

    async fn insert_sessions(
        &self,
        _records: Vec<NewSessionRecord>,
    ) -> Result<Vec<SessionId>, StorageError> {
        Err(StorageError::Connection("connection refused".into()))
    }

    async fn update_session(&self, _session: &ClimbSession) -> Result<(), StorageError> {
        Err(StorageError::Connection("connection refused".into()))
    }

    async fn delete_session(&self, _id: SessionId) -> Result<(), StorageError> {
        Err(StorageError::Connection("connection refused".into()))
    }
}

#[tokio::test]
async fn store_failure_is_an_error_not_empty_stats() {
    let service = StatsService::new(Clock::fixed(fixed_now()), Arc::new(UnavailableRepository));
    let err = service
        .overview(UserId::random(), Period::Week)
        .await
        .expect_err("store is down");

    assert!(matches!(
        err,
        StatsError::Storage(StorageError::Connection(_))
    ));
    assert!(err.to_string().contains("store unavailable"));
}

#[tokio::test]
async fn import_reports_store_failure() {
    let service = ImportService::new(Arc::new(UnavailableRepository));
    let result = service
        .import_json(UserId::random(), r#"[{"date":"2024-05-30"}]"#)
        .await;
    assert!(matches!(
        result,
        Err(ImportError::Storage(StorageError::Connection(_)))
    ));
}

use climb_core::model::{
    ClimbDuration, ClimbSession, DifficultyColor, RouteAttempt, RouteColor, SessionDraft,
    SessionId, SessionPatch, UserId,
};
use climb_core::time::days_ago;
use storage::repository::{NewSessionRecord, SessionRepository, StorageError};
use storage::sqlite::{SCHEMA_VERSION, SqliteRepository, connect_options};

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let options = connect_options(&url).expect("options");
    let repo = SqliteRepository::connect_with(options).await.expect("connect");
    assert_eq!(repo.migrate().await.expect("migrate"), SCHEMA_VERSION);
    repo
}

fn full_draft(days: i64) -> SessionDraft {
    let mut draft = SessionDraft::new(days_ago(days));
    draft.location = "Boulders Sydhavn".into();
    draft.duration = "1t 30m".into();
    draft.exercises = vec!["Pull-ups: 10 reps".into(), "Hangboard".into()];
    draft.routes = vec![
        RouteAttempt::colored("Blå").with_number("4").with_attempts(2),
        RouteAttempt::colored("Sort").with_note("fejl").with_wall_height("4.5"),
        RouteAttempt::new(None),
    ];
    draft
}

#[tokio::test]
async fn sqlite_roundtrip_preserves_structured_columns() {
    let repo = connect("memdb_roundtrip").await;
    let user = UserId::random();

    let details = full_draft(1).validate().unwrap();
    let id = repo
        .insert_session(NewSessionRecord::new(user, details.clone()))
        .await
        .unwrap();

    let fetched = repo.get_session(id).await.unwrap().expect("stored");
    assert_eq!(fetched.id(), id);
    assert_eq!(fetched.user_id(), user);
    assert_eq!(fetched.details(), &details);
    assert_eq!(fetched.duration(), Some(ClimbDuration::from_minutes(90)));
    assert_eq!(fetched.exercises()[0].reps(), 10);
    assert_eq!(
        fetched.routes()[0].color,
        Some(RouteColor::Known(DifficultyColor::Bla))
    );
    assert_eq!(fetched.routes()[1].wall_height, "4.5");
    assert_eq!(fetched.routes()[2].color, None);
}

#[tokio::test]
async fn sqlite_draft_sessions_keep_a_null_duration() {
    let repo = connect("memdb_draft").await;
    let user = UserId::random();

    let details = SessionDraft::new(days_ago(0)).validate().unwrap();
    let id = repo
        .insert_session(NewSessionRecord::new(user, details))
        .await
        .unwrap();

    let fetched = repo.get_session(id).await.unwrap().unwrap();
    assert!(fetched.is_draft());
    assert_eq!(fetched.minutes(), 0);
    assert!(fetched.routes().is_empty());
}

#[tokio::test]
async fn sqlite_lists_by_owner_newest_first_with_date_hint() {
    let repo = connect("memdb_list").await;
    let user = UserId::random();
    let other = UserId::random();

    for days in [40, 3, 10] {
        repo.insert_session(NewSessionRecord::new(
            user,
            full_draft(days).validate().unwrap(),
        ))
        .await
        .unwrap();
    }
    repo.insert_session(NewSessionRecord::new(
        other,
        full_draft(1).validate().unwrap(),
    ))
    .await
    .unwrap();

    let all = repo.list_sessions(user, None).await.unwrap();
    let dates: Vec<_> = all.iter().map(ClimbSession::date).collect();
    assert_eq!(dates, vec![days_ago(3), days_ago(10), days_ago(40)]);

    let recent = repo.list_sessions(user, Some(days_ago(10))).await.unwrap();
    assert_eq!(recent.len(), 2);

    let nobody = repo.list_sessions(UserId::random(), None).await.unwrap();
    assert!(nobody.is_empty());
}

#[tokio::test]
async fn sqlite_update_and_delete_report_missing_rows() {
    let repo = connect("memdb_update").await;
    let user = UserId::random();

    let id = repo
        .insert_session(NewSessionRecord::new(
            user,
            full_draft(2).validate().unwrap(),
        ))
        .await
        .unwrap();

    let mut session = repo.get_session(id).await.unwrap().unwrap();
    SessionPatch {
        location: Some(String::new()),
        duration: Some("45 min".into()),
        ..SessionPatch::default()
    }
    .apply(session.details_mut())
    .unwrap();
    repo.update_session(&session).await.unwrap();

    let updated = repo.get_session(id).await.unwrap().unwrap();
    assert_eq!(updated.location(), None);
    assert_eq!(updated.minutes(), 45);

    let ghost = ClimbSession::new(SessionId::new(9_999), user, session.details().clone());
    assert!(matches!(
        repo.update_session(&ghost).await,
        Err(StorageError::NotFound)
    ));

    repo.delete_session(id).await.unwrap();
    assert!(repo.get_session(id).await.unwrap().is_none());
    assert!(matches!(
        repo.delete_session(id).await,
        Err(StorageError::NotFound)
    ));
}

#[tokio::test]
async fn sqlite_migrations_are_idempotent() {
    let repo = connect("memdb_migrate").await;
    assert_eq!(repo.migrate().await.expect("second migrate"), SCHEMA_VERSION);
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_migrations")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn sqlite_batch_insert_is_all_or_nothing() {
    let repo = connect("memdb_batch").await;
    let user = UserId::random();

    let ids = repo
        .insert_sessions(vec![
            NewSessionRecord::new(user, full_draft(4).validate().unwrap()),
            NewSessionRecord::new(user, full_draft(2).validate().unwrap()),
        ])
        .await
        .unwrap();
    assert_eq!(ids.len(), 2);
    assert!(ids[0] < ids[1]);

    sqlx::query(
        r"
            CREATE TRIGGER reject_closed_gym BEFORE INSERT ON climb_sessions
            WHEN NEW.location = 'Closed Gym'
            BEGIN
                SELECT RAISE(ABORT, 'gym closed');
            END;
        ",
    )
    .execute(repo.pool())
    .await
    .unwrap();

    let mut rejected = full_draft(1);
    rejected.location = "Closed Gym".into();
    let result = repo
        .insert_sessions(vec![
            NewSessionRecord::new(user, full_draft(1).validate().unwrap()),
            NewSessionRecord::new(user, rejected.validate().unwrap()),
        ])
        .await;
    assert!(matches!(result, Err(StorageError::Connection(_))));
    assert_eq!(repo.list_sessions(user, None).await.unwrap().len(), 2);
}

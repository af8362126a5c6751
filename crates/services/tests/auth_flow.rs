use std::sync::{Arc, Mutex};

use climb_core::stats::Period;
use climb_core::time::fixed_now;
use services::{
    AppServices, AuthError, AuthEvent, AuthSession, Clock, IdentityProvider,
    InMemoryIdentityProvider,
};

#[tokio::test]
async fn subscribers_observe_sign_in_and_sign_out() {
    let provider: Arc<dyn IdentityProvider> = Arc::new(InMemoryIdentityProvider::new());
    let session = AuthSession::new(provider);

    let seen: Arc<Mutex<Vec<AuthEvent>>> = Arc::default();
    let sink = Arc::clone(&seen);
    let subscription = session.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

    let user = session.sign_up("climber@example.com", "hunter22").await.unwrap();
    session.sign_out().await.unwrap();
    session.sign_in("climber@example.com", "hunter22").await.unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            AuthEvent::SignedIn(user.clone()),
            AuthEvent::SignedOut,
            AuthEvent::SignedIn(user.clone()),
        ]
    );

    assert!(session.unsubscribe(subscription));
    assert!(!session.unsubscribe(subscription));
    session.sign_out().await.unwrap();
    assert_eq!(seen.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn failed_sign_in_does_not_notify() {
    let session = AuthSession::new(Arc::new(InMemoryIdentityProvider::new()));
    let calls = Arc::new(Mutex::new(0_u32));
    let counter = Arc::clone(&calls);
    session.subscribe(move |_| *counter.lock().unwrap() += 1);

    assert_eq!(
        session.sign_in("nobody@example.com", "whatever").await,
        Err(AuthError::InvalidCredentials)
    );
    assert_eq!(*calls.lock().unwrap(), 0);
}

#[tokio::test]
async fn signed_in_user_scopes_the_stats() {
    let services = AppServices::in_memory(Clock::fixed(fixed_now()));
    let session = AuthSession::new(Arc::new(InMemoryIdentityProvider::new()));

    assert_eq!(session.require_user(), Err(AuthError::SignedOut));

    let user = session.sign_up("a@b.dk", "secret1").await.unwrap();
    let current = session.require_user().unwrap();
    assert_eq!(current.id, user.id);

    let stats = services
        .stats()
        .overview(current.id, Period::Week)
        .await
        .unwrap();
    assert_eq!(stats.session_count(), 0);
}

//! Signed-in user context.
//!
//! `AuthSession` is passed explicitly to whatever needs the current user;
//! interested parties subscribe to sign-in and sign-out events instead of
//! polling shared state.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use climb_core::model::UserId;
use serde::Serialize;

use crate::error::AuthError;

/// Minimum password length accepted by `InMemoryIdentityProvider`.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(AuthUser),
    SignedOut,
}

/// Backend that owns accounts and the provider-side session.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the email is taken or the credentials are
    /// rejected.
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;

    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on a bad email or password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;

    /// # Errors
    ///
    /// Returns `AuthError` if the provider cannot end the session.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// User restored from the provider's own session, if any.
    async fn current_user(&self) -> Option<AuthUser>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug)]
struct Account {
    user: AuthUser,
    password: String,
}

#[derive(Debug, Default)]
struct ProviderState {
    accounts: HashMap<String, Account>,
    current: Option<AuthUser>,
}

/// Process-local provider for tests and offline use.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityProvider {
    state: Arc<Mutex<ProviderState>>,
}

impl InMemoryIdentityProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let key = normalize_email(email);
        if key.is_empty() {
            return Err(AuthError::EmptyEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword {
                min: MIN_PASSWORD_LEN,
            });
        }

        let mut state = lock(&self.state);
        if state.accounts.contains_key(&key) {
            return Err(AuthError::EmailTaken);
        }
        let user = AuthUser {
            id: UserId::random(),
            email: key.clone(),
        };
        state.accounts.insert(
            key,
            Account {
                user: user.clone(),
                password: password.to_string(),
            },
        );
        state.current = Some(user.clone());
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let mut state = lock(&self.state);
        let user = state
            .accounts
            .get(&normalize_email(email))
            .filter(|account| account.password == password)
            .map(|account| account.user.clone())
            .ok_or(AuthError::InvalidCredentials)?;
        state.current = Some(user.clone());
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        lock(&self.state).current = None;
        Ok(())
    }

    async fn current_user(&self) -> Option<AuthUser> {
        lock(&self.state).current.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

type Listener = Arc<dyn Fn(&AuthEvent) + Send + Sync>;

#[derive(Default)]
struct SessionState {
    user: Option<AuthUser>,
    next_subscription: u64,
    listeners: BTreeMap<SubscriptionId, Listener>,
}

/// The signed-in user plus change notifications.
#[derive(Clone)]
pub struct AuthSession {
    provider: Arc<dyn IdentityProvider>,
    state: Arc<Mutex<SessionState>>,
}

impl AuthSession {
    /// Start signed out.
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            state: Arc::new(Mutex::new(SessionState::default())),
        }
    }

    /// Start from whatever session the provider already holds.
    pub async fn restore(provider: Arc<dyn IdentityProvider>) -> Self {
        let user = provider.current_user().await;
        let session = Self::new(provider);
        lock(&session.state).user = user;
        session
    }

    #[must_use]
    pub fn current_user(&self) -> Option<AuthUser> {
        lock(&self.state).user.clone()
    }

    /// # Errors
    ///
    /// Returns `AuthError::SignedOut` when nobody is signed in.
    pub fn require_user(&self) -> Result<AuthUser, AuthError> {
        self.current_user().ok_or(AuthError::SignedOut)
    }

    /// # Errors
    ///
    /// Propagates the provider's `AuthError`.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let user = self.provider.sign_up(email, password).await?;
        self.set_user(Some(user.clone()));
        Ok(user)
    }

    /// # Errors
    ///
    /// Propagates the provider's `AuthError`; the current user is unchanged
    /// on failure.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let user = self.provider.sign_in(email, password).await?;
        self.set_user(Some(user.clone()));
        Ok(user)
    }

    /// # Errors
    ///
    /// Propagates the provider's `AuthError`.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.provider.sign_out().await?;
        self.set_user(None);
        Ok(())
    }

    /// Register `listener` for future sign-in and sign-out events.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&AuthEvent) + Send + Sync + 'static,
    {
        let mut state = lock(&self.state);
        state.next_subscription += 1;
        let id = SubscriptionId(state.next_subscription);
        state.listeners.insert(id, Arc::new(listener));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        lock(&self.state).listeners.remove(&id).is_some()
    }

    fn set_user(&self, user: Option<AuthUser>) {
        let event = match &user {
            Some(user) => AuthEvent::SignedIn(user.clone()),
            None => AuthEvent::SignedOut,
        };
        // Listeners run outside the lock.
        let listeners: Vec<Listener> = {
            let mut state = lock(&self.state);
            state.user = user;
            state.listeners.values().cloned().collect()
        };
        tracing::debug!(listeners = listeners.len(), ?event, "auth state changed");
        for listener in listeners {
            listener(&event);
        }
    }
}

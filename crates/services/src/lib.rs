#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth;
pub mod error;
pub mod import_service;
pub mod session_log_service;
pub mod stats_service;

pub use climb_core::Clock;

pub use app_services::AppServices;
pub use auth::{
    AuthEvent, AuthSession, AuthUser, IdentityProvider, InMemoryIdentityProvider, SubscriptionId,
};
pub use error::{AppServicesError, AuthError, ImportError, SessionLogError, StatsError};
pub use import_service::ImportService;
pub use session_log_service::SessionLogService;
pub use stats_service::StatsService;

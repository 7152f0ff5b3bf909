//! Meridian Core
//!
//! Coordination layer for the Meridian dashboard shell: configuration,
//! auth service wiring, and logging setup. The shell constructs one
//! `AuthService` at startup and every collaborator reaches session state
//! through it.

mod config;
mod error;
mod service;

pub use config::Config;
pub use error::CoreError;
pub use service::AuthService;

// Re-export the session surface
pub use meridian_auth::{
    Session, SessionRecord, SessionStore, StorageKeys, TokenPair, TokenUpdate, User,
};
pub use meridian_storage::{Database, StorageError, StorageTier, TierKind, Tiers};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}

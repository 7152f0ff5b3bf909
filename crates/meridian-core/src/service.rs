//! Auth service wiring
//!
//! The application constructs one `AuthService` at startup and hands it to
//! the shell; collaborators reach session state through it instead of a
//! bare global.

use std::sync::Arc;

use meridian_auth::{SessionStore, StorageKeys, TokenPair, TokenUpdate, User};
use meridian_storage::{Database, DurableTier, EphemeralTier, StorageTier, Tiers};

use crate::config::Config;
use crate::error::CoreError;
use crate::Result;

pub struct AuthService {
    config: Config,
    store: SessionStore,
}

impl AuthService {
    /// Open durable storage and wire the session store.
    pub fn new(config: Config) -> Result<Self> {
        // Ensure data directory exists
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;

        let ephemeral: Arc<dyn StorageTier> = Arc::new(EphemeralTier::new());
        let durable: Arc<dyn StorageTier> = Arc::new(DurableTier::new(db));
        let store = SessionStore::with_keys(Tiers::new(ephemeral, durable), Self::keys(&config));

        Ok(Self { config, store })
    }

    /// Wire the store with no storage at all: writes are accepted and
    /// dropped, reads are empty. For contexts without a usable data dir.
    pub fn detached(config: Config) -> Self {
        let store = SessionStore::with_keys(Tiers::detached(), Self::keys(&config));
        Self { config, store }
    }

    /// `new`, degrading to `detached` when durable storage cannot be
    /// opened. Auth comes up signed-out rather than not at all.
    pub fn with_fallback(config: Config) -> Self {
        match Self::new(config.clone()) {
            Ok(service) => service,
            Err(e) => {
                tracing::warn!(error = %e, "Durable storage unavailable, running detached");
                Self::detached(config)
            }
        }
    }

    fn keys(config: &Config) -> StorageKeys {
        StorageKeys {
            session: config.session_key.clone(),
            marker: config.marker_key.clone(),
        }
    }

    /// Rehydrate the session store. Call once at startup, before any
    /// collaborator reads session state.
    pub fn initialize(&self) {
        self.store.initialize();

        tracing::info!("Auth service initialized");
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // === Session operations ===

    pub fn login(
        &self,
        tokens: TokenPair,
        user: Option<User>,
        tenant_slug: String,
        remember_me: bool,
    ) {
        self.store.login(tokens, user, tenant_slug, remember_me);
    }

    pub fn logout(&self) {
        self.store.logout();
    }

    pub fn set_tokens(&self, update: TokenUpdate) {
        self.store.set_tokens(update);
    }

    pub fn set_user(&self, user: Option<User>) {
        self.store.set_user(user);
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }
}

impl Clone for AuthService {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            store: self.store.clone(),
        }
    }
}

// Implement std::io::Error conversion for fs operations
impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::Config(e.to_string())
    }
}

//! Session store
//!
//! Holds the authoritative in-memory session and keeps exactly one storage
//! tier in sync with it: the durable tier when the user asked to be
//! remembered, the ephemeral tier otherwise. A separate remember-me marker
//! always lives in the durable tier so rehydration knows where to look
//! before it has read the payload.
//!
//! Known gap, preserved deliberately: sessions are per-process. A logout
//! here does not invalidate another running instance's in-memory session
//! until that instance restarts.

use parking_lot::RwLock;
use std::sync::Arc;

use meridian_storage::{TierKind, Tiers};

use crate::persist;
use crate::session::{Session, TokenPair, TokenUpdate, User};

/// Marker value recorded in the durable tier while durable persistence is
/// active; the key is absent otherwise.
const MARKER_ACTIVE: &str = "true";

/// Storage keys for the session payload and the remember-me marker.
#[derive(Debug, Clone)]
pub struct StorageKeys {
    pub session: String,
    pub marker: String,
}

impl StorageKeys {
    pub fn for_product(product: &str) -> Self {
        Self {
            session: format!("{}-auth", product),
            marker: format!("{}-remember-me", product),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::for_product("meridian")
    }
}

type ChangeListener = Box<dyn Fn(&Session) + Send + Sync>;

pub struct SessionStore {
    /// The single live session
    session: Arc<RwLock<Session>>,
    /// Storage tier pair
    tiers: Tiers,
    /// Keys for the payload and the marker
    keys: StorageKeys,
    /// Callbacks fired after every completed mutation
    listeners: Arc<RwLock<Vec<ChangeListener>>>,
}

impl SessionStore {
    pub fn new(tiers: Tiers) -> Self {
        Self::with_keys(tiers, StorageKeys::default())
    }

    pub fn with_keys(tiers: Tiers, keys: StorageKeys) -> Self {
        Self {
            session: Arc::new(RwLock::new(Session::new())),
            tiers,
            keys,
            listeners: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Rehydrate from whichever tier the remember-me marker points at, then
    /// mark the store hydrated. Runs once per process; later calls are
    /// no-ops. Recovery failure still flips the hydration flag: a corrupt
    /// payload means "signed out", not "broken".
    pub fn initialize(&self) {
        if self.session.read().is_hydrated {
            return;
        }

        let kind = if self.read_marker() {
            TierKind::Durable
        } else {
            TierKind::Ephemeral
        };

        let recovered = persist::read(self.tiers.get(kind), &self.keys.session);
        let was_recovered = recovered.is_some();

        {
            let mut session = self.session.write();
            if let Some(record) = recovered {
                session.apply_record(record);
            }
            session.is_hydrated = true;
        }

        tracing::info!(
            tier = %kind,
            recovered = was_recovered,
            "Session store hydrated"
        );

        self.notify();
    }

    /// Establish a new session.
    ///
    /// The store does not validate token shape; callers hand it credentials
    /// already vetted by the sign-in flow.
    pub fn login(
        &self,
        tokens: TokenPair,
        user: Option<User>,
        tenant_slug: String,
        remember_me: bool,
    ) {
        let record = {
            let mut session = self.session.write();
            session.access_token = Some(tokens.access_token);
            session.refresh_token = Some(tokens.refresh_token);
            session.user = user;
            session.tenant_slug = Some(tenant_slug.clone());
            session.is_authenticated = true;
            session.remember_me = remember_me;
            session.record()
        };

        let kind = TierKind::for_preference(remember_me);

        // A previous login may have used the other tier; clear it first so
        // exactly one tier ever holds live data
        persist::remove(self.tiers.get(kind.other()), &self.keys.session);

        self.write_marker(remember_me);
        persist::write(self.tiers.get(kind), &self.keys.session, &record);

        tracing::info!(tenant = %tenant_slug, remember_me, tier = %kind, "Logged in");

        self.notify();
    }

    /// Clear the session and every persisted copy of it. Safe to call when
    /// already signed out.
    pub fn logout(&self) {
        self.session.write().reset();

        // The caller may not know which tier was active; clear both
        persist::remove(self.tiers.get(TierKind::Ephemeral), &self.keys.session);
        persist::remove(self.tiers.get(TierKind::Durable), &self.keys.session);
        self.write_marker(false);

        tracing::info!("Logged out");

        self.notify();
    }

    /// Merge rotated tokens into the session, leaving omitted token fields
    /// and all non-token fields untouched. The empty update is a strict
    /// no-op.
    pub fn set_tokens(&self, update: TokenUpdate) {
        if update.is_empty() {
            return;
        }

        let (record, remember_me) = {
            let mut session = self.session.write();
            if let Some(access_token) = update.access_token {
                session.access_token = Some(access_token);
            }
            if let Some(refresh_token) = update.refresh_token {
                session.refresh_token = Some(refresh_token);
            }
            (session.record(), session.remember_me)
        };

        let kind = TierKind::for_preference(remember_me);
        persist::write(self.tiers.get(kind), &self.keys.session, &record);

        self.notify();
    }

    /// Replace the profile wholesale, e.g. upgrading the partial profile
    /// stored at login once the full one has loaded.
    pub fn set_user(&self, user: Option<User>) {
        let (record, remember_me) = {
            let mut session = self.session.write();
            session.user = user;
            (session.record(), session.remember_me)
        };

        let kind = TierKind::for_preference(remember_me);
        persist::write(self.tiers.get(kind), &self.keys.session, &record);

        self.notify();
    }

    /// Set the hydration flag directly. For rehydration and test harnesses;
    /// application collaborators should not call this.
    pub fn set_hydrated(&self, flag: bool) {
        self.session.write().is_hydrated = flag;
        self.notify();
    }

    /// Snapshot of the live session for one-time, non-reactive reads.
    pub fn session(&self) -> Session {
        self.session.read().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.session.read().access_token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.session.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_authenticated
    }

    pub fn is_hydrated(&self) -> bool {
        self.session.read().is_hydrated
    }

    /// Register a callback fired after every completed mutation. The view
    /// layer uses this to re-render on session changes. Callbacks run
    /// synchronously; do not mutate the store from inside one.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&Session) + Send + Sync + 'static,
    {
        self.listeners.write().push(Box::new(listener));
    }

    fn read_marker(&self) -> bool {
        match self.tiers.durable().read(&self.keys.marker) {
            Ok(value) => value.as_deref() == Some(MARKER_ACTIVE),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read remember-me marker");
                false
            }
        }
    }

    fn write_marker(&self, remember_me: bool) {
        let result = if remember_me {
            self.tiers.durable().write(&self.keys.marker, MARKER_ACTIVE)
        } else {
            self.tiers.durable().remove(&self.keys.marker)
        };

        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to update remember-me marker");
        }
    }

    fn notify(&self) {
        // Snapshot first; listeners must not observe a held write lock
        let snapshot = self.session.read().clone();
        for listener in self.listeners.read().iter() {
            listener(&snapshot);
        }
    }
}

impl Clone for SessionStore {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            tiers: self.tiers.clone(),
            keys: self.keys.clone(),
            listeners: Arc::clone(&self.listeners),
        }
    }
}

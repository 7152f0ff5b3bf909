//! Storage tiers
//!
//! Two key-value backends distinguished by persistence duration, plus a
//! no-op fallback for contexts with no storage at all. The session layer
//! picks a tier per the user's remember-me preference and never talks to
//! SQLite directly.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::database::Database;
use crate::Result;

/// A key-value storage backend.
///
/// Removing an absent key is a no-op, not an error.
pub trait StorageTier: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Which tier backs the session, by persistence duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierKind {
    /// Cleared when the process exits
    Ephemeral,
    /// Survives restarts
    Durable,
}

impl TierKind {
    /// Durable storage iff the user asked to be remembered. Pure.
    pub fn for_preference(remember_me: bool) -> Self {
        if remember_me {
            TierKind::Durable
        } else {
            TierKind::Ephemeral
        }
    }

    /// The opposite tier.
    pub fn other(self) -> Self {
        match self {
            TierKind::Ephemeral => TierKind::Durable,
            TierKind::Durable => TierKind::Ephemeral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TierKind::Ephemeral => "ephemeral",
            TierKind::Durable => "durable",
        }
    }
}

impl std::fmt::Display for TierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Process-lifetime tier, the desktop analog of tab-scoped browser storage.
pub struct EphemeralTier {
    entries: Mutex<HashMap<String, String>>,
}

impl EphemeralTier {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for EphemeralTier {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageTier for EphemeralTier {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Restart-surviving tier backed by the SQLite kv table.
pub struct DurableTier {
    db: Database,
}

impl DurableTier {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl StorageTier for DurableTier {
    fn read(&self, key: &str) -> Result<Option<String>> {
        self.db.get_value(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.db.set_value(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.db.remove_value(key)
    }
}

/// Fallback for contexts with no storage API: accepts writes, reads empty,
/// never fails.
pub struct NoopTier;

impl StorageTier for NoopTier {
    fn read(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn write(&self, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Ok(())
    }
}

/// The tier pair handed to the session layer.
pub struct Tiers {
    ephemeral: Arc<dyn StorageTier>,
    durable: Arc<dyn StorageTier>,
}

impl Tiers {
    pub fn new(ephemeral: Arc<dyn StorageTier>, durable: Arc<dyn StorageTier>) -> Self {
        Self { ephemeral, durable }
    }

    /// Both tiers in memory, for tests.
    pub fn in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self::new(
            Arc::new(EphemeralTier::new()),
            Arc::new(DurableTier::new(db)),
        ))
    }

    /// Both tiers no-op, for storage-less execution.
    pub fn detached() -> Self {
        Self::new(Arc::new(NoopTier), Arc::new(NoopTier))
    }

    pub fn get(&self, kind: TierKind) -> &dyn StorageTier {
        match kind {
            TierKind::Ephemeral => self.ephemeral.as_ref(),
            TierKind::Durable => self.durable.as_ref(),
        }
    }

    /// The durable tier, where the remember-me marker always lives.
    pub fn durable(&self) -> &dyn StorageTier {
        self.durable.as_ref()
    }
}

impl Clone for Tiers {
    fn clone(&self) -> Self {
        Self {
            ephemeral: Arc::clone(&self.ephemeral),
            durable: Arc::clone(&self.durable),
        }
    }
}

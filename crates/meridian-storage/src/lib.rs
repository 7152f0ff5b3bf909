//! Meridian Storage Layer
//!
//! Key-value storage tiers backing the auth session:
//! - A durable tier (SQLite) that survives restarts
//! - An ephemeral tier that lives for the current process only
//! - A no-op fallback for execution contexts with no storage at all

mod database;
mod error;
mod migrations;
mod tier;

pub use database::Database;
pub use error::StorageError;
pub use tier::{DurableTier, EphemeralTier, NoopTier, StorageTier, TierKind, Tiers};

pub type Result<T> = std::result::Result<T, StorageError>;

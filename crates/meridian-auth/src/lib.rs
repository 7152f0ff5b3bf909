//! Meridian Auth Session Store
//!
//! - The session store is the single owner of auth state; the view layer
//!   reads snapshots and subscribes to changes
//! - Exactly one storage tier holds the persisted session at any time
//! - A missing or corrupt payload resolves to "signed out", never an error

mod persist;
mod session;
mod store;

pub use persist::try_deserialize;
pub use session::{Session, SessionRecord, TokenPair, TokenUpdate, User};
pub use store::{SessionStore, StorageKeys};

//! Persistence adapter
//!
//! Serializes the session record to and from a storage tier. Every failure
//! at this boundary is absorbed: a missing, unreadable, or corrupt payload
//! reads back as `None`, and callers treat that as "no prior session".

use meridian_storage::StorageTier;

use crate::session::SessionRecord;

pub(crate) fn write(tier: &dyn StorageTier, key: &str, record: &SessionRecord) {
    let payload = match serde_json::to_string(record) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to serialize session record");
            return;
        }
    };

    if let Err(e) = tier.write(key, &payload) {
        tracing::warn!(key, error = %e, "Failed to persist session record");
    }
}

pub(crate) fn read(tier: &dyn StorageTier, key: &str) -> Option<SessionRecord> {
    match tier.read(key) {
        Ok(Some(raw)) => try_deserialize(&raw),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read session record");
            None
        }
    }
}

pub(crate) fn remove(tier: &dyn StorageTier, key: &str) {
    if let Err(e) = tier.remove(key) {
        tracing::warn!(key, error = %e, "Failed to remove session record");
    }
}

/// Parse a raw payload, treating corrupt or foreign data as absent.
pub fn try_deserialize(raw: &str) -> Option<SessionRecord> {
    match serde_json::from_str(raw) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(error = %e, "Discarding unparseable session payload");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_storage::EphemeralTier;

    fn record() -> SessionRecord {
        SessionRecord {
            access_token: Some("a".to_string()),
            refresh_token: Some("b".to_string()),
            user: None,
            tenant_slug: Some("acme".to_string()),
            is_authenticated: true,
            remember_me: false,
        }
    }

    #[test]
    fn test_write_then_read() {
        let tier = EphemeralTier::new();
        write(&tier, "k", &record());

        assert_eq!(read(&tier, "k"), Some(record()));
    }

    #[test]
    fn test_read_absent_key() {
        let tier = EphemeralTier::new();
        assert_eq!(read(&tier, "k"), None);
    }

    #[test]
    fn test_corrupt_payload_reads_as_absent() {
        let tier = EphemeralTier::new();
        tier.write("k", "{not json").unwrap();

        assert_eq!(read(&tier, "k"), None);
    }

    #[test]
    fn test_try_deserialize_rejects_foreign_data() {
        assert!(try_deserialize("").is_none());
        assert!(try_deserialize("42").is_none());
        assert!(try_deserialize("\"string\"").is_none());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let tier = EphemeralTier::new();
        write(&tier, "k", &record());

        remove(&tier, "k");
        assert_eq!(read(&tier, "k"), None);
        remove(&tier, "k");
    }
}

//! Session data structures

use serde::{Deserialize, Serialize};

/// Profile snapshot for the signed-in user.
///
/// May be partial immediately after login (only `id` known) and is replaced
/// wholesale once the full profile loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Credential pair handed to `login` by the sign-in flow.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Partial token merge for refresh flows; omitted fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct TokenUpdate {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl TokenUpdate {
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

/// The live authentication state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    /// Short-lived bearer credential
    pub access_token: Option<String>,
    /// Long-lived credential used to mint new access tokens
    pub refresh_token: Option<String>,
    /// Profile snapshot; may be partial right after login
    pub user: Option<User>,
    /// Organization context, set per login
    pub tenant_slug: Option<String>,
    pub is_authenticated: bool,
    /// Persistence-tier choice, valid for the current login
    pub remember_me: bool,
    /// Process lifecycle, not durable state: true once rehydration has run
    pub is_hydrated: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear everything back to signed-out, keeping the hydration flag.
    /// Rehydration happens once per process, not once per login.
    pub fn reset(&mut self) {
        let is_hydrated = self.is_hydrated;
        *self = Self::default();
        self.is_hydrated = is_hydrated;
    }

    /// The subset of fields that gets persisted.
    pub fn record(&self) -> SessionRecord {
        SessionRecord {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
            user: self.user.clone(),
            tenant_slug: self.tenant_slug.clone(),
            is_authenticated: self.is_authenticated,
            remember_me: self.remember_me,
        }
    }

    /// Overwrite the persistable fields from a recovered record.
    pub fn apply_record(&mut self, record: SessionRecord) {
        self.access_token = record.access_token;
        self.refresh_token = record.refresh_token;
        self.user = record.user;
        self.tenant_slug = record.tenant_slug;
        self.is_authenticated = record.is_authenticated;
        self.remember_me = record.remember_me;
    }
}

/// What actually lands in a storage tier under the session key.
///
/// `is_hydrated` is deliberately absent: it describes this process, not the
/// persisted session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<User>,
    pub tenant_slug: Option<String>,
    pub is_authenticated: bool,
    pub remember_me: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_signed_out() {
        let session = Session::new();
        assert!(!session.is_authenticated);
        assert!(!session.is_hydrated);
        assert!(session.access_token.is_none());
        assert!(session.user.is_none());
    }

    #[test]
    fn test_reset_preserves_hydration() {
        let mut session = Session::new();
        session.is_hydrated = true;
        session.access_token = Some("a".to_string());
        session.is_authenticated = true;
        session.remember_me = true;

        session.reset();

        assert!(session.is_hydrated);
        assert!(!session.is_authenticated);
        assert!(!session.remember_me);
        assert!(session.access_token.is_none());
    }

    #[test]
    fn test_record_uses_camel_case_keys() {
        let mut session = Session::new();
        session.access_token = Some("a".to_string());
        session.tenant_slug = Some("acme".to_string());
        session.is_authenticated = true;

        let json = serde_json::to_string(&session.record()).unwrap();
        assert!(json.contains("\"accessToken\""));
        assert!(json.contains("\"tenantSlug\""));
        assert!(json.contains("\"isAuthenticated\""));
        assert!(!json.contains("isHydrated"));
    }

    #[test]
    fn test_apply_record_leaves_hydration_alone() {
        let mut session = Session::new();
        session.is_hydrated = true;

        session.apply_record(SessionRecord {
            access_token: Some("a".to_string()),
            refresh_token: Some("b".to_string()),
            user: None,
            tenant_slug: Some("acme".to_string()),
            is_authenticated: true,
            remember_me: true,
        });

        assert!(session.is_hydrated);
        assert!(session.is_authenticated);
        assert_eq!(session.access_token.as_deref(), Some("a"));
    }
}

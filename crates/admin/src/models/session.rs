//! Session-related types for admin authentication.
//!
//! Types stored in the session for authentication state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use helper_admin_core::{AdminIdentity, LoginResponse};

use crate::helper::{BearerToken, Credentials};

/// Session-stored admin sign-in.
///
/// Created at login, removed at logout or when the backend rejects the
/// token. Nothing here is validated locally; the backend decides.
#[derive(Clone, Serialize, Deserialize)]
pub struct AdminSession {
    /// Bearer token from `/api/v1/auth/login`.
    access_token: String,
    /// When the backend said the token would expire, if it said.
    pub expires_at: Option<DateTime<Utc>>,
    /// Who signed in.
    pub admin: AdminIdentity,
}

impl AdminSession {
    /// Session for a successful login.
    #[must_use]
    pub fn from_login(login: &LoginResponse, now: DateTime<Utc>) -> Self {
        let expires_at = login
            .expires_in
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(Duration::try_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl));

        Self {
            access_token: login.access_token.clone(),
            expires_at,
            admin: AdminIdentity::from(&login.user),
        }
    }

    /// The stored token.
    #[must_use]
    pub fn token(&self) -> BearerToken {
        BearerToken::new(self.access_token.clone())
    }

    /// Credentials for backend calls made on behalf of this session.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::bearer(self.token())
    }
}

impl std::fmt::Debug for AdminSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSession")
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("admin", &self.admin)
            .finish()
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for the signed-in admin's token and identity.
    pub const ADMIN_SESSION: &str = "admin_session";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn login(expires_in: Option<u64>) -> LoginResponse {
        serde_json::from_value(json!({
            "accessToken": "tok-123",
            "expiresIn": expires_in,
            "user": {
                "userId": "a-1",
                "fullName": "Priya Admin",
                "email": "priya@helper.app",
                "role": "ADMIN"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_from_login_computes_expiry() {
        let now = Utc::now();
        let session = AdminSession::from_login(&login(Some(900)), now);
        assert_eq!(session.expires_at, Some(now + Duration::seconds(900)));
        assert_eq!(session.admin.email, "priya@helper.app");
        assert_eq!(session.token().expose(), "tok-123");
    }

    #[test]
    fn test_from_login_without_expiry() {
        let session = AdminSession::from_login(&login(None), Utc::now());
        assert!(session.expires_at.is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = AdminSession::from_login(&login(Some(60)), Utc::now());
        assert!(!format!("{session:?}").contains("tok-123"));
    }

    #[test]
    fn test_session_round_trips_through_json() {
        let session = AdminSession::from_login(&login(Some(60)), Utc::now());
        let restored: AdminSession =
            serde_json::from_value(serde_json::to_value(&session).unwrap()).unwrap();
        assert_eq!(restored.token().expose(), "tok-123");
        assert_eq!(restored.admin, session.admin);
    }

    #[test]
    fn test_unrepresentable_expiry_is_dropped() {
        let far = u64::try_from(i64::MAX / 1000).unwrap();
        let session = AdminSession::from_login(&login(Some(far)), Utc::now());
        assert!(session.expires_at.is_none());

        let session = AdminSession::from_login(&login(Some(u64::MAX)), Utc::now());
        assert!(session.expires_at.is_none());
    }
}

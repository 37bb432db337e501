//! Session data types
//!
//! The tracked auth state is a tagged union: either nobody is signed in, or
//! we hold the authenticated identity plus its tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authenticated identity as reported by the auth service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

/// An active authenticated session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticatedSession {
    pub user: AuthUser,
    pub access_token: String,
    pub refresh_token: String,
    /// RFC 3339 expiry of the access token
    pub expires_at: String,
}

impl AuthenticatedSession {
    /// Whether the access token has expired as of `now`.
    ///
    /// An unparseable expiry counts as expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match DateTime::parse_from_rfc3339(&self.expires_at) {
            Ok(expires_at) => expires_at.with_timezone(&Utc) <= now,
            Err(_) => true,
        }
    }
}

/// Current auth state, absent when signed out
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(AuthenticatedSession),
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    /// Id of the signed-in user, if any
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated(auth) => Some(&auth.user.id),
        }
    }

    /// Access token of the signed-in user, if any
    pub fn access_token(&self) -> Option<&str> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated(auth) => Some(&auth.access_token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session(expires_at: &str) -> AuthenticatedSession {
        AuthenticatedSession {
            user: AuthUser {
                id: "u1".to_string(),
                email: "owner@example.com".to_string(),
            },
            access_token: "token-abc".to_string(),
            refresh_token: "refresh-xyz".to_string(),
            expires_at: expires_at.to_string(),
        }
    }

    #[test]
    fn test_default_session_is_anonymous() {
        let session = Session::default();
        assert!(!session.is_authenticated());
        assert_eq!(session.user_id(), None);
        assert_eq!(session.access_token(), None);
    }

    #[test]
    fn test_authenticated_session_accessors() {
        let session = Session::Authenticated(sample_session("2099-01-01T00:00:00Z"));
        assert!(session.is_authenticated());
        assert_eq!(session.user_id(), Some("u1"));
        assert_eq!(session.access_token(), Some("token-abc"));
    }

    #[test]
    fn test_expiry_check() {
        let now = DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        assert!(!sample_session("2026-03-01T13:00:00Z").is_expired(now));
        assert!(sample_session("2026-03-01T11:00:00Z").is_expired(now));
        assert!(sample_session("2026-03-01T12:00:00Z").is_expired(now));
        assert!(sample_session("garbage").is_expired(now));
    }

    #[test]
    fn test_session_json_round_trip() {
        let session = Session::Authenticated(sample_session("2099-01-01T00:00:00Z"));
        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("\"state\":\"authenticated\""));

        let restored: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, session);
    }
}

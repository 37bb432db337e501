//! Auth service operations
//!
//! Email/password sign-in and sign-up, token revoke on sign-out, and a
//! one-shot refresh used when a persisted session has expired. Error
//! messages from the auth service are surfaced verbatim so the user sees
//! what the service said.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{error_from_response, BackendClient, BackendError};
use crate::models::{AuthUser, AuthenticatedSession};

/// Successful token-grant response from the auth service
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token lifetime in seconds
    pub expires_in: i64,
    pub user: AuthUser,
}

impl TokenResponse {
    /// Convert the grant into a tracked session, anchoring expiry at `now`
    pub fn into_session(self, now: DateTime<Utc>) -> AuthenticatedSession {
        let expires_at = now + Duration::seconds(self.expires_in);
        AuthenticatedSession {
            user: self.user,
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: expires_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

impl BackendClient {
    /// Exchange email/password credentials for a session
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedSession, BackendError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let req = self
            .http
            .post(url)
            .json(&PasswordGrant { email, password });
        let resp = self.authorize(req, None).send().await?;

        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        let grant: TokenResponse = resp.json().await?;
        Ok(grant.into_session(Utc::now()))
    }

    /// Register a new account; confirmation happens over email
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<(), BackendError> {
        let url = self.endpoint("auth/v1/signup")?;

        let req = self
            .http
            .post(url)
            .json(&PasswordGrant { email, password });
        let resp = self.authorize(req, None).send().await?;

        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        Ok(())
    }

    /// Revoke the session's token on the auth service
    pub async fn sign_out(&self, session: &AuthenticatedSession) -> Result<(), BackendError> {
        let url = self.endpoint("auth/v1/logout")?;

        let req = self.http.post(url);
        let resp = self.authorize(req, Some(session)).send().await?;

        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        Ok(())
    }

    /// Exchange a refresh token for a fresh session
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthenticatedSession, BackendError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut()
            .append_pair("grant_type", "refresh_token");

        let req = self.http.post(url).json(&RefreshGrant { refresh_token });
        let resp = self.authorize(req, None).send().await?;

        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        let grant: TokenResponse = resp.json().await?;
        Ok(grant.into_session(Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_deserializes() {
        let json = r#"{
            "access_token": "at-123",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "rt-456",
            "user": { "id": "u1", "email": "owner@example.com" }
        }"#;

        let grant: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(grant.access_token, "at-123");
        assert_eq!(grant.expires_in, 3600);
        assert_eq!(grant.user.id, "u1");
    }

    #[test]
    fn test_into_session_anchors_expiry() {
        let grant = TokenResponse {
            access_token: "at-123".to_string(),
            refresh_token: "rt-456".to_string(),
            expires_in: 3600,
            user: AuthUser {
                id: "u1".to_string(),
                email: "owner@example.com".to_string(),
            },
        };

        let now = DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let session = grant.into_session(now);

        assert_eq!(session.access_token, "at-123");
        assert!(!session.is_expired(now));
        assert!(session.is_expired(now + Duration::seconds(3601)));
    }
}

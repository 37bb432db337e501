//! Hosted backend client
//!
//! This module talks to the external collaborator that owns all persistence:
//! - `/auth/v1` — email/password auth and token refresh
//! - `/storage/v1` — object upload and public URLs
//! - `/rest/v1` — row insert and ordered select
//!
//! The client is constructed once at startup from [`BackendConfig`] and
//! handed to whoever needs it through Tauri managed state; there is no
//! process-global handle.

pub mod auth;
pub mod records;
pub mod storage;

use std::time::Duration;

use reqwest::RequestBuilder;
use thiserror::Error;
use url::Url;

use crate::config::BackendConfig;
use crate::models::AuthenticatedSession;

const USER_AGENT: &str = concat!("PetBook/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Backend client errors
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response; `message` comes from the backend's error body
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// HTTP client for the hosted backend
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
    bucket: String,
}

impl BackendClient {
    /// Create a client from loaded configuration
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            bucket: config.bucket.clone(),
        })
    }

    /// Resolve a service path against the backend base URL
    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path)
            .map_err(|e| BackendError::InvalidUrl(format!("{path}: {e}")))
    }

    /// Attach the API key and, when a session exists, its bearer token.
    ///
    /// Anonymous requests use the API key as the bearer so the backend can
    /// apply its public-role policies.
    fn authorize(
        &self,
        req: RequestBuilder,
        session: Option<&AuthenticatedSession>,
    ) -> RequestBuilder {
        let bearer = session
            .map(|s| s.access_token.as_str())
            .unwrap_or(&self.api_key);
        req.header("apikey", &self.api_key).bearer_auth(bearer)
    }
}

/// Turn a non-success response into a [`BackendError::Api`].
///
/// The backend's error bodies are JSON with the human-readable text under
/// one of a few keys depending on the service; the raw body is used when no
/// known key is present.
async fn error_from_response(resp: reqwest::Response) -> BackendError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();

    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| extract_api_message(&v))
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("HTTP {status}")
            } else {
                body.trim().to_string()
            }
        });

    BackendError::Api { status, message }
}

/// Pull the user-facing message out of a backend error body
fn extract_api_message(body: &serde_json::Value) -> Option<String> {
    for key in ["error_description", "msg", "message", "error"] {
        if let Some(text) = body.get(key).and_then(|v| v.as_str()) {
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_base_url;

    fn test_client() -> BackendClient {
        let config = BackendConfig {
            base_url: parse_base_url("https://api.example.com").unwrap(),
            api_key: "anon-key".to_string(),
            bucket: "pets".to_string(),
        };
        BackendClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_resolution() {
        let client = test_client();
        let url = client.endpoint("auth/v1/token").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/auth/v1/token");
    }

    #[test]
    fn test_extract_api_message_auth_shape() {
        let body = serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        });
        assert_eq!(
            extract_api_message(&body),
            Some("Invalid login credentials".to_string())
        );
    }

    #[test]
    fn test_extract_api_message_storage_shape() {
        let body = serde_json::json!({ "message": "Bucket not found" });
        assert_eq!(
            extract_api_message(&body),
            Some("Bucket not found".to_string())
        );
    }

    #[test]
    fn test_extract_api_message_signup_shape() {
        let body = serde_json::json!({ "msg": "User already registered" });
        assert_eq!(
            extract_api_message(&body),
            Some("User already registered".to_string())
        );
    }

    #[test]
    fn test_extract_api_message_unknown_shape() {
        let body = serde_json::json!({ "detail": "something else" });
        assert_eq!(extract_api_message(&body), None);
    }
}

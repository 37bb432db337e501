//! Backend configuration
//!
//! The hosted backend (auth + object storage + database) is reached through
//! a single base URL plus a public API key. Both come from the environment
//! so no credentials live in the bundle.

use std::env;

use url::Url;

/// Environment variable holding the backend base URL
pub const BACKEND_URL_VAR: &str = "PETBOOK_BACKEND_URL";

/// Environment variable holding the public API key
pub const API_KEY_VAR: &str = "PETBOOK_API_KEY";

/// Environment variable holding the storage bucket name
pub const BUCKET_VAR: &str = "PETBOOK_BUCKET";

const DEFAULT_BUCKET: &str = "pets";

/// Connection settings for the hosted backend
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: Url,
    pub api_key: String,
    pub bucket: String,
}

impl BackendConfig {
    /// Load configuration from the environment.
    ///
    /// Returns `None` when the URL or key is missing or malformed. The app
    /// still starts in that case; commands that need the backend report a
    /// configuration error instead.
    pub fn load() -> Option<Self> {
        let raw_url = match env::var(BACKEND_URL_VAR) {
            Ok(v) if !v.trim().is_empty() => v,
            _ => {
                tracing::warn!("{} not set, backend disabled", BACKEND_URL_VAR);
                return None;
            }
        };

        let base_url = match parse_base_url(&raw_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Invalid {} value: {}", BACKEND_URL_VAR, e);
                return None;
            }
        };

        let api_key = match env::var(API_KEY_VAR) {
            Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
            _ => {
                tracing::warn!("{} not set, backend disabled", API_KEY_VAR);
                return None;
            }
        };

        let bucket = env::var(BUCKET_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BUCKET.to_string());

        Some(Self {
            base_url,
            api_key,
            bucket,
        })
    }
}

/// Parse and normalize the base URL so relative joins resolve under it.
///
/// `Url::join` drops the last path segment when the base has no trailing
/// slash, so one is appended here.
pub fn parse_base_url(raw: &str) -> Result<Url, url::ParseError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&with_slash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_appends_slash() {
        let url = parse_base_url("https://api.example.com").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/");
    }

    #[test]
    fn test_parse_base_url_keeps_existing_slash() {
        let url = parse_base_url("https://api.example.com/").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/");
    }

    #[test]
    fn test_parse_base_url_trims_whitespace() {
        let url = parse_base_url("  https://api.example.com  ").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/");
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn test_joins_resolve_under_base() {
        let url = parse_base_url("https://api.example.com/project").unwrap();
        let joined = url.join("auth/v1/token").unwrap();
        assert_eq!(
            joined.as_str(),
            "https://api.example.com/project/auth/v1/token"
        );
    }
}

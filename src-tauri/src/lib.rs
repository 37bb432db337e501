//! PetBook - Tauri Backend
//!
//! This library provides the Rust backend for the PetBook gallery app.
//! It handles:
//! - Session tracking against the hosted auth service
//! - Fetching the pet gallery from the hosted database
//! - The photo upload pipeline (store -> public URL -> insert)
//! - The sign-in / sign-up / sign-out actions

pub mod commands;
pub mod config;
pub mod models;
pub mod remote;
pub mod session;

use std::path::Path;
use std::sync::atomic::AtomicBool;

use chrono::Utc;
use tauri::{Emitter, Manager};

use models::Session;
use remote::BackendClient;
use session::SessionTracker;

/// Application state managed by Tauri
pub struct AppState {
    /// Hosted backend client; `None` when the environment is unconfigured
    pub backend: Option<BackendClient>,
    pub sessions: SessionTracker,
    /// Set while an upload is in flight
    pub uploading: AtomicBool,
}

/// Error type for Tauri commands
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Backend not configured")]
    NotConfigured,

    #[error("Please sign in first")]
    NotSignedIn,

    #[error("Email and password are required")]
    EmptyCredentials,

    #[error("No file selected")]
    MissingFile,

    #[error("Please name your pet")]
    MissingName,

    #[error("Error fetching pets")]
    FetchFailed,

    #[error("Error uploading pet")]
    UploadFailed,

    /// Auth-service message, shown to the user verbatim
    #[error("{0}")]
    Auth(String),
}

// Implement serialization for Tauri
impl serde::Serialize for CommandError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

// ============================================================================
// Tauri Application Setup
// ============================================================================

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("Starting PetBook backend");

    let backend = match config::BackendConfig::load() {
        Some(cfg) => {
            tracing::info!("Backend: {}", cfg.base_url);
            match BackendClient::new(&cfg) {
                Ok(client) => Some(client),
                Err(e) => {
                    tracing::error!("Failed to build backend client: {:?}", e);
                    None
                }
            }
        }
        None => None,
    };

    // Restore whatever session was persisted by the previous run
    let store_path = session::default_store_path();
    let initial = restore_session(backend.as_ref(), &store_path);

    let sessions = SessionTracker::new(Some(store_path));
    sessions.set(initial);

    let app_state = AppState {
        backend,
        sessions,
        uploading: AtomicBool::new(false),
    };

    tauri::Builder::default()
        .manage(app_state)
        .plugin(tauri_plugin_dialog::init())
        .invoke_handler(tauri::generate_handler![
            // Session commands
            commands::get_session,
            // Auth commands
            commands::sign_in,
            commands::sign_up,
            commands::sign_out,
            // Gallery commands
            commands::list_pets,
            commands::upload_pet,
            commands::is_uploading,
        ])
        .setup(|app| {
            // Forward every session change to the webview; the frontend
            // re-renders and re-fetches the gallery on this event.
            let handle = app.handle().clone();
            let state = app.state::<AppState>();
            state.sessions.subscribe(Box::new(move |session| {
                let payload = commands::SessionResponse::from_session(session);
                if let Err(e) = handle.emit("session-changed", &payload) {
                    tracing::warn!("Failed to emit session change: {}", e);
                }
            }));
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

/// Determine the startup session from the persisted store.
///
/// An unexpired session is used as-is; an expired one gets a single refresh
/// attempt. Any failure leaves the session absent, no retries.
fn restore_session(backend: Option<&BackendClient>, store_path: &Path) -> Session {
    let Some(saved) = session::load_persisted(store_path) else {
        return Session::Anonymous;
    };

    if !saved.is_expired(Utc::now()) {
        tracing::info!("Restored session for {}", saved.user.email);
        return Session::Authenticated(saved);
    }

    let Some(client) = backend else {
        return Session::Anonymous;
    };

    match tauri::async_runtime::block_on(client.refresh(&saved.refresh_token)) {
        Ok(fresh) => {
            tracing::info!("Refreshed expired session for {}", fresh.user.email);
            Session::Authenticated(fresh)
        }
        Err(e) => {
            tracing::warn!("Session refresh failed: {:?}", e);
            Session::Anonymous
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_messages() {
        assert_eq!(CommandError::NotSignedIn.to_string(), "Please sign in first");
        assert_eq!(CommandError::FetchFailed.to_string(), "Error fetching pets");
        assert_eq!(CommandError::UploadFailed.to_string(), "Error uploading pet");
        assert_eq!(
            CommandError::Auth("Invalid login credentials".to_string()).to_string(),
            "Invalid login credentials"
        );
    }

    #[test]
    fn test_command_error_serializes_as_message() {
        let json = serde_json::to_string(&CommandError::NotSignedIn).unwrap();
        assert_eq!(json, "\"Please sign in first\"");
    }
}

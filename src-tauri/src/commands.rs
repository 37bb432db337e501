//! Tauri command handlers
//!
//! All IPC commands exposed to the frontend: session inspection, the auth
//! actions, the gallery fetch, and the four-step upload pipeline. Input
//! validation happens here so nothing reaches the backend client with a
//! missing precondition.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use crate::models::{AuthenticatedSession, NewPet, Session};
use crate::remote::storage::{content_type_for, object_path};
use crate::remote::{BackendClient, BackendError};
use crate::AppState;
use crate::CommandError;

// ============================================================================
// Response DTOs for Frontend
// ============================================================================

/// Public view of the tracked session
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub user_id: Option<String>,
    pub email: Option<String>,
}

impl SessionResponse {
    pub fn from_session(session: &Session) -> Self {
        match session {
            Session::Anonymous => Self {
                authenticated: false,
                user_id: None,
                email: None,
            },
            Session::Authenticated(auth) => Self {
                authenticated: true,
                user_id: Some(auth.user.id.clone()),
                email: Some(auth.user.email.clone()),
            },
        }
    }
}

/// Pet entry for gallery rendering
#[derive(Debug, Clone, Serialize)]
pub struct PetResponse {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub created_at: String,
}

/// Result of a successful upload
#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub pet_name: String,
    pub image_url: String,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Get the backend client, returning an error if unconfigured
fn backend(state: &AppState) -> Result<&BackendClient, CommandError> {
    state.backend.as_ref().ok_or(CommandError::NotConfigured)
}

/// Require an active session for a gated operation
fn ensure_signed_in(session: &Session) -> Result<AuthenticatedSession, CommandError> {
    match session {
        Session::Authenticated(auth) => Ok(auth.clone()),
        Session::Anonymous => Err(CommandError::NotSignedIn),
    }
}

/// Reject empty credentials before any remote call is attempted
fn validate_credentials(email: &str, password: &str) -> Result<(), CommandError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(CommandError::EmptyCredentials);
    }
    Ok(())
}

/// Reject an upload request with no file or no name before any remote call
fn validate_upload_request(file_path: &str, pet_name: &str) -> Result<(), CommandError> {
    if file_path.trim().is_empty() {
        return Err(CommandError::MissingFile);
    }
    if pet_name.trim().is_empty() {
        return Err(CommandError::MissingName);
    }
    Ok(())
}

/// Map an auth-service failure to its user-facing message.
///
/// API error bodies are surfaced verbatim; transport failures get their
/// display text, with details in the log either way.
fn auth_error(action: &str, err: BackendError) -> CommandError {
    tracing::error!("{} failed: {:?}", action, err);
    match err {
        BackendError::Api { message, .. } => CommandError::Auth(message),
        other => CommandError::Auth(other.to_string()),
    }
}

/// RAII guard for the upload-in-progress flag.
///
/// The flag clears when the guard drops, success or failure, so a failed
/// step can never leave the loading indicator stuck.
struct UploadGuard<'a>(&'a AtomicBool);

impl<'a> UploadGuard<'a> {
    fn engage(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for UploadGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

// ============================================================================
// Tauri Commands
// ============================================================================

/// Get the currently tracked session
#[tauri::command]
pub async fn get_session(
    state: tauri::State<'_, AppState>,
) -> Result<SessionResponse, CommandError> {
    Ok(SessionResponse::from_session(&state.sessions.current()))
}

/// Sign in with email and password
#[tauri::command]
pub async fn sign_in(
    state: tauri::State<'_, AppState>,
    email: String,
    password: String,
) -> Result<SessionResponse, CommandError> {
    validate_credentials(&email, &password)?;
    let backend = backend(&state)?;

    let session = backend
        .sign_in(email.trim(), &password)
        .await
        .map_err(|e| auth_error("Sign in", e))?;

    tracing::info!("Signed in as {}", session.user.email);
    let session = Session::Authenticated(session);
    let response = SessionResponse::from_session(&session);
    state.sessions.set(session);

    Ok(response)
}

/// Register a new account; the user confirms over email
#[tauri::command]
pub async fn sign_up(
    state: tauri::State<'_, AppState>,
    email: String,
    password: String,
) -> Result<(), CommandError> {
    validate_credentials(&email, &password)?;
    let backend = backend(&state)?;

    backend
        .sign_up(email.trim(), &password)
        .await
        .map_err(|e| auth_error("Sign up", e))?;

    tracing::info!("Sign up submitted for {}", email.trim());
    Ok(())
}

/// Sign out of the current session
#[tauri::command]
pub async fn sign_out(state: tauri::State<'_, AppState>) -> Result<(), CommandError> {
    if let Session::Authenticated(auth) = state.sessions.current() {
        if let Some(backend) = state.backend.as_ref() {
            // The local session is cleared either way; a failed revoke only
            // matters to the server.
            if let Err(e) = backend.sign_out(&auth).await {
                tracing::warn!("Token revoke failed: {:?}", e);
            }
        }
        tracing::info!("Signed out {}", auth.user.email);
    }

    state.sessions.set(Session::Anonymous);
    Ok(())
}

/// Fetch all pet entries, newest first.
///
/// On failure the frontend keeps whatever list it was already showing.
#[tauri::command]
pub async fn list_pets(
    state: tauri::State<'_, AppState>,
) -> Result<Vec<PetResponse>, CommandError> {
    let session = ensure_signed_in(&state.sessions.current())?;
    let backend = backend(&state)?;

    let pets = backend.list_pets(&session).await.map_err(|e| {
        tracing::error!("Fetching pets failed: {:?}", e);
        CommandError::FetchFailed
    })?;

    Ok(pets
        .into_iter()
        .map(|p| PetResponse {
            id: p.id,
            name: p.name,
            image_url: p.image_url,
            created_at: p.created_at,
        })
        .collect())
}

/// Whether an upload is currently in flight
#[tauri::command]
pub async fn is_uploading(state: tauri::State<'_, AppState>) -> Result<bool, CommandError> {
    Ok(state.uploading.load(Ordering::SeqCst))
}

/// Upload a pet photo and record the entry.
///
/// Four steps, strictly in order, each of which aborts the rest on failure:
/// derive a storage path, store the bytes, resolve the public URL, insert
/// the row. The frontend reloads the gallery after a success.
#[tauri::command]
pub async fn upload_pet(
    state: tauri::State<'_, AppState>,
    file_path: String,
    pet_name: String,
) -> Result<UploadOutcome, CommandError> {
    let session = ensure_signed_in(&state.sessions.current())?;
    validate_upload_request(&file_path, &pet_name)?;
    let backend = backend(&state)?;

    let _guard = UploadGuard::engage(&state.uploading);

    let name = pet_name.trim().to_string();
    let file_name = Path::new(&file_path)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or(CommandError::MissingFile)?
        .to_string();

    let bytes = tokio::fs::read(&file_path).await.map_err(|e| {
        tracing::error!("Reading {} failed: {}", file_path, e);
        CommandError::UploadFailed
    })?;

    let path = object_path(&session.user.id, &file_name).map_err(|e| {
        tracing::error!("Deriving storage path failed: {:?}", e);
        CommandError::UploadFailed
    })?;

    backend
        .upload_object(&session, &path, bytes, content_type_for(&file_name))
        .await
        .map_err(|e| {
            tracing::error!("Storing object {} failed: {:?}", path, e);
            CommandError::UploadFailed
        })?;

    let image_url = backend.public_url(&path).map_err(|e| {
        tracing::error!("Resolving public URL for {} failed: {:?}", path, e);
        CommandError::UploadFailed
    })?;

    backend
        .insert_pet(
            &session,
            &NewPet {
                name: name.clone(),
                image_url: image_url.clone(),
                user_id: session.user.id.clone(),
            },
        )
        .await
        .map_err(|e| {
            tracing::error!("Inserting pet row failed: {:?}", e);
            CommandError::UploadFailed
        })?;

    tracing::info!("Uploaded pet {} -> {}", name, image_url);
    Ok(UploadOutcome {
        pet_name: name,
        image_url,
    })
}

// ============================================================================
// Tests
// ============================================================================

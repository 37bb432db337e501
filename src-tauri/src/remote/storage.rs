//! Object storage operations
//!
//! Uploaded photos live under `{user_id}/{uuid}.{ext}` in the configured
//! bucket. The UUID makes paths collision-resistant; the extension is
//! carried over from the original file so the public URL stays viewable.

use std::path::Path;

use reqwest::header::CONTENT_TYPE;
use uuid::Uuid;

use super::{error_from_response, BackendClient, BackendError};
use crate::models::AuthenticatedSession;

/// Derive a randomized storage path scoped under the uploading user.
///
/// Extensions are lowercased; a file without one gets no suffix.
pub fn object_path(user_id: &str, file_name: &str) -> Result<String, BackendError> {
    if user_id.trim().is_empty() {
        return Err(BackendError::InvalidPath(
            "missing user id".to_string(),
        ));
    }

    let id = Uuid::new_v4();
    let path = match Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
    {
        Some(ext) => format!("{user_id}/{id}.{}", ext.to_lowercase()),
        None => format!("{user_id}/{id}"),
    };

    Ok(path)
}

/// Content type for an uploaded file, by extension
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

impl BackendClient {
    /// Store the file bytes at `path` in the photo bucket
    pub async fn upload_object(
        &self,
        session: &AuthenticatedSession,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BackendError> {
        let url = self.endpoint(&format!("storage/v1/object/{}/{path}", self.bucket))?;

        let req = self
            .http
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(bytes);
        let resp = self.authorize(req, Some(session)).send().await?;

        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        Ok(())
    }

    /// Publicly reachable URL for a stored object.
    ///
    /// Pure derivation, no request is made.
    pub fn public_url(&self, path: &str) -> Result<String, BackendError> {
        let url = self.endpoint(&format!(
            "storage/v1/object/public/{}/{path}",
            self.bucket
        ))?;
        Ok(url.to_string())
    }
}

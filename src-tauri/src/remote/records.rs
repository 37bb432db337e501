//! Record store operations
//!
//! Pet rows live in the backend's `pets` table. Listing always asks for the
//! full set ordered by creation time descending and replaces whatever was
//! displayed before; there is no incremental merge.

use super::{error_from_response, BackendClient, BackendError};
use crate::models::{AuthenticatedSession, NewPet, Pet};

const PETS_TABLE: &str = "pets";

impl BackendClient {
    /// Insert a new pet row
    pub async fn insert_pet(
        &self,
        session: &AuthenticatedSession,
        pet: &NewPet,
    ) -> Result<(), BackendError> {
        let url = self.endpoint(&format!("rest/v1/{PETS_TABLE}"))?;

        let req = self
            .http
            .post(url)
            .header("Prefer", "return=minimal")
            .json(pet);
        let resp = self.authorize(req, Some(session)).send().await?;

        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        Ok(())
    }

    /// Fetch all pet rows, newest first.
    ///
    /// Order is whatever the backend returns for `created_at.desc`; the
    /// caller renders it as-is.
    pub async fn list_pets(
        &self,
        session: &AuthenticatedSession,
    ) -> Result<Vec<Pet>, BackendError> {
        let url = self.endpoint(&format!("rest/v1/{PETS_TABLE}"))?;

        let req = self
            .http
            .get(url)
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        let resp = self.authorize(req, Some(session)).send().await?;

        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        let pets: Vec<Pet> = resp.json().await?;
        Ok(pets)
    }
}

//! Pet entry types
//!
//! A pet entry is immutable once created: the backend assigns the id and
//! creation timestamp, the app supplies the rest. There is no update or
//! delete operation.

use serde::{Deserialize, Serialize};

/// A stored pet-photo record as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub user_id: String,
    /// RFC 3339 timestamp assigned by the backend, used for ordering
    pub created_at: String,
}

/// Insert payload for a new pet entry
///
/// Ownership is recorded at creation via `user_id`; the backend fills in
/// `id` and `created_at`.
#[derive(Debug, Clone, Serialize)]
pub struct NewPet {
    pub name: String,
    pub image_url: String,
    pub user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pet_deserializes_backend_row() {
        let json = r#"{
            "id": "a1b2",
            "name": "Rex",
            "image_url": "https://cdn.example.com/pets/u1/photo.jpg",
            "user_id": "u1",
            "created_at": "2026-03-01T12:00:00Z"
        }"#;

        let pet: Pet = serde_json::from_str(json).unwrap();
        assert_eq!(pet.name, "Rex");
        assert_eq!(pet.user_id, "u1");
        assert_eq!(pet.created_at, "2026-03-01T12:00:00Z");
    }

    #[test]
    fn test_new_pet_serializes_insert_payload() {
        let pet = NewPet {
            name: "Milo".to_string(),
            image_url: "https://cdn.example.com/pets/u1/abc.png".to_string(),
            user_id: "u1".to_string(),
        };

        let json = serde_json::to_string(&pet).unwrap();
        assert!(json.contains("\"name\":\"Milo\""));
        assert!(json.contains("\"user_id\":\"u1\""));
        // No client-assigned id or timestamp in the payload
        assert!(!json.contains("\"id\""));
        assert!(!json.contains("created_at"));
    }
}

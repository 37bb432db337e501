//! Data models module
//!
//! Contains the data structures used throughout the application:
//! - Pet entry types (backend rows and insert payloads)
//! - Session types (the tracked auth state)

pub mod pet;
pub mod session;

pub use pet::{NewPet, Pet};
pub use session::{AuthUser, AuthenticatedSession, Session};

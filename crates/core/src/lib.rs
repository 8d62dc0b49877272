//! Core business logic for examdesk.

pub mod services;
pub mod session;

pub use services::*;
pub use session::SessionActor;

/// Generate a unique ID using ULID.
#[must_use]
pub fn generate_id() -> String {
    ulid::Ulid::new().to_string().to_lowercase()
}

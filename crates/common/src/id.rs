//! ID generation utilities.

use rand::Rng;
use ulid::Ulid;
use uuid::Uuid;

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs are:
    /// - Lexicographically sortable
    /// - Monotonically increasing within the same millisecond
    /// - Shorter than UUIDs when represented as strings
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate a cryptographically secure random token.
    #[must_use]
    pub fn generate_token(&self) -> String {
        // Use UUID v4 for tokens (no time component for security)
        Uuid::new_v4().simple().to_string()
    }

    /// Generate a human-readable complaint reference number.
    ///
    /// Uniqueness is enforced by the database constraint on the column;
    /// collisions across six random digits are rare enough that the insert
    /// simply fails and the caller may retry.
    #[must_use]
    pub fn generate_reference_number(&self) -> String {
        let n: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
        format!("REF-{n}")
    }
}

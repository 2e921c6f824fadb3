//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User account stored in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Document ID
    pub id: String,
    /// Login email, trimmed and lower-cased
    pub email: String,
    /// Argon2id PHC string
    pub password_hash: String,
    /// When the account was registered (ISO 8601)
    pub created_at: String,
}

/// Canonical form used for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

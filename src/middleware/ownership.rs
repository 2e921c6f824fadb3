// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ownership checks for owner-scoped resources.
//!
//! A resource owned by another user is reported exactly like a missing one,
//! so callers cannot probe for other users' document ids.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::Pet;

/// A resource that belongs to exactly one user.
pub trait OwnerScoped {
    /// ID of the owning user.
    fn owner_id(&self) -> &str;

    /// Human-readable kind, used in not-found messages.
    fn kind() -> &'static str;
}

impl OwnerScoped for Pet {
    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn kind() -> &'static str {
        "Pet"
    }
}

/// Keep `resource` only if `owner_id` owns it.
pub fn owned_by<T: OwnerScoped>(resource: Option<T>, owner_id: &str) -> Option<T> {
    resource.filter(|r| r.owner_id() == owner_id)
}

/// Admit the resource iff the principal owns it, otherwise `NotFound`.
pub fn ensure_owned<T: OwnerScoped>(resource: Option<T>, principal: &AuthUser) -> Result<T> {
    owned_by(resource, &principal.user_id)
        .ok_or_else(|| AppError::NotFound(format!("{} not found", T::kind())))
}

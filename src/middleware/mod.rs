// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP middleware.

pub mod auth;
pub mod ownership;
pub mod security;

pub use auth::require_auth;

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod card;
pub mod credentials;
pub mod llm;
pub mod report;
pub mod storage;
pub mod triage;

pub use credentials::{Argon2Config, CredentialStore};
pub use llm::{ChatMessage, LlmClient};
pub use storage::UploadStore;

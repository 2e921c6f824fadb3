// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! PetID: pet health records backend
//!
//! This crate provides the API for owner accounts, pet profiles with vaccine
//! checklists, a symptom diary with PDF reports and public cards, and an
//! LLM-backed veterinary assistant.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Database;
use error::AppError;
use services::{Argon2Config, CredentialStore, LlmClient, UploadStore};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub credentials: CredentialStore,
    pub uploads: UploadStore,
    pub llm: LlmClient,
}

impl AppState {
    /// Build the services that derive from `config` around an existing
    /// database handle.
    pub fn new(config: Config, db: Database, argon2: Argon2Config) -> Result<Self, AppError> {
        let credentials = CredentialStore::new(
            &config.jwt_signing_key,
            chrono::Duration::minutes(config.token_ttl_minutes),
            argon2,
        )?;
        let uploads = UploadStore::new(config.upload_dir.clone());
        let llm = LlmClient::from_config(&config);

        Ok(Self {
            config,
            db,
            credentials,
            uploads,
            llm,
        })
    }
}

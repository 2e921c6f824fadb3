// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Password hashing and bearer token issuing.
//!
//! Passwords are hashed with Argon2id into PHC strings. Tokens are HS256 JWTs
//! carrying the user id as `sub`; there is no server-side session or
//! revocation list, so a token is valid until it expires.

use crate::error::AppError;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm as Argon2Algorithm, Argon2, Params, Version,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy)]
pub struct Argon2Config {
    /// Memory cost in KiB
    pub memory_cost: u32,
    /// Iterations
    pub time_cost: u32,
    pub parallelism: u32,
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_cost: 19 * 1024,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl Argon2Config {
    /// Cheap parameters for tests.
    pub fn testing() -> Self {
        Self {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }
}

/// Hashes passwords and issues/validates bearer tokens.
#[derive(Clone)]
pub struct CredentialStore {
    signing_key: Vec<u8>,
    token_ttl: Duration,
    argon2: Argon2<'static>,
}

impl CredentialStore {
    pub fn new(
        signing_key: &[u8],
        token_ttl: Duration,
        argon2_config: Argon2Config,
    ) -> Result<Self, AppError> {
        let params = Params::new(
            argon2_config.memory_cost,
            argon2_config.time_cost,
            argon2_config.parallelism,
            None,
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid Argon2 params: {}", e)))?;

        Ok(Self {
            signing_key: signing_key.to_vec(),
            token_ttl,
            argon2: Argon2::new(Argon2Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    // ─── Passwords ───────────────────────────────────────────────

    /// Hash a password with a fresh random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))
    }

    /// Check a password against a stored hash.
    ///
    /// A wrong password is `Ok(false)`; a corrupt stored hash is an error.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Invalid password hash format: {}", e))
        })?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::Internal(anyhow::anyhow!(
                "Password verification error: {}",
                e
            ))),
        }
    }

    // ─── Tokens ──────────────────────────────────────────────────

    /// Issue a token for `subject` with the configured lifetime.
    pub fn issue_token(&self, subject: &str) -> Result<String, AppError> {
        self.issue_token_with_ttl(subject, self.token_ttl)
    }

    /// Issue a token for `subject` valid for `ttl` from now.
    pub fn issue_token_with_ttl(&self, subject: &str, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: unix_seconds(now.timestamp()),
            exp: unix_seconds((now + ttl).timestamp()),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.signing_key),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sign token: {}", e)))
    }

    /// Validate signature and expiry and return the subject.
    pub fn decode_token(&self, token: &str) -> Result<String, AppError> {
        let key = DecodingKey::from_secret(&self.signing_key);
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            AppError::InvalidToken
        })?;

        if token_data.claims.sub.is_empty() {
            return Err(AppError::InvalidToken);
        }

        Ok(token_data.claims.sub)
    }
}

fn unix_seconds(timestamp: i64) -> usize {
    usize::try_from(timestamp).unwrap_or(0)
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account registration and password login.

use axum::{extract::State, routing::post, Form, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

use crate::db::new_document_id;
use crate::error::{AppError, Result};
use crate::models::user::normalize_email;
use crate::models::User;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
}

/// Registration request body.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 256))]
    pub password: String,
}

/// Public view of a user.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserPublic {
    pub id: String,
    pub email: String,
}

/// Create an account. Emails are compared case-insensitively.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<UserPublic>> {
    payload.email = normalize_email(&payload.email);
    payload.validate()?;

    let user = User {
        id: new_document_id(),
        email: payload.email,
        password_hash: state.credentials.hash_password(&payload.password)?,
        created_at: format_utc_rfc3339(chrono::Utc::now()),
    };

    state.db.create_user(&user).await?;
    tracing::info!(user_id = %user.id, "User registered");

    Ok(Json(UserPublic {
        id: user.id,
        email: user.email,
    }))
}

/// OAuth2 password grant form. `username` carries the email.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub grant_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Exchange email and password for a bearer token.
///
/// An unknown email and a wrong password produce the same error.
async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>> {
    if let Some(grant_type) = form.grant_type.as_deref() {
        if !grant_type.is_empty() && grant_type != "password" {
            return Err(AppError::BadRequest(format!(
                "Unsupported grant_type: {}",
                grant_type
            )));
        }
    }

    let user = state
        .db
        .find_user_by_email(&form.username)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !state
        .credentials
        .verify_password(&form.password, &user.password_hash)?
    {
        tracing::debug!(user_id = %user.id, "Password mismatch");
        return Err(AppError::InvalidCredentials);
    }

    let access_token = state.credentials.issue_token(&user.id)?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Symptom diary routes.
//!
//! Entries are filed under whatever `pet_id` the client sends; the pet is not
//! checked against the caller's pets.

use crate::db::new_document_id;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{DiaryEntry, DiaryEntryInput};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/diary", post(add_entry))
        .route("/api/diary/{pet_id}", get(list_entries))
}

async fn add_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<DiaryEntryInput>,
) -> Result<Json<DiaryEntry>> {
    payload.validate()?;

    let entry = DiaryEntry::new(new_document_id(), payload);
    state.db.insert_diary_entry(&entry).await?;

    tracing::info!(
        entry_id = %entry.id,
        pet_id = %entry.pet_id,
        user_id = %user.user_id,
        "Diary entry added"
    );
    Ok(Json(entry))
}

/// All entries for a pet, oldest first.
async fn list_entries(
    State(state): State<Arc<AppState>>,
    Path(pet_id): Path<String>,
) -> Result<Json<Vec<DiaryEntry>>> {
    let entries = state.db.list_diary_entries(&pet_id).await?;
    Ok(Json(entries))
}

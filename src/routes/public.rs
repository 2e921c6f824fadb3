// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public pet card, readable without logging in.

use crate::error::Result;
use crate::services::card::{render_pet_card, CARD_CSP};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/public/pet/{pet_id}", get(pet_card))
        .route("/api/public/pet/{pet_id}", get(pet_card))
}

/// Anyone holding the pet id can read its card; unknown ids get a
/// placeholder rather than an error.
async fn pet_card(
    State(state): State<Arc<AppState>>,
    Path(pet_id): Path<String>,
) -> Result<impl IntoResponse> {
    let pet = state.db.get_pet(&pet_id).await?;
    let entries = state.db.list_diary_entries(&pet_id).await?;

    if pet.is_none() {
        tracing::debug!(pet_id = %pet_id, "Public card for unknown pet");
    }

    let html = render_pet_card(pet.as_ref(), &pet_id, &entries);
    Ok(([(header::CONTENT_SECURITY_POLICY, CARD_CSP)], Html(html)))
}

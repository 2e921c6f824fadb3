// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pet profiles and vaccine checklists of the authenticated owner.

use crate::db::{new_document_id, VaccineChange};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::middleware::ownership::ensure_owned;
use crate::models::{Pet, PetInput, VaccineRecord};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{patch, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use validator::Validate;

/// Pet routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/pets", axum::routing::get(list_pets).post(create_pet))
        .route("/api/pets/{pet_id}/vaccines", put(replace_vaccines))
        .route(
            "/api/pets/{pet_id}/vaccines/{vaccine_id}",
            patch(toggle_vaccine),
        )
}

async fn create_pet(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<PetInput>,
) -> Result<Json<Pet>> {
    payload.validate()?;

    let pet = Pet::new(new_document_id(), user.user_id, payload);
    state.db.insert_pet(&pet).await?;

    tracing::info!(pet_id = %pet.id, owner_id = %pet.owner_id, "Pet created");
    Ok(Json(pet))
}

async fn list_pets(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Pet>>> {
    let pets = state.db.list_pets_for_owner(&user.user_id).await?;
    Ok(Json(pets))
}

/// Overwrite the whole checklist with the request body.
async fn replace_vaccines(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(pet_id): Path<String>,
    Json(vaccines): Json<Vec<VaccineRecord>>,
) -> Result<Json<Pet>> {
    let count = vaccines.len();
    let updated = state
        .db
        .update_vaccines(&pet_id, &user.user_id, VaccineChange::Replace(vaccines))
        .await?;
    let pet = ensure_owned(updated, &user)?;

    tracing::info!(pet_id = %pet.id, count, "Vaccine checklist replaced");
    Ok(Json(pet))
}

#[derive(Debug, Deserialize)]
pub struct ToggleParams {
    #[serde(deserialize_with = "lenient_bool")]
    pub applied: bool,
}

/// Query flag accepting `true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`
/// and their single-letter forms, in any case.
fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" | "on" => Ok(true),
        "false" | "f" | "0" | "no" | "n" | "off" => Ok(false),
        _ => {
            let message = format!("invalid boolean value: {raw}");
            Err(serde::de::Error::custom(message))
        }
    }
}

/// Mark one vaccine applied or not. Unknown vaccine ids change nothing.
async fn toggle_vaccine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((pet_id, vaccine_id)): Path<(String, String)>,
    Query(params): Query<ToggleParams>,
) -> Result<Json<Pet>> {
    let change = VaccineChange::Toggle {
        vaccine_id,
        applied: params.applied,
    };
    let updated = state
        .db
        .update_vaccines(&pet_id, &user.user_id, change)
        .await?;

    Ok(Json(ensure_owned(updated, &user)?))
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Veterinary assistant endpoints backed by the LLM client.
//!
//! These are public: they touch no stored data.

use crate::error::Result;
use crate::models::VaccineRecord;
use crate::services::llm::ChatMessage;
use crate::services::triage::{
    self, chat_prompt, diagnosis_prompt, parse_vaccine_suggestions, vaccine_prompt,
    SymptomAnswers, VaccineProfile,
};
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/ai-diagnosis", post(ai_diagnosis))
        .route("/api/ai-chat", post(ai_chat))
        .route("/api/ai/vaccine-suggestions", post(vaccine_suggestions))
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DiagnosisResponse {
    pub success: bool,
    pub diagnosis: String,
    pub symptoms_analyzed: String,
}

async fn ai_diagnosis(
    State(state): State<Arc<AppState>>,
    Json(answers): Json<SymptomAnswers>,
) -> Result<Json<DiagnosisResponse>> {
    let summary = answers.summary();
    let messages = diagnosis_prompt(&answers, &summary);

    let diagnosis = state
        .llm
        .complete(&messages, triage::DIAGNOSIS_MAX_TOKENS)
        .await?;

    Ok(Json(DiagnosisResponse {
        success: true,
        diagnosis,
        symptoms_analyzed: summary,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default = "triage::default_pet_name")]
    pub pet_name: String,
    #[serde(default = "triage::default_species")]
    pub pet_species: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    pub new_message: String,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
}

/// Follow-up conversation; the client sends the full history each time.
async fn ai_chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let messages = chat_prompt(
        &request.pet_name,
        &request.pet_species,
        &request.messages,
        &request.new_message,
    );

    let response = state
        .llm
        .complete(&messages, triage::CHAT_MAX_TOKENS)
        .await?;

    Ok(Json(ChatResponse {
        success: true,
        response,
    }))
}

async fn vaccine_suggestions(
    State(state): State<Arc<AppState>>,
    Json(profile): Json<VaccineProfile>,
) -> Result<Json<Vec<VaccineRecord>>> {
    let reply = state
        .llm
        .complete(&vaccine_prompt(&profile), triage::VACCINE_MAX_TOKENS)
        .await?;

    let vaccines = parse_vaccine_suggestions(&reply)?;
    tracing::info!(
        species = %profile.species,
        count = vaccines.len(),
        "Vaccine suggestions generated"
    );

    Ok(Json(vaccines))
}

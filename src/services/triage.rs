// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Prompt building and reply parsing for the veterinary assistant.
//!
//! Nothing here talks to the network; [`crate::services::llm::LlmClient`]
//! sends what these functions build.

use crate::error::AppError;
use crate::models::{VaccinePriority, VaccineRecord};
use crate::services::llm::ChatMessage;
use serde::Deserialize;

pub const DIAGNOSIS_MAX_TOKENS: u32 = 800;
pub const CHAT_MAX_TOKENS: u32 = 600;
pub const VACCINE_MAX_TOKENS: u32 = 1200;

const NO_SYMPTOMS: &str = "no significant symptoms";

/// Answer to one triage question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Yes,
    No,
    Maybe,
}

/// Quick health check answers.
///
/// `energy_level` asks whether the pet is quieter than usual, so "yes" is the
/// worrying answer there while "no" is the worrying answer for eating.
#[derive(Debug, Clone, Deserialize)]
pub struct SymptomAnswers {
    pub eating_normally: Answer,
    pub energy_level: Answer,
    pub vomit_diarrhea: Answer,
    pub pain_signs: Answer,
    #[serde(default = "default_pet_name")]
    pub pet_name: String,
    #[serde(default = "default_species")]
    pub pet_species: String,
    #[serde(default)]
    pub additional_info: String,
}

pub(crate) fn default_pet_name() -> String {
    "your pet".to_string()
}

pub(crate) fn default_species() -> String {
    "animal".to_string()
}

impl SymptomAnswers {
    /// Comma-separated list of reported symptoms.
    pub fn summary(&self) -> String {
        let mut symptoms = Vec::new();

        match self.eating_normally {
            Answer::No => symptoms.push("is not eating"),
            Answer::Maybe => symptoms.push("is eating less than usual"),
            Answer::Yes => {}
        }
        match self.energy_level {
            Answer::Yes => symptoms.push("is quieter or more lethargic than usual"),
            Answer::Maybe => symptoms.push("shows a slight drop in energy"),
            Answer::No => {}
        }
        match self.vomit_diarrhea {
            Answer::Yes => symptoms.push("had vomiting or diarrhea in the last 24h"),
            Answer::Maybe => symptoms.push("had mild gastrointestinal discomfort"),
            Answer::No => {}
        }
        match self.pain_signs {
            Answer::Yes => symptoms.push("shows signs of pain (limping, sensitivity, whimpering)"),
            Answer::Maybe => symptoms.push("shows mild discomfort"),
            Answer::No => {}
        }

        if symptoms.is_empty() {
            NO_SYMPTOMS.to_string()
        } else {
            symptoms.join(", ")
        }
    }
}

/// Messages for a one-shot diagnosis of `answers`, given their `summary`.
pub fn diagnosis_prompt(answers: &SymptomAnswers, summary: &str) -> Vec<ChatMessage> {
    let mut prompt = format!(
        "You are an experienced veterinary assistant. \
         Analyze the following symptoms of {} ({}):\n\n\
         Reported symptoms: {}\n",
        answers.pet_name, answers.pet_species, summary
    );
    if !answers.additional_info.trim().is_empty() {
        prompt.push_str(&format!(
            "\nAdditional information: {}\n",
            answers.additional_info
        ));
    }
    prompt.push_str(
        "\nPlease provide:\n\
         1. An urgency assessment (Low, Medium or High)\n\
         2. Possible causes of the symptoms\n\
         3. Care recommendations\n\
         4. When to see a veterinarian\n\n\
         Be clear, objective and empathetic. Always remind the owner that this is an initial \
         guide and does not replace an in-person veterinary visit.",
    );

    vec![
        ChatMessage::system(
            "You are a virtual veterinary assistant helping owners assess their pets' health. \
             Be clear and empathetic, and recommend veterinary care when appropriate.",
        ),
        ChatMessage::user(prompt),
    ]
}

/// System prompt, prior turns, then the new question.
pub fn chat_prompt(
    pet_name: &str,
    pet_species: &str,
    history: &[ChatMessage],
    new_message: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(format!(
        "You are a specialized virtual veterinary assistant helping the owner of {}, a {}. \
         Be clear and empathetic, and recommend in-person veterinary care when appropriate. \
         Answer concisely.",
        pet_name, pet_species
    )));
    messages.extend(history.iter().cloned());
    messages.push(ChatMessage::user(new_message));
    messages
}

/// Pet details used to tailor vaccine suggestions.
#[derive(Debug, Clone, Deserialize)]
pub struct VaccineProfile {
    pub species: String,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub birthdate: Option<String>,
}

pub fn vaccine_prompt(profile: &VaccineProfile) -> Vec<ChatMessage> {
    let mut details = format!("Species: {}", profile.species);
    if let Some(breed) = profile.breed.as_deref().filter(|b| !b.is_empty()) {
        details.push_str(&format!("\nBreed: {breed}"));
    }
    if let Some(age) = profile.age {
        details.push_str(&format!("\nAge: {age} years"));
    }
    if let Some(birthdate) = profile.birthdate.as_deref().filter(|b| !b.is_empty()) {
        details.push_str(&format!("\nBirthdate: {birthdate}"));
    }

    vec![
        ChatMessage::system(
            "You are a veterinary assistant. Reply with a JSON array only, no prose.",
        ),
        ChatMessage::user(format!(
            "Suggest a vaccination checklist for this pet.\n\n{details}\n\n\
             Return a JSON array where each item has the fields \"id\" (short slug), \"name\", \
             \"description\", \"ageRecommendation\", \"frequency\" and \"priority\" \
             (\"essential\" or \"recommended\")."
        )),
    ]
}

/// Vaccine as produced by the model; every field may be missing.
#[derive(Debug, Deserialize)]
struct SuggestedVaccine {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default, rename = "ageRecommendation", alias = "age_recommendation")]
    age_recommendation: String,
    #[serde(default)]
    frequency: String,
    #[serde(default)]
    priority: String,
}

/// Parse the outermost JSON array in `reply` into unapplied checklist items.
///
/// Models often wrap the array in prose or a code fence, so everything before
/// the first `[` and after the last `]` is ignored. Items without a name are
/// dropped; a missing id gets a random one.
pub fn parse_vaccine_suggestions(reply: &str) -> Result<Vec<VaccineRecord>, AppError> {
    let unparsable = || {
        AppError::UpstreamService(
            "Could not parse vaccine suggestions from LLM reply".to_string(),
        )
    };

    let start = reply.find('[').ok_or_else(unparsable)?;
    let end = reply.rfind(']').ok_or_else(unparsable)?;
    if end < start {
        return Err(unparsable());
    }

    let suggested: Vec<SuggestedVaccine> = serde_json::from_str(&reply[start..=end]).map_err(|e| {
        tracing::debug!(error = %e, "Vaccine suggestion JSON rejected");
        unparsable()
    })?;

    Ok(suggested
        .into_iter()
        .filter(|v| !v.name.trim().is_empty())
        .map(|v| VaccineRecord {
            id: v
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string()),
            name: v.name,
            description: v.description,
            age_recommendation: v.age_recommendation,
            frequency: v.frequency,
            priority: if v.priority.eq_ignore_ascii_case("essential") {
                VaccinePriority::Essential
            } else {
                VaccinePriority::Recommended
            },
            applied: false,
        })
        .collect())
}

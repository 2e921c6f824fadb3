// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Symptom diary entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Diary entry stored in the `diary` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DiaryEntry {
    /// Document ID
    pub id: String,
    /// Pet this entry is about. Not checked against the writer's pets.
    pub pet_id: String,
    /// When the observation was made
    #[serde(with = "crate::time_utils::sortable_timestamp")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date: DateTime<Utc>,
    /// "high", "mid" or "low" by convention
    pub appetite: String,
    /// "high", "mid" or "low" by convention
    pub energy: String,
    #[serde(default)]
    pub symptom_photo: Option<String>,
    #[serde(default)]
    pub medication: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

impl DiaryEntry {
    pub fn new(id: String, input: DiaryEntryInput) -> Self {
        Self {
            id,
            pet_id: input.pet_id,
            date: input.date,
            appetite: input.appetite,
            energy: input.energy,
            symptom_photo: input.symptom_photo,
            medication: input.medication,
            notes: input.notes,
        }
    }

    /// Mean of the appetite and energy scores, 0.0..=3.0.
    pub fn wellbeing_index(&self) -> f64 {
        f64::from(level_score(&self.appetite) + level_score(&self.energy)) / 2.0
    }
}

/// Client-supplied diary fields.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DiaryEntryInput {
    #[validate(length(min = 1, max = 64))]
    pub pet_id: String,
    #[serde(with = "crate::time_utils::sortable_timestamp")]
    pub date: DateTime<Utc>,
    #[validate(length(min = 1, max = 32))]
    pub appetite: String,
    #[validate(length(min = 1, max = 32))]
    pub energy: String,
    #[validate(length(max = 300))]
    pub symptom_photo: Option<String>,
    #[serde(default)]
    pub medication: bool,
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
}

/// Score of an appetite/energy level; unknown levels count as 0.
pub fn level_score(level: &str) -> u8 {
    match level {
        "high" => 3,
        "mid" => 2,
        "low" => 1,
        _ => 0,
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pet profile and its embedded vaccine checklist.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Pet document stored in the `pets` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Pet {
    /// Document ID
    pub id: String,
    /// Owning user ID. Set at creation, never changed.
    pub owner_id: String,
    pub name: String,
    pub species: String,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub birthdate: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub allergies: Option<String>,
    /// Upload path of the profile photo (`/static/...`)
    #[serde(default)]
    pub photo: Option<String>,
    /// Vaccine checklist, in the order the client supplied it
    #[serde(default)]
    pub vaccines: Vec<VaccineRecord>,
}

impl Pet {
    /// Build a new pet owned by `owner_id` with an empty checklist.
    pub fn new(id: String, owner_id: String, input: PetInput) -> Self {
        Self {
            id,
            owner_id,
            name: input.name,
            species: input.species,
            breed: input.breed,
            age: input.age,
            birthdate: input.birthdate,
            weight: input.weight,
            allergies: input.allergies,
            photo: input.photo,
            vaccines: Vec::new(),
        }
    }

    /// Set `applied` on the first vaccine whose id matches.
    ///
    /// Returns `false` and leaves the list untouched when no vaccine matches;
    /// callers treat that as success.
    pub fn toggle_vaccine(&mut self, vaccine_id: &str, applied: bool) -> bool {
        match self.vaccines.iter_mut().find(|v| v.id == vaccine_id) {
            Some(vaccine) => {
                vaccine.applied = applied;
                true
            }
            None => false,
        }
    }
}

/// Client-supplied pet fields.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PetInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub species: String,
    #[validate(length(max = 100))]
    pub breed: Option<String>,
    #[validate(range(max = 100))]
    pub age: Option<u32>,
    #[validate(length(max = 32))]
    pub birthdate: Option<String>,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub weight: Option<f64>,
    #[validate(length(max = 500))]
    pub allergies: Option<String>,
    #[validate(length(max = 300))]
    pub photo: Option<String>,
}

/// How strongly a vaccine is recommended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum VaccinePriority {
    Essential,
    Recommended,
}

/// One checklist item embedded in a [`Pet`].
///
/// `id` comes from the client and is only unique within its pet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct VaccineRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "ageRecommendation")]
    pub age_recommendation: String,
    pub frequency: String,
    pub priority: VaccinePriority,
    #[serde(default)]
    pub applied: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vaccine(id: &str) -> VaccineRecord {
        VaccineRecord {
            id: id.to_string(),
            name: format!("Vaccine {id}"),
            description: "test".to_string(),
            age_recommendation: "8 weeks".to_string(),
            frequency: "yearly".to_string(),
            priority: VaccinePriority::Essential,
            applied: false,
        }
    }

    fn pet_with(vaccines: Vec<VaccineRecord>) -> Pet {
        Pet {
            id: "p1".to_string(),
            owner_id: "u1".to_string(),
            name: "Rex".to_string(),
            species: "dog".to_string(),
            breed: None,
            age: None,
            birthdate: None,
            weight: None,
            allergies: None,
            photo: None,
            vaccines,
        }
    }

    #[test]
    fn test_toggle_vaccine_sets_applied() {
        let mut pet = pet_with(vec![vaccine("v1"), vaccine("v2")]);

        assert!(pet.toggle_vaccine("v2", true));
        assert!(!pet.vaccines[0].applied);
        assert!(pet.vaccines[1].applied);

        assert!(pet.toggle_vaccine("v2", false));
        assert!(!pet.vaccines[1].applied);
    }

    #[test]
    fn test_toggle_unknown_vaccine_is_noop() {
        let mut pet = pet_with(vec![vaccine("v1")]);
        let before = pet.vaccines.clone();

        assert!(!pet.toggle_vaccine("missing", true));
        assert_eq!(pet.vaccines, before);
    }

    #[test]
    fn test_toggle_only_first_duplicate() {
        let mut pet = pet_with(vec![vaccine("dup"), vaccine("dup")]);

        pet.toggle_vaccine("dup", true);

        assert!(pet.vaccines[0].applied);
        assert!(!pet.vaccines[1].applied);
    }

    #[test]
    fn test_vaccine_wire_format() {
        let json = serde_json::json!({
            "id": "v1",
            "name": "Rabies",
            "description": "Required by law",
            "ageRecommendation": "12 weeks",
            "frequency": "yearly",
            "priority": "recommended"
        });

        let record: VaccineRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.age_recommendation, "12 weeks");
        assert_eq!(record.priority, VaccinePriority::Recommended);
        assert!(!record.applied, "applied defaults to false");

        let out = serde_json::to_value(&record).unwrap();
        assert_eq!(out["ageRecommendation"], "12 weeks");
        assert_eq!(out["priority"], "recommended");
    }

    #[test]
    fn test_unknown_priority_rejected() {
        let json = serde_json::json!({
            "id": "v1",
            "name": "Rabies",
            "description": "",
            "ageRecommendation": "",
            "frequency": "",
            "priority": "optional"
        });

        assert!(serde_json::from_value::<VaccineRecord>(json).is_err());
    }
}

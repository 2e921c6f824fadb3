// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running, with
//! FIRESTORE_EMULATOR_HOST pointing at it. They are skipped otherwise.

use chrono::TimeZone;
use petid_api::db::{new_document_id, VaccineChange};
use petid_api::models::{DiaryEntry, Pet, User, VaccinePriority, VaccineRecord};

mod common;
use common::test_db;

fn test_pet(owner_id: &str) -> Pet {
    Pet {
        id: new_document_id(),
        owner_id: owner_id.to_string(),
        name: "Rex".to_string(),
        species: "dog".to_string(),
        breed: Some("Mutt".to_string()),
        age: Some(3),
        birthdate: None,
        weight: Some(12.0),
        allergies: None,
        photo: None,
        vaccines: vec![VaccineRecord {
            id: "v8".to_string(),
            name: "V8".to_string(),
            description: "Polyvalent".to_string(),
            age_recommendation: "6 weeks".to_string(),
            frequency: "yearly".to_string(),
            priority: VaccinePriority::Essential,
            applied: false,
        }],
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// USER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_user_create_and_lookup() {
    require_emulator!();

    let db = test_db().await;
    let email = format!("{}@example.com", new_document_id());

    assert!(db.find_user_by_email(&email).await.unwrap().is_none());

    let user = User {
        id: new_document_id(),
        email: email.clone(),
        password_hash: "$argon2id$fake".to_string(),
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    db.create_user(&user).await.unwrap();

    let found = db
        .find_user_by_email(&email.to_uppercase())
        .await
        .unwrap()
        .expect("User should be found case-insensitively");
    assert_eq!(found.id, user.id);

    let again = User {
        id: new_document_id(),
        ..user
    };
    assert!(db.create_user(&again).await.is_err());
}

#[tokio::test]
async fn test_concurrent_registrations_for_one_email() {
    require_emulator!();

    let db = test_db().await;
    let email = format!("{}@example.com", new_document_id());
    let make_user = || User {
        id: new_document_id(),
        email: email.clone(),
        password_hash: "$argon2id$fake".to_string(),
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    let (first, second) = (make_user(), make_user());

    let (a, b) = tokio::join!(db.create_user(&first), db.create_user(&second));
    assert_eq!(
        [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(),
        1,
        "Exactly one registration should win: {:?} / {:?}",
        a,
        b
    );

    let winner = if a.is_ok() { &first } else { &second };
    let found = db.find_user_by_email(&email).await.unwrap().unwrap();
    assert_eq!(found.id, winner.id);
}

// ═══════════════════════════════════════════════════════════════════════════
// PET TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_vaccine_toggle_in_transaction() {
    require_emulator!();

    let db = test_db().await;
    let owner = new_document_id();
    let pet = test_pet(&owner);
    db.insert_pet(&pet).await.unwrap();

    let change = VaccineChange::Toggle {
        vaccine_id: "v8".to_string(),
        applied: true,
    };

    // Wrong owner leaves the document untouched
    let denied = db
        .update_vaccines(&pet.id, "someone-else", change.clone())
        .await
        .unwrap();
    assert!(denied.is_none());

    let updated = db
        .update_vaccines(&pet.id, &owner, change)
        .await
        .unwrap()
        .expect("Owner should be able to toggle");
    assert!(updated.vaccines[0].applied);

    let stored = db.get_pet(&pet.id).await.unwrap().unwrap();
    assert!(stored.vaccines[0].applied);
    assert_eq!(stored.name, "Rex");

    let listed = db.list_pets_for_owner(&owner).await.unwrap();
    assert_eq!(listed.len(), 1);
}

// ═══════════════════════════════════════════════════════════════════════════
// DIARY TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_diary_sorted_by_date() {
    require_emulator!();

    let db = test_db().await;
    let pet_id = new_document_id();

    for (day, notes) in [(2, "second"), (1, "first")] {
        let entry = DiaryEntry {
            id: new_document_id(),
            pet_id: pet_id.clone(),
            date: chrono::Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap(),
            appetite: "high".to_string(),
            energy: "mid".to_string(),
            symptom_photo: None,
            medication: false,
            notes: Some(notes.to_string()),
        };
        db.insert_diary_entry(&entry).await.unwrap();
    }

    let entries = db.list_diary_entries(&pet_id).await.unwrap();
    let notes: Vec<_> = entries.iter().map(|e| e.notes.as_deref().unwrap()).collect();
    assert_eq!(notes, ["first", "second"]);
}

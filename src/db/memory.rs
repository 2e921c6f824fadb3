// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process document store.
//!
//! Used for local development (`DATABASE_BACKEND=memory`) and tests. Each
//! collection is a `DashMap` keyed by document id; a per-entry write lock
//! makes single-document updates atomic, matching what the Firestore backend
//! gets from transactions.

use crate::db::VaccineChange;
use crate::error::AppError;
use crate::middleware::ownership::OwnerScoped;
use crate::models::user::normalize_email;
use crate::models::{DiaryEntry, Pet, User};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct Collections {
    users: DashMap<String, User>,
    /// normalized email -> user id
    emails: DashMap<String, String>,
    pets: DashMap<String, Pet>,
    /// entry id -> (insertion sequence, entry)
    diary: DashMap<String, (u64, DiaryEntry)>,
    diary_seq: AtomicU64,
}

/// In-memory database handle. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryDb {
    inner: Arc<Collections>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── User Operations ─────────────────────────────────────────

    pub fn create_user(&self, user: &User) -> Result<(), AppError> {
        match self.inner.emails.entry(normalize_email(&user.email)) {
            Entry::Occupied(_) => Err(AppError::BadRequest("Email already registered".to_string())),
            Entry::Vacant(slot) => {
                self.inner.users.insert(user.id.clone(), user.clone());
                slot.insert(user.id.clone());
                Ok(())
            }
        }
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        let key = normalize_email(email);
        let user_id = self.inner.emails.get(&key)?.value().clone();
        self.inner.users.get(&user_id).map(|u| u.value().clone())
    }

    // ─── Pet Operations ──────────────────────────────────────────

    pub fn insert_pet(&self, pet: &Pet) {
        self.inner.pets.insert(pet.id.clone(), pet.clone());
    }

    pub fn get_pet(&self, pet_id: &str) -> Option<Pet> {
        self.inner.pets.get(pet_id).map(|p| p.value().clone())
    }

    pub fn list_pets_for_owner(&self, owner_id: &str) -> Vec<Pet> {
        self.inner
            .pets
            .iter()
            .filter(|p| p.owner_id() == owner_id)
            .map(|p| p.value().clone())
            .collect()
    }

    /// Apply the change under the pet's entry lock.
    pub fn update_vaccines(
        &self,
        pet_id: &str,
        owner_id: &str,
        change: &VaccineChange,
    ) -> Option<Pet> {
        let mut pet = self.inner.pets.get_mut(pet_id)?;
        if pet.owner_id() != owner_id {
            return None;
        }
        change.apply(&mut pet);
        Some(pet.clone())
    }

    // ─── Diary Operations ────────────────────────────────────────

    pub fn insert_diary_entry(&self, entry: &DiaryEntry) {
        let seq = self.inner.diary_seq.fetch_add(1, Ordering::Relaxed);
        self.inner
            .diary
            .insert(entry.id.clone(), (seq, entry.clone()));
    }

    /// Entries for a pet by date, then insertion order.
    pub fn list_diary_entries(&self, pet_id: &str) -> Vec<DiaryEntry> {
        let mut entries: Vec<(u64, DiaryEntry)> = self
            .inner
            .diary
            .iter()
            .filter(|e| e.value().1.pet_id == pet_id)
            .map(|e| e.value().clone())
            .collect();

        entries.sort_by(|(seq_a, a), (seq_b, b)| a.date.cmp(&b.date).then(seq_a.cmp(seq_b)));
        entries.into_iter().map(|(_, entry)| entry).collect()
    }
}

//! Database layer.
//!
//! [`Database`] is the handle the rest of the crate talks to. It is built once
//! at startup and cloned into request handlers; each variant is cheap to
//! clone and shares its underlying connection or maps.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::config::{Config, DatabaseBackend};
use crate::error::AppError;
use crate::models::{DiaryEntry, Pet, User, VaccineRecord};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Email claims, keyed by normalized email.
    pub const USER_EMAILS: &str = "user_emails";
    pub const PETS: &str = "pets";
    pub const DIARY: &str = "diary";
}

/// A single-document change to a pet's vaccine checklist.
#[derive(Debug, Clone)]
pub enum VaccineChange {
    /// Overwrite the whole list.
    Replace(Vec<VaccineRecord>),
    /// Set `applied` on the first vaccine with this id; no-op if absent.
    Toggle { vaccine_id: String, applied: bool },
}

impl VaccineChange {
    pub fn apply(&self, pet: &mut Pet) {
        match self {
            VaccineChange::Replace(vaccines) => pet.vaccines = vaccines.clone(),
            VaccineChange::Toggle {
                vaccine_id,
                applied,
            } => {
                if !pet.toggle_vaccine(vaccine_id, *applied) {
                    tracing::debug!(
                        pet_id = %pet.id,
                        vaccine_id = %vaccine_id,
                        "Vaccine not in checklist, leaving list unchanged"
                    );
                }
            }
        }
    }
}

/// Document store handle.
#[derive(Clone)]
pub enum Database {
    Firestore(FirestoreDb),
    Memory(MemoryDb),
}

impl Database {
    /// Connect to the backend selected in the config.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        match config.database_backend {
            DatabaseBackend::Firestore => Ok(Self::Firestore(
                FirestoreDb::new(&config.gcp_project_id).await?,
            )),
            DatabaseBackend::Memory => {
                tracing::warn!("Using in-memory database, data will not survive a restart");
                Ok(Self::Memory(MemoryDb::new()))
            }
        }
    }

    // ─── Users ───────────────────────────────────────────────────

    /// Store a new user. Fails with `BadRequest` if the email is taken.
    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        match self {
            Self::Firestore(db) => db.create_user(user).await,
            Self::Memory(db) => db.create_user(user),
        }
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        match self {
            Self::Firestore(db) => db.find_user_by_email(email).await,
            Self::Memory(db) => Ok(db.find_user_by_email(email)),
        }
    }

    // ─── Pets ────────────────────────────────────────────────────

    pub async fn insert_pet(&self, pet: &Pet) -> Result<(), AppError> {
        match self {
            Self::Firestore(db) => db.insert_pet(pet).await,
            Self::Memory(db) => {
                db.insert_pet(pet);
                Ok(())
            }
        }
    }

    /// Get a pet by id regardless of owner.
    pub async fn get_pet(&self, pet_id: &str) -> Result<Option<Pet>, AppError> {
        match self {
            Self::Firestore(db) => db.get_pet(pet_id).await,
            Self::Memory(db) => Ok(db.get_pet(pet_id)),
        }
    }

    /// All pets owned by `owner_id`.
    pub async fn list_pets_for_owner(&self, owner_id: &str) -> Result<Vec<Pet>, AppError> {
        match self {
            Self::Firestore(db) => db.list_pets_for_owner(owner_id).await,
            Self::Memory(db) => Ok(db.list_pets_for_owner(owner_id)),
        }
    }

    /// Atomically apply `change` to the pet if `owner_id` owns it.
    ///
    /// Returns the updated pet, or `None` when the pet is missing or owned by
    /// someone else.
    pub async fn update_vaccines(
        &self,
        pet_id: &str,
        owner_id: &str,
        change: VaccineChange,
    ) -> Result<Option<Pet>, AppError> {
        match self {
            Self::Firestore(db) => db.update_vaccines(pet_id, owner_id, change).await,
            Self::Memory(db) => Ok(db.update_vaccines(pet_id, owner_id, &change)),
        }
    }

    // ─── Diary ───────────────────────────────────────────────────

    pub async fn insert_diary_entry(&self, entry: &DiaryEntry) -> Result<(), AppError> {
        match self {
            Self::Firestore(db) => db.insert_diary_entry(entry).await,
            Self::Memory(db) => {
                db.insert_diary_entry(entry);
                Ok(())
            }
        }
    }

    /// Entries for a pet, oldest first.
    pub async fn list_diary_entries(&self, pet_id: &str) -> Result<Vec<DiaryEntry>, AppError> {
        match self {
            Self::Firestore(db) => db.list_diary_entries(pet_id).await,
            Self::Memory(db) => Ok(db.list_diary_entries(pet_id)),
        }
    }
}

/// Fresh opaque document id.
pub fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

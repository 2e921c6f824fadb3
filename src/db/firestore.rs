// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (accounts, looked up by email)
//! - Pets (profiles with an embedded vaccine checklist)
//! - Diary (symptom entries, queried per pet)

use crate::db::{collections, VaccineChange};
use crate::error::AppError;
use crate::middleware::ownership::owned_by;
use crate::models::user::normalize_email;
use crate::models::{DiaryEntry, Pet, User};
use firestore::FirestoreWritePrecondition;
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};

/// Claim on a normalized email, stored under an id derived from the email.
/// Registration creates it in the same transaction as the user document.
#[derive(Debug, Serialize, Deserialize)]
struct EmailClaim {
    user_id: String,
}

/// Document id for an email claim. Firestore ids cannot contain `/`.
fn email_claim_id(email: &str) -> String {
    normalize_email(email)
        .replace('%', "%25")
        .replace('/', "%2F")
}

/// Whether Firestore accepts `id` as a document id.
///
/// Ids that fail this check cannot name a stored document, so lookups treat
/// them as missing instead of sending a request Firestore will reject.
pub(crate) fn is_valid_document_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 1500
        && !id.contains('/')
        && id != "."
        && id != ".."
        && !(id.len() >= 4 && id.starts_with("__") && id.ends_with("__"))
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // The emulator rejects real credentials, so skip the credential lookup.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Store a new user, rejecting an already registered email.
    ///
    /// The email claim is read and both documents are written in one
    /// transaction, so of two simultaneous registrations for one address
    /// exactly one commits.
    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let client = self.get_client()?;
        let claim_id = email_claim_id(&user.email);

        let created = client
            .run_transaction(|db, transaction| {
                let claim_id = claim_id.clone();
                let user = user.clone();

                async move {
                    let existing: Option<EmailClaim> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::USER_EMAILS)
                        .obj()
                        .one(&claim_id)
                        .await?;

                    if existing.is_some() {
                        return Ok(false);
                    }

                    let claim = EmailClaim {
                        user_id: user.id.clone(),
                    };

                    db.fluent()
                        .update()
                        .in_col(collections::USER_EMAILS)
                        .precondition(FirestoreWritePrecondition::Exists(false))
                        .document_id(&claim_id)
                        .object(&claim)
                        .add_to_transaction(transaction)?;

                    db.fluent()
                        .update()
                        .in_col(collections::USERS)
                        .precondition(FirestoreWritePrecondition::Exists(false))
                        .document_id(&user.id)
                        .object(&user)
                        .add_to_transaction(transaction)?;

                    Ok(true)
                }
                .boxed()
            })
            .await
            .map_err(|e| AppError::Database(format!("User create transaction failed: {}", e)))?;

        if !created {
            return Err(AppError::BadRequest("Email already registered".to_string()));
        }

        tracing::debug!(user_id = %user.id, "User stored");
        Ok(())
    }

    /// Find a user by (normalized) email, through its email claim.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let client = self.get_client()?;

        let claim: Option<EmailClaim> = client
            .fluent()
            .select()
            .by_id_in(collections::USER_EMAILS)
            .obj()
            .one(&email_claim_id(email))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let Some(claim) = claim else {
            return Ok(None);
        };

        client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(&claim.user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Pet Operations ──────────────────────────────────────────

    /// Store a new pet.
    pub async fn insert_pet(&self, pet: &Pet) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::PETS)
            .document_id(&pet.id)
            .object(pet)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get a pet by document ID.
    pub async fn get_pet(&self, pet_id: &str) -> Result<Option<Pet>, AppError> {
        if !is_valid_document_id(pet_id) {
            return Ok(None);
        }

        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PETS)
            .obj()
            .one(pet_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all pets belonging to a user.
    pub async fn list_pets_for_owner(&self, owner_id: &str) -> Result<Vec<Pet>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::PETS)
            .filter(|q| q.for_all([q.field("owner_id").eq(owner_id)]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Apply a vaccine checklist change inside a transaction.
    ///
    /// The pet is read within the transaction, so a concurrent write to the
    /// same document makes Firestore abort and retry this one with fresh
    /// data. Only the `vaccines` field is written.
    pub async fn update_vaccines(
        &self,
        pet_id: &str,
        owner_id: &str,
        change: VaccineChange,
    ) -> Result<Option<Pet>, AppError> {
        if !is_valid_document_id(pet_id) {
            return Ok(None);
        }

        let client = self.get_client()?;

        let updated = client
            .run_transaction(|db, transaction| {
                let pet_id = pet_id.to_string();
                let owner_id = owner_id.to_string();
                let change = change.clone();

                async move {
                    let current: Option<Pet> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::PETS)
                        .obj()
                        .one(&pet_id)
                        .await?;

                    let Some(mut pet) = owned_by(current, &owner_id) else {
                        return Ok(None);
                    };

                    change.apply(&mut pet);

                    db.fluent()
                        .update()
                        .fields(["vaccines"])
                        .in_col(collections::PETS)
                        .document_id(&pet_id)
                        .object(&pet)
                        .add_to_transaction(transaction)?;

                    Ok(Some(pet))
                }
                .boxed()
            })
            .await
            .map_err(|e| AppError::Database(format!("Vaccine update transaction failed: {}", e)))?;

        if updated.is_some() {
            tracing::debug!(pet_id, "Vaccine checklist updated");
        }

        Ok(updated)
    }

    // ─── Diary Operations ────────────────────────────────────────

    /// Store a diary entry.
    pub async fn insert_diary_entry(&self, entry: &DiaryEntry) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::DIARY)
            .document_id(&entry.id)
            .object(entry)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get all entries for a pet, oldest first.
    ///
    /// Requires a composite index on (`pet_id`, `date`).
    pub async fn list_diary_entries(&self, pet_id: &str) -> Result<Vec<DiaryEntry>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::DIARY)
            .filter(|q| q.for_all([q.field("pet_id").eq(pet_id)]))
            // Dates are stored fixed-width, so string order is time order
            .order_by([("date", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

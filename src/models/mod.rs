// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod diary;
pub mod pet;
pub mod user;

pub use diary::{DiaryEntry, DiaryEntryInput};
pub use pet::{Pet, PetInput, VaccinePriority, VaccineRecord};
pub use user::User;

//! Child profile domain records.
//!
//! # Responsibility
//! - Define the canonical profile shape persisted by the store.
//! - Keep wire-compatible JSON field names for data already on devices.
//!
//! # Invariants
//! - `id` is assigned once at creation time and never reassigned.
//! - Field constraints (see [`crate::model::form`]) hold for every
//!   persisted record; write paths re-check them via `check_invariants`.

use crate::model::form::{self, ValidationErrors};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a stored child profile.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ProfileId = Uuid;

/// Canonical child profile record as held in the persisted list.
///
/// Serialized field names match the historical on-device JSON format
/// (`fullName`, `medicalNotes`, ...), so records written by earlier app
/// versions decode without translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildProfile {
    /// Stable unique ID assigned by the store at creation time.
    pub id: ProfileId,
    /// Child's display name, trimmed, at least 2 characters.
    pub full_name: String,
    /// Age in years; integral or decimal, within [0, 18].
    pub age: f64,
    /// Height in centimeters, within [30, 250].
    pub height: f64,
    /// Weight in kilograms, at least 2.
    pub weight: f64,
    /// Optional free-text gender.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Optional free-text medical notes, at most 300 characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_notes: Option<String>,
}

impl ChildProfile {
    /// Builds a stored record from a validated draft and an assigned ID.
    pub fn from_draft(id: ProfileId, draft: ProfileDraft) -> Self {
        Self {
            id,
            full_name: draft.full_name,
            age: draft.age,
            height: draft.height,
            weight: draft.weight,
            gender: draft.gender,
            medical_notes: draft.medical_notes,
        }
    }

    /// Re-checks field constraints on a record read back from storage.
    pub fn check_invariants(&self) -> Result<(), ValidationErrors> {
        ProfileDraft::from_profile(self).check_invariants()
    }
}

/// A profile record without an identifier.
///
/// This is the validator's output, the store's input for create/update,
/// and the decode target for the legacy single-profile storage slot
/// (which predates IDs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDraft {
    pub full_name: String,
    pub age: f64,
    pub height: f64,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_notes: Option<String>,
}

impl ProfileDraft {
    /// Projects a stored record back to its id-less draft shape.
    pub fn from_profile(profile: &ChildProfile) -> Self {
        Self {
            full_name: profile.full_name.clone(),
            age: profile.age,
            height: profile.height,
            weight: profile.weight,
            gender: profile.gender.clone(),
            medical_notes: profile.medical_notes.clone(),
        }
    }

    /// Checks every field constraint on already-typed values.
    ///
    /// Store write paths call this before persisting anything, so an
    /// invalid record cannot reach storage even if a caller skips the
    /// form-level validator.
    pub fn check_invariants(&self) -> Result<(), ValidationErrors> {
        form::typed_field_errors(self).into_result()
    }
}

//! Form input validation for child profiles.
//!
//! # Responsibility
//! - Coerce raw screen input (text fields) into a typed [`ProfileDraft`].
//! - Report one message per offending field, keyed by wire field name,
//!   so screens can render inline feedback.
//!
//! # Invariants
//! - `validate` is pure: no I/O, no side effects.
//! - Validation never partially succeeds; every offending field is
//!   reported in a single pass.
//! - The typed checks used here are the same ones store write paths run
//!   via `ProfileDraft::check_invariants`.

use crate::model::profile::ProfileDraft;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Wire field names, used both as JSON keys and as error-map keys.
pub const FIELD_FULL_NAME: &str = "fullName";
pub const FIELD_AGE: &str = "age";
pub const FIELD_HEIGHT: &str = "height";
pub const FIELD_WEIGHT: &str = "weight";
pub const FIELD_MEDICAL_NOTES: &str = "medicalNotes";

pub const FULL_NAME_MIN_CHARS: usize = 2;
pub const AGE_MIN: f64 = 0.0;
pub const AGE_MAX: f64 = 18.0;
pub const HEIGHT_MIN: f64 = 30.0;
pub const HEIGHT_MAX: f64 = 250.0;
pub const WEIGHT_MIN: f64 = 2.0;
pub const MEDICAL_NOTES_MAX_CHARS: usize = 300;

/// Raw screen input before coercion.
///
/// Numeric fields arrive as text exactly as typed; empty strings stand
/// for absent optional fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub full_name: String,
    pub age: String,
    pub height: String,
    pub weight: String,
    pub gender: String,
    pub medical_notes: String,
}

/// Per-field validation failures, keyed by wire field name.
///
/// At most one message is kept per field; iteration order is the stable
/// lexicographic field-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns the message recorded for `field`, if any.
    pub fn message(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Iterates `(field, message)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.errors.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    pub(crate) fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    pub(crate) fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl Error for ValidationErrors {}

/// Validates raw form input and coerces it into a typed draft.
///
/// # Contract
/// - Numeric-looking text is coerced before range checks (`"7"` -> `7.0`).
/// - `gender` and `medicalNotes` are optional; absent or blank is valid.
/// - All offending fields are reported together; a draft is only
///   produced when no field fails.
pub fn validate(form: &ProfileForm) -> Result<ProfileDraft, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let full_name = form.full_name.trim().to_string();
    if let Some(message) = full_name_error(&full_name) {
        errors.push(FIELD_FULL_NAME, message);
    }

    let age = numeric_field(&form.age, FIELD_AGE, age_error, &mut errors);
    let height = numeric_field(&form.height, FIELD_HEIGHT, height_error, &mut errors);
    let weight = numeric_field(&form.weight, FIELD_WEIGHT, weight_error, &mut errors);

    let gender = optional_text(&form.gender);
    let medical_notes = optional_text(&form.medical_notes);
    if let Some(notes) = medical_notes.as_deref() {
        if let Some(message) = medical_notes_error(notes) {
            errors.push(FIELD_MEDICAL_NOTES, message);
        }
    }

    let (Some(age), Some(height), Some(weight)) = (age, height, weight) else {
        return Err(errors);
    };
    errors.into_result()?;

    Ok(ProfileDraft {
        full_name,
        age,
        height,
        weight,
        gender,
        medical_notes,
    })
}

/// Runs the typed per-field checks shared by `validate` and the store's
/// pre-write invariant check.
pub(crate) fn typed_field_errors(draft: &ProfileDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    if let Some(message) = full_name_error(draft.full_name.trim()) {
        errors.push(FIELD_FULL_NAME, message);
    }
    if let Some(message) = age_error(draft.age) {
        errors.push(FIELD_AGE, message);
    }
    if let Some(message) = height_error(draft.height) {
        errors.push(FIELD_HEIGHT, message);
    }
    if let Some(message) = weight_error(draft.weight) {
        errors.push(FIELD_WEIGHT, message);
    }
    if let Some(notes) = draft.medical_notes.as_deref() {
        if let Some(message) = medical_notes_error(notes) {
            errors.push(FIELD_MEDICAL_NOTES, message);
        }
    }
    errors
}

fn numeric_field(
    raw: &str,
    field: &'static str,
    range_check: fn(f64) -> Option<&'static str>,
    errors: &mut ValidationErrors,
) -> Option<f64> {
    match raw.trim().parse::<f64>() {
        Ok(value) => {
            if let Some(message) = range_check(value) {
                errors.push(field, message);
            }
            Some(value)
        }
        Err(_) => {
            errors.push(field, "must be a number");
            None
        }
    }
}

fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn full_name_error(name: &str) -> Option<&'static str> {
    if name.chars().count() < FULL_NAME_MIN_CHARS {
        Some("must be at least 2 characters")
    } else {
        None
    }
}

fn age_error(value: f64) -> Option<&'static str> {
    if (AGE_MIN..=AGE_MAX).contains(&value) {
        None
    } else {
        Some("must be between 0 and 18")
    }
}

fn height_error(value: f64) -> Option<&'static str> {
    if (HEIGHT_MIN..=HEIGHT_MAX).contains(&value) {
        None
    } else {
        Some("must be between 30 and 250")
    }
}

fn weight_error(value: f64) -> Option<&'static str> {
    if value.is_finite() && value >= WEIGHT_MIN {
        None
    } else {
        Some("must be at least 2")
    }
}

fn medical_notes_error(notes: &str) -> Option<&'static str> {
    if notes.chars().count() > MEDICAL_NOTES_MAX_CHARS {
        Some("must be 300 characters or fewer")
    } else {
        None
    }
}

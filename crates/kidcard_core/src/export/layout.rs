//! Card field layout and artifact naming.
//!
//! # Responsibility
//! - Build the one field layout both artifacts render from, so image and
//!   document content cannot diverge.
//! - Derive sanitized artifact and album names from the profile name.
//!
//! # Invariants
//! - Absent optional fields render as fixed placeholders, never as empty
//!   sections.
//! - Sanitized names only contain `[A-Za-z0-9-_]` and at most 40 chars.

use crate::model::profile::ChildProfile;
use once_cell::sync::Lazy;
use regex::Regex;

pub const APP_NAME: &str = "KidCard";
pub const CARD_TITLE: &str = "Child Profile";
pub const NOTES_HEADING: &str = "Medical Notes";
pub const NOTES_PLACEHOLDER: &str = "None provided";
pub const GENDER_PLACEHOLDER: &str = "Not specified";

const CARD_NAME_MAX_CHARS: usize = 40;
const DEFAULT_CARD_NAME: &str = "child_profile";

static CARD_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9\-_]").expect("valid card name regex"));

/// One labeled field row on the card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRow {
    pub label: &'static str,
    pub value: String,
}

/// The static visual layout of one profile card.
///
/// Both the raster snapshot and the printable document are derived from
/// this one structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLayout {
    pub title: String,
    pub name: String,
    pub rows: Vec<CardRow>,
    pub notes: String,
}

/// Builds the card layout for a profile.
pub fn card_layout(profile: &ChildProfile) -> CardLayout {
    let gender = profile
        .gender
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(GENDER_PLACEHOLDER)
        .to_string();
    let notes = profile
        .medical_notes
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(NOTES_PLACEHOLDER)
        .to_string();

    CardLayout {
        title: CARD_TITLE.to_string(),
        name: profile.full_name.clone(),
        rows: vec![
            CardRow {
                label: "Age",
                value: format_number(profile.age),
            },
            CardRow {
                label: "Gender",
                value: gender,
            },
            CardRow {
                label: "Height",
                value: format!("{} cm", format_number(profile.height)),
            },
            CardRow {
                label: "Weight",
                value: format!("{} kg", format_number(profile.weight)),
            },
        ],
        notes,
    }
}

/// Derives the artifact base name from a profile name.
///
/// Every character outside `[A-Za-z0-9-_]` becomes `_`; the result is
/// truncated to 40 characters and falls back to a fixed default when
/// empty.
pub fn sanitized_card_name(full_name: &str) -> String {
    let replaced = CARD_NAME_RE.replace_all(full_name, "_");
    let truncated: String = replaced.chars().take(CARD_NAME_MAX_CHARS).collect();
    if truncated.is_empty() {
        DEFAULT_CARD_NAME.to_string()
    } else {
        truncated
    }
}

/// Album (collection) title grouping all artifacts for one person.
pub fn album_title(full_name: &str) -> String {
    format!("{APP_NAME} - {}", sanitized_card_name(full_name))
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Keep error semantics simple for UI integration: envelopes with an
//!   `ok` flag and a human-readable message, plus per-field errors for
//!   inline form feedback.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - One save path serves both create (no id) and update (with id).

use kidcard_core::db::open_db;
use kidcard_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    validate, BitmapCardRasterizer, ChildProfile, ExportError, ExportRenderer, FsMediaLibrary,
    Permission, ProfileForm, ProfileStore, SqliteKeyValueStore, StoreError, ValidationErrors,
};
use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const PROFILE_DB_FILE_NAME: &str = "kidcard.sqlite3";
static PROFILE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Profile card payload mirrored to Dart.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileCardDto {
    pub id: String,
    pub full_name: String,
    pub age: f64,
    pub height: f64,
    pub weight: f64,
    pub gender: Option<String>,
    pub medical_notes: Option<String>,
}

/// Raw form input exactly as typed on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFormDto {
    pub full_name: String,
    pub age: String,
    pub height: String,
    pub weight: String,
    pub gender: String,
    pub medical_notes: String,
}

/// One inline validation message for one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrorDto {
    /// Wire field name (`fullName`, `age`, ...).
    pub field: String,
    pub message: String,
}

/// List response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfilesListResponse {
    pub ok: bool,
    pub items: Vec<ProfileCardDto>,
    pub message: String,
}

/// Save response envelope for the combined create/update path.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSaveResponse {
    pub ok: bool,
    /// Stable id of the saved profile on success.
    pub id: Option<String>,
    /// Per-field validation messages for inline display.
    pub field_errors: Vec<FieldErrorDto>,
    pub message: String,
}

/// Generic single-profile response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileActionResponse {
    pub ok: bool,
    pub profile: Option<ProfileCardDto>,
    pub message: String,
}

/// Export response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportCardResponse {
    pub ok: bool,
    pub album: Option<String>,
    pub image_path: Option<String>,
    pub document_path: Option<String>,
    pub message: String,
}

/// Lists all stored profiles.
///
/// # FFI contract
/// - Sync call, DB-backed execution; runs legacy migration when due.
/// - Never panics; an empty store returns an empty list.
#[flutter_rust_bridge::frb(sync)]
pub fn profiles_list() -> ProfilesListResponse {
    match with_profile_store(|store| store.list()) {
        Ok(profiles) => {
            let items: Vec<_> = profiles.into_iter().map(to_card_dto).collect();
            let message = if items.is_empty() {
                "No profiles yet.".to_string()
            } else {
                format!("Loaded {} profile(s).", items.len())
            };
            ProfilesListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(message) => ProfilesListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("profiles_list failed: {message}"),
        },
    }
}

/// Fetches one profile to pre-populate the edit form.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; a missing id returns `ok=false` with a message.
#[flutter_rust_bridge::frb(sync)]
pub fn profile_get(id: String) -> ProfileActionResponse {
    let Some(id) = parse_profile_id(&id) else {
        return ProfileActionResponse::failure("invalid profile id");
    };
    match with_profile_store(|store| store.get_by_id(id)) {
        Ok(profile) => ProfileActionResponse {
            ok: true,
            profile: Some(to_card_dto(profile)),
            message: "Profile loaded.".to_string(),
        },
        Err(message) => ProfileActionResponse::failure(format!("profile_get failed: {message}")),
    }
}

/// Saves form input: creates when `id` is absent, updates otherwise.
///
/// # FFI contract
/// - Sync call; validation runs before any storage access.
/// - Validation failures return one message per offending field and
///   persist nothing.
#[flutter_rust_bridge::frb(sync)]
pub fn profile_save(form: ProfileFormDto, id: Option<String>) -> ProfileSaveResponse {
    let draft = match validate(&to_core_form(&form)) {
        Ok(draft) => draft,
        Err(errors) => return ProfileSaveResponse::invalid(&errors),
    };

    let target = match id {
        Some(raw) => match parse_profile_id(&raw) {
            Some(parsed) => Some(parsed),
            None => return ProfileSaveResponse::failure("invalid profile id"),
        },
        None => None,
    };

    let result = with_profile_store(|store| match target {
        Some(id) => store.update(id, &draft),
        None => store.create(&draft),
    });

    match result {
        Ok(profile) => ProfileSaveResponse {
            ok: true,
            id: Some(profile.id.to_string()),
            field_errors: Vec::new(),
            message: "Profile saved.".to_string(),
        },
        Err(message) => ProfileSaveResponse::failure(format!("profile_save failed: {message}")),
    }
}

/// Deletes one profile by id. Irreversible; the UI confirms first.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; a missing id returns `ok=false` with a message.
#[flutter_rust_bridge::frb(sync)]
pub fn profile_delete(id: String) -> ProfileActionResponse {
    let Some(id) = parse_profile_id(&id) else {
        return ProfileActionResponse::failure("invalid profile id");
    };
    match with_profile_store(|store| store.delete(id)) {
        Ok(()) => ProfileActionResponse {
            ok: true,
            profile: None,
            message: "Profile deleted.".to_string(),
        },
        Err(message) => {
            ProfileActionResponse::failure(format!("profile_delete failed: {message}"))
        }
    }
}

/// Exports one profile as a card image plus printable document.
///
/// `permission_granted` is the media-library permission state as reported
/// by the platform permission flow; prompting happens on the Dart side.
///
/// # FFI contract
/// - Sync call; may write files under `media_dir` on success.
/// - Denied permission returns a distinct, actionable message and writes
///   nothing.
#[flutter_rust_bridge::frb(sync)]
pub fn export_profile_card(
    id: String,
    media_dir: String,
    permission_granted: bool,
) -> ExportCardResponse {
    let Some(id) = parse_profile_id(&id) else {
        return ExportCardResponse::failure("invalid profile id");
    };
    let profile = match with_profile_store(|store| store.get_by_id(id)) {
        Ok(profile) => profile,
        Err(message) => {
            return ExportCardResponse::failure(format!("export_profile_card failed: {message}"))
        }
    };

    let permission = if permission_granted {
        Permission::Granted
    } else {
        Permission::Denied
    };
    let mut renderer = ExportRenderer::new(
        BitmapCardRasterizer::default(),
        FsMediaLibrary::new(PathBuf::from(media_dir), permission),
    );

    match renderer.export(&profile) {
        Ok(result) => ExportCardResponse {
            ok: true,
            album: Some(result.album),
            image_path: Some(result.image_path.display().to_string()),
            document_path: Some(result.document_path.display().to_string()),
            message: "Card exported.".to_string(),
        },
        Err(ExportError::PermissionDenied) => ExportCardResponse::failure(
            "Photo library access is denied. Allow photo access in system settings, then try again.",
        ),
        Err(err) => {
            warn!("event=card_export module=ffi status=error error={err}");
            ExportCardResponse::failure(format!("export_profile_card failed: {err}"))
        }
    }
}

impl ProfileActionResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            profile: None,
            message: message.into(),
        }
    }
}

impl ProfileSaveResponse {
    fn invalid(errors: &ValidationErrors) -> Self {
        Self {
            ok: false,
            id: None,
            field_errors: errors
                .iter()
                .map(|(field, message)| FieldErrorDto {
                    field: field.to_string(),
                    message: message.to_string(),
                })
                .collect(),
            message: "Please fix the highlighted fields.".to_string(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            field_errors: Vec::new(),
            message: message.into(),
        }
    }
}

impl ExportCardResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            album: None,
            image_path: None,
            document_path: None,
            message: message.into(),
        }
    }
}

fn to_card_dto(profile: ChildProfile) -> ProfileCardDto {
    ProfileCardDto {
        id: profile.id.to_string(),
        full_name: profile.full_name,
        age: profile.age,
        height: profile.height,
        weight: profile.weight,
        gender: profile.gender,
        medical_notes: profile.medical_notes,
    }
}

fn to_core_form(form: &ProfileFormDto) -> ProfileForm {
    ProfileForm {
        full_name: form.full_name.clone(),
        age: form.age.clone(),
        height: form.height.clone(),
        weight: form.weight.clone(),
        gender: form.gender.clone(),
        medical_notes: form.medical_notes.clone(),
    }
}

fn parse_profile_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

fn resolve_profile_db_path() -> PathBuf {
    PROFILE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("KIDCARD_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(PROFILE_DB_FILE_NAME)
        })
        .clone()
}

fn with_profile_store<T>(
    f: impl FnOnce(&ProfileStore<SqliteKeyValueStore<'_>>) -> Result<T, StoreError>,
) -> Result<T, String> {
    let db_path = resolve_profile_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("profile DB open failed: {err}"))?;
    let kv = SqliteKeyValueStore::try_new(&conn)
        .map_err(|err| format!("profile storage init failed: {err}"))?;
    let store = ProfileStore::new(kv);
    f(&store).map_err(|err| err.to_string())
}

//! Core domain logic for KidCard.
//! This crate is the single source of truth for profile invariants,
//! persistence, and card export behavior.

pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod store;

pub use export::{
    album_title, card_layout, document_html, encode_png, sanitized_card_name,
    BitmapCardRasterizer, CardExport, CardLayout, CardRasterizer, CardRow, ExportError,
    ExportRenderer, ExportResult, FsMediaLibrary, MediaLibrary, Permission,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::form::{validate, ProfileForm, ValidationErrors};
pub use model::profile::{ChildProfile, ProfileDraft, ProfileId};
pub use store::{
    KeyValueStore, KvError, KvResult, ProfileStore, SqliteKeyValueStore, StoreError, StoreResult,
    CHILDREN_LIST_KEY, LEGACY_PROFILE_KEY,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

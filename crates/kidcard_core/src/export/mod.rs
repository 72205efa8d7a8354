//! Card export: layout, artifacts, and media-library orchestration.
//!
//! # Responsibility
//! - Turn one profile into two artifacts (raster card image, printable
//!   document) derived from a single field layout.
//! - Gate every side effect behind the media-library permission check.
//!
//! # Invariants
//! - Permission denial aborts the export before anything is written.
//! - Both artifacts are composed in memory before the first save, so a
//!   render failure leaves no partial artifact behind.
//! - The export path never touches the profile store.

use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod document;
pub mod layout;
pub mod media;
pub mod raster;

pub use document::document_html;
pub use layout::{album_title, card_layout, sanitized_card_name, CardLayout, CardRow};
pub use media::{FsMediaLibrary, MediaLibrary, Permission};
pub use raster::{encode_png, BitmapCardRasterizer, CardRasterizer};

use crate::model::profile::ChildProfile;

pub type ExportResult<T> = Result<T, ExportError>;

/// Errors from card export operations.
#[derive(Debug)]
pub enum ExportError {
    /// Media-library access was refused; nothing was written.
    PermissionDenied,
    /// The raster backend failed to compose the card image.
    Raster(String),
    /// The composed image could not be encoded.
    Encode(String),
    /// The media library failed to persist an artifact.
    Media(std::io::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "media library permission denied"),
            Self::Raster(message) => write!(f, "card raster failed: {message}"),
            Self::Encode(message) => write!(f, "card image encoding failed: {message}"),
            Self::Media(err) => write!(f, "media library write failed: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Media(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Media(value)
    }
}

/// Paths of the saved artifacts for one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardExport {
    /// Album (collection) both artifacts were grouped under.
    pub album: String,
    /// Saved raster card image.
    pub image_path: PathBuf,
    /// Saved printable document.
    pub document_path: PathBuf,
}

/// Orchestrates rasterization, document generation, and media saving.
pub struct ExportRenderer<R: CardRasterizer, M: MediaLibrary> {
    rasterizer: R,
    media: M,
}

impl<R: CardRasterizer, M: MediaLibrary> ExportRenderer<R, M> {
    pub fn new(rasterizer: R, media: M) -> Self {
        Self { rasterizer, media }
    }

    /// Renders and saves both artifacts for one profile.
    ///
    /// # Contract
    /// - `PermissionDenied` is surfaced distinctly and before any write.
    /// - Artifacts for the same person land in one album, created on
    ///   first export and reused afterwards.
    pub fn export(&mut self, profile: &ChildProfile) -> ExportResult<CardExport> {
        let layout = card_layout(profile);

        match self.media.request_permission()? {
            Permission::Granted => {}
            Permission::Denied => {
                warn!("event=card_export module=export status=denied");
                return Err(ExportError::PermissionDenied);
            }
        }

        let image = self.rasterizer.rasterize(&layout)?;
        let png = encode_png(&image)?;
        let html = document_html(&layout);

        let album = album_title(&profile.full_name);
        let file_name = sanitized_card_name(&profile.full_name);
        let image_path = self.media.save_image(&album, &file_name, &png)?;
        let document_path = self.media.save_document(&album, &file_name, &html)?;

        info!("event=card_export module=export status=ok id={}", profile.id);
        Ok(CardExport {
            album,
            image_path,
            document_path,
        })
    }
}

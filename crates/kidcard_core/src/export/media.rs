//! Media library contract and filesystem implementation.
//!
//! # Responsibility
//! - Define the platform media-service seam the renderer saves through.
//! - Provide a filesystem-backed implementation where albums are
//!   directories under one root.
//!
//! # Invariants
//! - Album directories are created on first save and reused afterwards.
//! - Permission state is injected by the host; prompting the user is a
//!   platform concern outside this crate.

use crate::export::ExportResult;
use std::fs;
use std::path::{Path, PathBuf};

/// Media-library access state as reported by the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Platform media-service seam.
pub trait MediaLibrary {
    /// Reports (or acquires) media-library access for this export.
    fn request_permission(&mut self) -> ExportResult<Permission>;
    /// Saves PNG bytes into the named album, returning the stored path.
    fn save_image(&mut self, album: &str, file_name: &str, bytes: &[u8])
        -> ExportResult<PathBuf>;
    /// Saves a printable document into the named album.
    fn save_document(&mut self, album: &str, file_name: &str, html: &str)
        -> ExportResult<PathBuf>;
}

/// Filesystem-backed media library: one directory per album.
pub struct FsMediaLibrary {
    root: PathBuf,
    permission: Permission,
}

impl FsMediaLibrary {
    /// Creates a library rooted at `root` with host-reported permission.
    pub fn new(root: impl Into<PathBuf>, permission: Permission) -> Self {
        Self {
            root: root.into(),
            permission,
        }
    }

    fn album_dir(&self, album: &str) -> ExportResult<PathBuf> {
        let dir = self.root.join(album);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    fn write_file(&self, dir: &Path, file_name: &str, contents: &[u8]) -> ExportResult<PathBuf> {
        let path = dir.join(file_name);
        fs::write(&path, contents)?;
        Ok(path)
    }
}

impl MediaLibrary for FsMediaLibrary {
    fn request_permission(&mut self) -> ExportResult<Permission> {
        Ok(self.permission)
    }

    fn save_image(
        &mut self,
        album: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> ExportResult<PathBuf> {
        let dir = self.album_dir(album)?;
        self.write_file(&dir, &format!("{file_name}.png"), bytes)
    }

    fn save_document(
        &mut self,
        album: &str,
        file_name: &str,
        html: &str,
    ) -> ExportResult<PathBuf> {
        let dir = self.album_dir(album)?;
        self.write_file(&dir, &format!("{file_name}.html"), html.as_bytes())
    }
}

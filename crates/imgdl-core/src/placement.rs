//! Deterministic destination paths for fetched images.
//!
//! `base_dir / (folder_name or query slug) / image_<index>.<type_hint>`.
//! The containing folder is created on resolution; concurrent resolutions of
//! the same folder are fine because creation is create-if-absent.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::query::Query;

/// Startup failure: no usable destination exists for the run.
#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("no such directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("could not determine a default download directory")]
    NoDefaultDir,
}

/// Source of the base directory when the user gives none.
pub trait BaseDirProvider {
    fn base_dir(&self) -> Option<PathBuf>;
}

/// The user's downloads folder: `$XDG_DOWNLOAD_DIR`, else `<home>/Downloads`
/// where home is `$HOME` or `%USERPROFILE%`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DownloadsDir;

impl BaseDirProvider for DownloadsDir {
    fn base_dir(&self) -> Option<PathBuf> {
        if let Some(dir) = std::env::var_os("XDG_DOWNLOAD_DIR").filter(|d| !d.is_empty()) {
            return Some(PathBuf::from(dir));
        }
        std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .filter(|h| !h.is_empty())
            .map(|home| PathBuf::from(home).join("Downloads"))
    }
}

/// A fixed, already-resolved base directory.
#[derive(Debug, Clone)]
pub struct FixedDir(pub PathBuf);

impl BaseDirProvider for FixedDir {
    fn base_dir(&self) -> Option<PathBuf> {
        Some(self.0.clone())
    }
}

/// Resolved placement settings for one run.
#[derive(Debug, Clone)]
pub struct Placement {
    base_dir: PathBuf,
    folder_name: Option<String>,
}

impl Placement {
    /// Resolves the base directory (explicit `output_dir`, else `provider`) and
    /// checks that it is an existing directory.
    pub fn new(
        output_dir: Option<&Path>,
        folder_name: Option<String>,
        provider: &dyn BaseDirProvider,
    ) -> Result<Self, PlacementError> {
        let base_dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => provider.base_dir().ok_or(PlacementError::NoDefaultDir)?,
        };
        if !base_dir.is_dir() {
            return Err(PlacementError::NotADirectory(base_dir));
        }
        Ok(Placement {
            base_dir,
            folder_name: folder_name.filter(|n| !n.is_empty()),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Folder for a query's images (not created).
    pub fn folder_for(&self, query: &Query) -> PathBuf {
        match &self.folder_name {
            Some(name) => self.base_dir.join(name),
            None => self.base_dir.join(query.slug()),
        }
    }

    /// Returns the destination path for record `index` and creates its folder
    /// (parents included). Repeated calls with the same inputs return the same path.
    pub fn resolve(&self, query: &Query, index: usize, type_hint: &str) -> std::io::Result<PathBuf> {
        let folder = self.folder_for(query);
        std::fs::create_dir_all(&folder)?;
        Ok(folder.join(image_filename(index, type_hint)))
    }
}

/// `image_<index>.<type_hint>`; the hint is used verbatim, even when empty.
pub fn image_filename(index: usize, type_hint: &str) -> String {
    format!("image_{}.{}", index, type_hint)
}

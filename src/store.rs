//! Artifact locations: the input staging and export directories, and every
//! path derived from a logical document name.
//!
//! All methods are pure path joins; nothing here touches the filesystem
//! except [`ArtifactStore::ensure_dirs`], which the host calls once at
//! startup. Existence of individual files is the callers' concern.

use crate::error::ConvertError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Download names must be a single plain component. Anything else (path
/// separators, empty, dot-dot) could resolve outside the export root.
static DOWNLOAD_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._ -]+$").expect("valid download-name regex"));

/// Derive the logical document name from an uploaded file name: everything
/// before the first `.`.
///
/// `"report.html"` becomes `"report"`; a name without a dot is returned
/// unchanged. The logical name is the conversion job's identity, so two
/// uploads sharing a prefix overwrite each other's artifacts.
pub fn logical_name(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}

/// Resolves staged-input and exported-artifact paths against the two
/// configured directory roots.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    input_dir: PathBuf,
    export_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(input_dir: impl Into<PathBuf>, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            export_dir: export_dir.into(),
        }
    }

    /// Create both directories if they do not exist yet. Called once at
    /// process startup, never per request.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.input_dir)?;
        std::fs::create_dir_all(&self.export_dir)?;
        Ok(())
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Where the normalised HTML for this upload is staged.
    pub fn input_path(&self, file_name: &str) -> PathBuf {
        self.input_dir.join(file_name)
    }

    /// Where the engine writes the artifact for this logical name.
    pub fn export_path(&self, logical: &str) -> PathBuf {
        self.export_dir.join(format!("{logical}.doc"))
    }

    /// Resolve a requested download name inside the export directory.
    ///
    /// The name must be a single plain file-name component; `..`, `.`, and
    /// anything containing a separator are rejected before the join so the
    /// result cannot escape the export root.
    pub fn resolve_download(&self, file_name: &str) -> Result<PathBuf, ConvertError> {
        if file_name == "." || file_name == ".." || !DOWNLOAD_NAME.is_match(file_name) {
            return Err(ConvertError::InvalidFileName {
                name: file_name.to_string(),
            });
        }
        Ok(self.export_dir.join(file_name))
    }
}

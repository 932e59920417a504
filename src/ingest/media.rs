//! Supported upload kinds and their validation.

use crate::error::{IngestError, Result};
use crate::io::FileReader;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Kinds of document the converters understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// PDF documents (`.pdf`).
    Pdf,
    /// Audio recordings (`.wav`, `.mp3`).
    Audio,
    /// Images (`.png`, `.jpg`, `.jpeg`).
    Image,
}

/// Accepted file extensions, lowercase.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "wav", "mp3", "png", "jpg", "jpeg"];

impl MediaKind {
    /// Classifies a path by its extension, case-insensitively.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "wav" | "mp3" => Some(Self::Audio),
            "png" | "jpg" | "jpeg" => Some(Self::Image),
            _ => None,
        }
    }

    /// Replacement text when conversion produced nothing.
    #[must_use]
    pub const fn empty_message(self) -> &'static str {
        match self {
            Self::Pdf => "No readable text found in PDF",
            Self::Audio => "No speech detected in audio",
            Self::Image => "No text detected in image",
        }
    }

    /// Suffix of the side file holding the extracted text.
    #[must_use]
    pub const fn side_file_suffix(self) -> &'static str {
        match self {
            Self::Pdf => "_extracted.txt",
            Self::Audio => "_transcript.txt",
            Self::Image => "_ocr.txt",
        }
    }

    /// Returns the side file path for a source file, e.g. `scan.png` ->
    /// `scan_ocr.txt`.
    #[must_use]
    pub fn side_file_path(self, source: &Path) -> PathBuf {
        let stem = source
            .file_stem()
            .map_or_else(|| "document".to_string(), |s| s.to_string_lossy().to_string());
        source.with_file_name(format!("{stem}{}", self.side_file_suffix()))
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pdf => "pdf",
            Self::Audio => "audio",
            Self::Image => "image",
        };
        f.write_str(name)
    }
}

/// Checks that `path` exists, has a supported extension and fits the limit.
///
/// # Errors
///
/// Returns [`crate::error::IoError::FileNotFound`], [`IngestError::UnsupportedExtension`]
/// or [`IngestError::TooLarge`].
pub fn validate_upload(path: &Path, max_bytes: u64) -> Result<MediaKind> {
    let path_str = path.to_string_lossy().to_string();
    let kind = MediaKind::from_path(path)
        .ok_or_else(|| IngestError::UnsupportedExtension {
            path: path_str.clone(),
        })?;

    let size = FileReader::open(path)?.size();
    if size > max_bytes {
        return Err(IngestError::TooLarge {
            path: path_str,
            size,
            max: max_bytes,
        }
        .into());
    }

    Ok(kind)
}

//! Turning uploaded files into session context.
//!
//! A file is validated ([`validate_upload`]), converted to text by a
//! [`DocumentConverter`], and the text is ingested only when it is usable:
//! non-blank and not an error description. Placeholders such as
//! `No text detected in image` count as usable, so the model can report
//! that a file was empty. Conversion and ingestion are separate steps so a
//! converter may borrow the session's dispatcher.

pub mod converter;
pub mod media;

pub use converter::{DocumentConverter, ModelConverter};
pub use media::{ALLOWED_EXTENSIONS, MediaKind, validate_upload};

use crate::core::is_error_text;
use crate::dispatch::ModelTransport;
use crate::error::Result;
use crate::io::write_file;
use crate::session::Session;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Text extracted from one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Source file.
    pub path: PathBuf,
    /// Media kind of the source.
    pub kind: MediaKind,
    /// Extracted text, a placeholder when nothing was found, or an error
    /// description.
    pub text: String,
}

impl Extraction {
    /// Returns `true` if the text should enter the context.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.text.trim().is_empty() && !is_error_text(&self.text)
    }

    /// Returns `true` if conversion found nothing and the text is the kind's
    /// placeholder.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.text == self.kind.empty_message()
    }

    /// Writes extracted text next to the source file and returns its path.
    ///
    /// Placeholders and error descriptions are not written.
    ///
    /// # Errors
    ///
    /// Returns an error if the side file cannot be written.
    pub fn write_side_file(&self) -> Result<Option<PathBuf>> {
        if !self.is_usable() || self.is_placeholder() {
            return Ok(None);
        }
        let side = self.kind.side_file_path(&self.path);
        write_file(&side, &self.text)?;
        Ok(Some(side))
    }
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IngestOutcome {
    /// Text was added to the context.
    Loaded {
        /// Characters of extracted text.
        extracted_chars: usize,
        /// Context length afterwards.
        context_chars: usize,
        /// Characters of older context dropped to make room.
        dropped_chars: usize,
    },
    /// Nothing was added.
    Skipped {
        /// Placeholder or error text explaining why.
        reason: String,
    },
}

/// Per-file ingest report, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Source file.
    pub file: String,
    /// Media kind.
    pub kind: MediaKind,
    /// Outcome.
    #[serde(flatten)]
    pub outcome: IngestOutcome,
    /// Side file written, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side_file: Option<String>,
}

/// Validates and converts one file.
///
/// Empty conversions are replaced by the kind's placeholder message.
///
/// # Errors
///
/// Returns an error if the file is missing, unsupported or too large.
pub fn convert_file<C: DocumentConverter>(
    converter: &C,
    path: &Path,
    max_bytes: u64,
) -> Result<Extraction> {
    let kind = validate_upload(path, max_bytes)?;
    let text = match kind {
        MediaKind::Pdf => converter.extract_pdf_text(path),
        MediaKind::Audio => converter.transcribe(path),
        MediaKind::Image => converter.ocr_image(path),
    };
    let text = if text.trim().is_empty() {
        kind.empty_message().to_string()
    } else {
        text
    };
    Ok(Extraction {
        path: path.to_path_buf(),
        kind,
        text,
    })
}

/// Adds an extraction to the session context if it is usable.
pub fn ingest_extraction<T: ModelTransport>(
    session: &mut Session<T>,
    extraction: &Extraction,
) -> IngestOutcome {
    if extraction.is_usable() {
        let stats = session.ingest_document(&extraction.text);
        info!(
            path = %extraction.path.display(),
            kind = %extraction.kind,
            chars = extraction.text.chars().count(),
            "document loaded"
        );
        IngestOutcome::Loaded {
            extracted_chars: extraction.text.chars().count(),
            context_chars: stats.total_chars,
            dropped_chars: stats.dropped_chars,
        }
    } else {
        warn!(path = %extraction.path.display(), reason = %extraction.text, "document skipped");
        IngestOutcome::Skipped {
            reason: extraction.text.clone(),
        }
    }
}

/// Converts a file with `converter` and ingests the result into `session`.
///
/// # Errors
///
/// Returns an error on validation failure or when the side file cannot be
/// written.
pub fn ingest_file<C: DocumentConverter, T: ModelTransport>(
    session: &mut Session<T>,
    converter: &C,
    path: &Path,
    max_bytes: u64,
    save_side_file: bool,
) -> Result<IngestReport> {
    let extraction = convert_file(converter, path, max_bytes)?;
    finish_ingest(session, &extraction, save_side_file)
}

/// Ingests a converted file and writes its side file when requested.
///
/// # Errors
///
/// Returns an error when the side file cannot be written.
pub fn finish_ingest<T: ModelTransport>(
    session: &mut Session<T>,
    extraction: &Extraction,
    save_side_file: bool,
) -> Result<IngestReport> {
    let side_file = if save_side_file {
        extraction
            .write_side_file()?
            .map(|p| p.to_string_lossy().to_string())
    } else {
        None
    };
    let outcome = ingest_extraction(session, extraction);
    Ok(IngestReport {
        file: extraction.path.to_string_lossy().to_string(),
        kind: extraction.kind,
        outcome,
        side_file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::dispatch::{ModelRequest, TranscriptionRequest};
    use crate::error::TransportError;
    use tempfile::TempDir;

    struct NoModel;

    impl ModelTransport for NoModel {
        fn complete(
            &self,
            _request: &ModelRequest,
        ) -> std::result::Result<String, TransportError> {
            Err(TransportError::Auth("no key".to_string()))
        }

        fn transcribe(
            &self,
            _request: &TranscriptionRequest,
        ) -> std::result::Result<String, TransportError> {
            Err(TransportError::Auth("no key".to_string()))
        }
    }

    struct CannedConverter {
        text: &'static str,
    }

    impl DocumentConverter for CannedConverter {
        fn extract_pdf_text(&self, _path: &Path) -> String {
            self.text.to_string()
        }

        fn transcribe(&self, _path: &Path) -> String {
            self.text.to_string()
        }

        fn ocr_image(&self, _path: &Path) -> String {
            self.text.to_string()
        }
    }

    fn fixture(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"data").unwrap();
        path
    }

    #[test]
    fn test_ingest_file_loads_usable_text() {
        let temp = TempDir::new().unwrap();
        let pdf = fixture(&temp, "report.pdf");
        let mut session = Session::new(NoModel, &Config::default());

        let report = ingest_file(
            &mut session,
            &CannedConverter { text: "Revenue   grew!!" },
            &pdf,
            1024,
            true,
        )
        .unwrap();

        assert_eq!(session.context(), "Revenue grew!");
        assert_eq!(report.kind, MediaKind::Pdf);
        assert_eq!(
            report.outcome,
            IngestOutcome::Loaded {
                extracted_chars: 16,
                context_chars: 13,
                dropped_chars: 0
            }
        );
        let side = report.side_file.unwrap();
        assert!(side.ends_with("report_extracted.txt"));
        assert_eq!(std::fs::read_to_string(side).unwrap(), "Revenue   grew!!");
    }

    #[test]
    fn test_empty_conversion_becomes_placeholder() {
        let temp = TempDir::new().unwrap();
        let audio = fixture(&temp, "silence.mp3");
        let mut session = Session::new(NoModel, &Config::default());

        let report = ingest_file(&mut session, &CannedConverter { text: "  " }, &audio, 1024, true)
            .unwrap();

        assert_eq!(
            report.outcome,
            IngestOutcome::Loaded {
                extracted_chars: 27,
                context_chars: 27,
                dropped_chars: 0
            }
        );
        assert!(report.side_file.is_none());
        assert_eq!(session.context(), "No speech detected in audio");
    }

    #[test]
    fn test_error_text_is_not_ingested() {
        let temp = TempDir::new().unwrap();
        let image = fixture(&temp, "scan.jpg");
        let mut session = Session::new(NoModel, &Config::default());

        let extraction = {
            let converter = ModelConverter::new(session.dispatcher());
            convert_file(&converter, &image, 1024).unwrap()
        };
        assert!(!extraction.is_usable());
        assert!(extraction.text.starts_with("Error processing image with gpt-5"));

        let outcome = ingest_extraction(&mut session, &extraction);
        assert!(matches!(outcome, IngestOutcome::Skipped { .. }));
        assert_eq!(session.status(), "No documents loaded");
    }

    #[test]
    fn test_report_serializes_flat() {
        let report = IngestReport {
            file: "scan.png".to_string(),
            kind: MediaKind::Image,
            outcome: IngestOutcome::Skipped {
                reason: "No text detected in image".to_string(),
            },
            side_file: None,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["kind"], "image");
        assert_eq!(json["reason"], "No text detected in image");
        assert!(json.get("side_file").is_none());
    }
}

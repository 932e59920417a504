//! Document converters: file path in, best-effort text out.

use crate::dispatch::{Dispatcher, ModelTransport};
use crate::io::read_bytes;
use std::panic;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// Turns documents into text.
///
/// Implementations never fail: unreadable input yields an empty string or a
/// message starting with `Error`.
pub trait DocumentConverter {
    /// Extracts the text layer of a PDF.
    fn extract_pdf_text(&self, path: &Path) -> String;

    /// Transcribes speech in an audio file.
    fn transcribe(&self, path: &Path) -> String;

    /// Recognizes text in an image.
    fn ocr_image(&self, path: &Path) -> String;
}

/// Converter backed by the model for audio and images. PDFs are read
/// in-process with `pdf-extract`, or by an external command such as
/// `pdftotext` when one is configured.
#[derive(Debug)]
pub struct ModelConverter<'a, T> {
    dispatcher: &'a Dispatcher<T>,
    pdf_tool: Option<PathBuf>,
    summarize_pdfs: bool,
}

impl<'a, T: ModelTransport> ModelConverter<'a, T> {
    /// Creates a converter using `dispatcher` for model calls.
    pub fn new(dispatcher: &'a Dispatcher<T>) -> Self {
        Self {
            dispatcher,
            pdf_tool: None,
            summarize_pdfs: false,
        }
    }

    /// Extracts PDF text with an external command, invoked as
    /// `<tool> -enc UTF-8 <file> -`.
    #[must_use]
    pub fn with_pdf_tool(mut self, tool: impl Into<PathBuf>) -> Self {
        self.pdf_tool = Some(tool.into());
        self
    }

    /// Replaces extracted PDF text with a model-written summary.
    #[must_use]
    pub const fn summarize_pdfs(mut self, enabled: bool) -> Self {
        self.summarize_pdfs = enabled;
        self
    }

    fn read_pdf_text(&self, path: &Path) -> String {
        match &self.pdf_tool {
            Some(tool) => run_pdf_tool(tool, path),
            None => extract_embedded(path),
        }
    }
}

fn extract_embedded(path: &Path) -> String {
    debug!(path = %path.display(), "extracting PDF text");
    let bytes = match read_bytes(path) {
        Ok(bytes) => bytes,
        Err(e) => return format!("Error processing PDF: {e}"),
    };
    // pdf-extract panics on some malformed documents.
    match panic::catch_unwind(|| pdf_extract::extract_text_from_mem(&bytes)) {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => format!("Error processing PDF: {e}"),
        Err(_) => {
            warn!(path = %path.display(), "PDF parser aborted");
            "Error processing PDF: malformed document".to_string()
        }
    }
}

fn run_pdf_tool(tool: &Path, path: &Path) -> String {
    debug!(tool = %tool.display(), path = %path.display(), "extracting PDF text");
    match Command::new(tool)
        .arg("-enc")
        .arg("UTF-8")
        .arg(path)
        .arg("-")
        .output()
    {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).into_owned()
        }
        Ok(output) => format!(
            "Error processing PDF: {} exited with {}: {}",
            tool.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ),
        Err(e) => format!("Error processing PDF: cannot run {}: {e}", tool.display()),
    }
}

impl<T: ModelTransport> DocumentConverter for ModelConverter<'_, T> {
    fn extract_pdf_text(&self, path: &Path) -> String {
        let text = self.read_pdf_text(path);
        if self.summarize_pdfs && !text.trim().is_empty() && !crate::core::is_error_text(&text) {
            self.dispatcher.analyze_pdf_text(&text).into_text()
        } else {
            text
        }
    }

    fn transcribe(&self, path: &Path) -> String {
        self.dispatcher.transcribe_audio(path).into_text()
    }

    fn ocr_image(&self, path: &Path) -> String {
        self.dispatcher.analyze_image(path, None).into_text()
    }
}

//! Question and answer values passed through the dispatcher.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Prefix every dispatcher failure text starts with.
pub const ERROR_MARKER: &str = "Error";

/// What a question is asked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    /// The accumulated session context.
    TextContext,
    /// A single image file.
    Image,
    /// A single audio file.
    Audio,
    /// Text previously extracted from a PDF.
    Pdf,
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TextContext => "text",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Pdf => "pdf",
        };
        f.write_str(name)
    }
}

/// One question routed through the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question text (may be empty for media operations).
    pub question: String,
    /// What the question is asked against.
    pub modality: Modality,
    /// Media file for image and audio requests.
    pub media_path: Option<PathBuf>,
}

impl QueryRequest {
    /// A question against the session context.
    #[must_use]
    pub fn text(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            modality: Modality::TextContext,
            media_path: None,
        }
    }

    /// A question (or extraction request when `question` is `None`) about an image.
    #[must_use]
    pub fn image(path: impl Into<PathBuf>, question: Option<String>) -> Self {
        Self {
            question: question.unwrap_or_default(),
            modality: Modality::Image,
            media_path: Some(path.into()),
        }
    }

    /// A transcription request for an audio file.
    #[must_use]
    pub fn audio(path: impl Into<PathBuf>) -> Self {
        Self {
            question: String::new(),
            modality: Modality::Audio,
            media_path: Some(path.into()),
        }
    }

    /// A summary request over extracted PDF text, carried in `question`.
    #[must_use]
    pub fn pdf(extracted_text: impl Into<String>) -> Self {
        Self {
            question: extracted_text.into(),
            modality: Modality::Pdf,
            media_path: None,
        }
    }
}

/// Text returned by the dispatcher, possibly an error description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Displayable text.
    pub text: String,
    /// Whether `text` describes a failure.
    pub is_error: bool,
}

impl QueryResponse {
    /// A successful answer.
    #[must_use]
    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    /// A failure rendered as text. `text` should start with [`ERROR_MARKER`].
    #[must_use]
    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }

    /// Classifies free text by its leading error marker.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let is_error = is_error_text(&text);
        Self { text, is_error }
    }

    /// Consumes the response, returning its text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}

impl fmt::Display for QueryResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Returns `true` if `text` starts with [`ERROR_MARKER`].
#[must_use]
pub fn is_error_text(text: &str) -> bool {
    text.starts_with(ERROR_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_constructors() {
        let req = QueryRequest::text("What color is the sky?");
        assert_eq!(req.modality, Modality::TextContext);
        assert!(req.media_path.is_none());

        let req = QueryRequest::image("scan.png", None);
        assert_eq!(req.modality, Modality::Image);
        assert_eq!(req.question, "");
        assert_eq!(req.media_path, Some(PathBuf::from("scan.png")));

        let req = QueryRequest::audio("memo.wav");
        assert_eq!(req.modality, Modality::Audio);

        let req = QueryRequest::pdf("page text");
        assert_eq!(req.modality, Modality::Pdf);
        assert_eq!(req.question, "page text");
    }

    #[test]
    fn test_response_classification() {
        assert!(QueryResponse::from_text("Error: boom").is_error);
        assert!(!QueryResponse::from_text("The sky is blue.").is_error);
        assert!(!QueryResponse::from_text("").is_error);
        assert!(QueryResponse::failure("Error processing image").is_error);
        assert!(!QueryResponse::answer("fine").is_error);
    }

    #[test]
    fn test_response_display() {
        let resp = QueryResponse::answer("forty-two");
        assert_eq!(resp.to_string(), "forty-two");
        assert_eq!(resp.into_text(), "forty-two");
    }

    #[test]
    fn test_modality_display_and_serde() {
        assert_eq!(Modality::TextContext.to_string(), "text");
        assert_eq!(
            serde_json::to_string(&Modality::TextContext).unwrap(),
            "\"text_context\""
        );
    }
}

//! Query dispatch: one model call per operation, failures rendered as text.

use super::prompt::{build_context_prompt, build_image_prompt, build_pdf_prompt};
use super::transport::{
    ImageMediaType, MediaPayload, ModelRequest, ModelTransport, ReasoningEffort,
    TranscriptionRequest, Verbosity,
};
use crate::config::Config;
use crate::core::{Modality, QueryRequest, QueryResponse};
use crate::error::DispatchError;
use crate::io::read_bytes;
use std::path::Path;
use tracing::{debug, warn};

/// Model selection and generation parameters applied to every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSettings {
    /// Completion model.
    pub model: String,
    /// Transcription model.
    pub transcription_model: String,
    /// Requested verbosity.
    pub verbosity: Verbosity,
    /// Requested reasoning effort.
    pub reasoning_effort: ReasoningEffort,
    /// Media type policy for image payloads.
    pub image_media_type: ImageMediaType,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for DispatchSettings {
    fn from(config: &Config) -> Self {
        Self {
            model: config.model.clone(),
            transcription_model: config.transcription_model.clone(),
            verbosity: config.verbosity,
            reasoning_effort: config.reasoning_effort,
            image_media_type: config.image_media_type,
        }
    }
}

/// Formats requests for the model and folds every failure into text.
///
/// Each operation comes in two forms: `try_*` returns a typed
/// [`DispatchError`], the plain form returns a [`QueryResponse`] whose text
/// is always displayable.
#[derive(Debug)]
pub struct Dispatcher<T> {
    transport: T,
    settings: DispatchSettings,
}

impl<T: ModelTransport> Dispatcher<T> {
    /// Creates a dispatcher over `transport`.
    pub const fn new(transport: T, settings: DispatchSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    /// Returns the underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the active settings.
    pub const fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    /// Answers `question` using only `context`.
    pub fn try_answer_from_context(
        &self,
        context: &str,
        question: &str,
    ) -> Result<String, DispatchError> {
        self.complete(build_context_prompt(context, question), None)
    }

    /// Answers `question` using only `context`, rendering failures as text.
    pub fn answer_from_context(&self, context: &str, question: &str) -> QueryResponse {
        self.try_answer_from_context(context, question)
            .map_or_else(
                |e| {
                    warn!(error = %e, "context answer failed");
                    QueryResponse::failure(format!(
                        "Error: {e}. Please check your OpenAI API key."
                    ))
                },
                QueryResponse::answer,
            )
    }

    /// Sends an image with a question (or the extraction prompt).
    pub fn try_analyze_image(
        &self,
        path: &Path,
        question: Option<&str>,
    ) -> Result<String, DispatchError> {
        let bytes = read_bytes(path)?;
        let media_type = self.settings.image_media_type.resolve(path);
        let payload = MediaPayload::encode(media_type, &bytes);
        self.complete(build_image_prompt(question), Some(payload))
    }

    /// Sends an image with a question, rendering failures as text.
    pub fn analyze_image(&self, path: &Path, question: Option<&str>) -> QueryResponse {
        self.try_analyze_image(path, question).map_or_else(
            |e| {
                warn!(error = %e, path = %path.display(), "image analysis failed");
                QueryResponse::failure(format!(
                    "Error processing image with {}: {e}",
                    self.settings.model
                ))
            },
            QueryResponse::answer,
        )
    }

    /// Transcribes an audio file.
    pub fn try_transcribe_audio(&self, path: &Path) -> Result<String, DispatchError> {
        let audio = read_bytes(path)?;
        let file_name = path
            .file_name()
            .map_or_else(|| "audio".to_string(), |n| n.to_string_lossy().to_string());
        let request = TranscriptionRequest {
            model: self.settings.transcription_model.clone(),
            file_name,
            audio,
        };

        debug!(
            model = %request.model,
            file = %request.file_name,
            bytes = request.audio.len(),
            "transcription request"
        );
        let transcript = self.transport.transcribe(&request)?;
        Ok(transcript)
    }

    /// Transcribes an audio file, rendering failures as text.
    pub fn transcribe_audio(&self, path: &Path) -> QueryResponse {
        self.try_transcribe_audio(path).map_or_else(
            |e| {
                warn!(error = %e, path = %path.display(), "transcription failed");
                QueryResponse::failure(format!(
                    "Error transcribing audio with {}: {e}",
                    self.settings.transcription_model
                ))
            },
            QueryResponse::answer,
        )
    }

    /// Asks for a comprehensive summary of text extracted from a PDF.
    pub fn try_analyze_pdf_text(&self, extracted_text: &str) -> Result<String, DispatchError> {
        self.complete(build_pdf_prompt(extracted_text), None)
    }

    /// Summarizes extracted PDF text, rendering failures as text.
    pub fn analyze_pdf_text(&self, extracted_text: &str) -> QueryResponse {
        self.try_analyze_pdf_text(extracted_text).map_or_else(
            |e| {
                warn!(error = %e, "PDF analysis failed");
                QueryResponse::failure(format!(
                    "Error processing PDF with {}: {e}",
                    self.settings.model
                ))
            },
            QueryResponse::answer,
        )
    }

    /// Routes a request to the operation matching its modality.
    ///
    /// `context` is only consulted for [`Modality::TextContext`].
    pub fn dispatch(&self, context: &str, request: &QueryRequest) -> QueryResponse {
        let question = Some(request.question.as_str()).filter(|q| !q.trim().is_empty());
        match (request.modality, request.media_path.as_deref()) {
            (Modality::TextContext, _) => self.answer_from_context(context, &request.question),
            (Modality::Pdf, _) => self.analyze_pdf_text(&request.question),
            (Modality::Image, Some(path)) => self.analyze_image(path, question),
            (Modality::Audio, Some(path)) => self.transcribe_audio(path),
            (modality, None) => {
                let err = DispatchError::MissingMedia {
                    modality: modality.to_string(),
                };
                QueryResponse::failure(format!("Error: {err}"))
            }
        }
    }

    fn complete(
        &self,
        prompt: String,
        media: Option<MediaPayload>,
    ) -> Result<String, DispatchError> {
        let request = ModelRequest {
            model: self.settings.model.clone(),
            prompt,
            media,
            verbosity: self.settings.verbosity,
            reasoning_effort: self.settings.reasoning_effort,
        };

        debug!(
            model = %request.model,
            prompt_chars = request.prompt.chars().count(),
            media = request.media.as_ref().map(|m| m.media_type.as_str()),
            "completion request"
        );

        let text = self.transport.complete(&request)?;
        if text.trim().is_empty() {
            return Err(DispatchError::EmptyResponse);
        }
        Ok(text)
    }
}

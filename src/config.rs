//! Runtime configuration.
//!
//! Defaults match the hosted deployment: `gpt-5` for completions,
//! `whisper-1` for transcription, a 10 000 character context and 16 MiB
//! uploads. The CLI fills a [`Config`] from flags and environment variables.

use crate::core::DEFAULT_MAX_CONTEXT_LENGTH;
use crate::dispatch::{ImageMediaType, ReasoningEffort, Verbosity};
use crate::error::{Error, Result};
use crate::io::DEFAULT_MAX_FILE_SIZE;
use serde::{Deserialize, Serialize};

/// Default completion model.
pub const DEFAULT_MODEL: &str = "gpt-5";

/// Default transcription model.
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API key for the hosted model. Never serialized.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Alternate API base URL (OpenAI-compatible endpoints).
    pub base_url: Option<String>,

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

    /// Maximum context length in characters.
    pub max_context_length: usize,

    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: DEFAULT_MODEL.to_string(),
            transcription_model: DEFAULT_TRANSCRIPTION_MODEL.to_string(),
            verbosity: Verbosity::default(),
            reasoning_effort: ReasoningEffort::default(),
            image_media_type: ImageMediaType::default(),
            max_context_length: DEFAULT_MAX_CONTEXT_LENGTH,
            max_upload_bytes: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl Config {
    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Returns the API key if one is set and non-blank.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// Checks that the configuration can reach the model.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the API key is missing, a model name is
    /// blank, or a size limit is zero.
    pub fn validate(&self) -> Result<()> {
        if self.api_key().is_none() {
            return Err(config_error(format!("{API_KEY_ENV} is required")));
        }
        if self.model.trim().is_empty() {
            return Err(config_error("model name must not be empty"));
        }
        if self.transcription_model.trim().is_empty() {
            return Err(config_error("transcription model name must not be empty"));
        }
        if self.max_context_length == 0 {
            return Err(config_error("max context length must be positive"));
        }
        if self.max_upload_bytes == 0 {
            return Err(config_error("max upload size must be positive"));
        }
        Ok(())
    }
}

fn config_error(message: impl Into<String>) -> Error {
    Error::Config {
        message: message.into(),
    }
}

//! The request/response contract between the dispatcher and a hosted model.
//!
//! The dispatcher only ever talks to a [`ModelTransport`]. The OpenAI
//! implementation lives behind the `openai` feature; tests use recording
//! stubs.

use crate::error::TransportError;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Advisory output length requested from the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Terse answers.
    Low,
    /// Balanced answers.
    Medium,
    /// Detailed answers.
    #[default]
    High,
}

/// Advisory reasoning budget requested from the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    /// Minimal reasoning, fastest answers.
    #[default]
    Low,
    /// Moderate reasoning.
    Medium,
    /// Extended reasoning.
    High,
}

/// How the media type of an image payload is declared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageMediaType {
    /// Always declare `image/jpeg`, whatever the source format.
    #[default]
    Jpeg,
    /// Declare the type implied by the file extension.
    Detect,
}

macro_rules! level_enum_str {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Returns the wire name.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok(Self::$variant),)+
                    other => Err(format!(
                        "unknown {} '{other}' (expected one of: {})",
                        stringify!($ty),
                        [$($name),+].join(", ")
                    )),
                }
            }
        }
    };
}

level_enum_str!(Verbosity { Low => "low", Medium => "medium", High => "high" });
level_enum_str!(ReasoningEffort { Low => "low", Medium => "medium", High => "high" });
level_enum_str!(ImageMediaType { Jpeg => "jpeg", Detect => "detect" });

impl ImageMediaType {
    /// Returns the media type to declare for the image at `path`.
    #[must_use]
    pub fn resolve(self, path: &Path) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Detect => {
                let ext = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(str::to_ascii_lowercase);
                match ext.as_deref() {
                    Some("png") => "image/png",
                    Some("gif") => "image/gif",
                    Some("webp") => "image/webp",
                    _ => "image/jpeg",
                }
            }
        }
    }
}

/// Inline media sent alongside a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPayload {
    /// Declared media type, e.g. `image/jpeg`.
    pub media_type: String,
    /// Standard-alphabet base64 of the file bytes.
    pub data: String,
}

impl MediaPayload {
    /// Encodes raw bytes as a payload of the given media type.
    #[must_use]
    pub fn encode(media_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            media_type: media_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Returns the payload as a `data:` URL.
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// A completion request: one prompt, optionally with one media payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRequest {
    /// Model identifier.
    pub model: String,
    /// Prompt text.
    pub prompt: String,
    /// Optional inline media.
    pub media: Option<MediaPayload>,
    /// Requested verbosity.
    pub verbosity: Verbosity,
    /// Requested reasoning effort.
    pub reasoning_effort: ReasoningEffort,
}

/// A transcription request carrying raw audio bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionRequest {
    /// Transcription model identifier.
    pub model: String,
    /// File name, used by the API to infer the audio container.
    pub file_name: String,
    /// Raw audio bytes.
    pub audio: Vec<u8>,
}

/// A hosted model reachable with blocking request/response calls.
///
/// Implementations report every failure (credentials, network, malformed
/// responses) as a [`TransportError`]; the dispatcher turns those into text.
pub trait ModelTransport {
    /// Runs a completion and returns the model's text.
    fn complete(&self, request: &ModelRequest) -> Result<String, TransportError>;

    /// Transcribes audio and returns the transcript.
    fn transcribe(&self, request: &TranscriptionRequest) -> Result<String, TransportError>;
}

//! Error types for docqa-rs operations.
//!
//! Everything outside the session boundary (file validation, configuration,
//! CLI commands) uses these typed errors. The dispatcher folds
//! [`DispatchError`] into displayable text before it reaches a caller of
//! [`crate::Session`].

use thiserror::Error;

/// Result type alias for docqa-rs operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors (file operations).
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Document validation and conversion errors.
    #[error("ingest error: {0}")]
    Ingest(#[from] IngestError),

    /// Model dispatch errors, for callers using the typed `try_*` operations.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },
}

/// I/O-specific errors for file operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path to the file that was not found.
        path: String,
    },

    /// Failed to read file.
    #[error("failed to read file: {path}: {reason}")]
    ReadFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Failed to write file.
    #[error("failed to write file: {path}: {reason}")]
    WriteFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Directory creation error.
    #[error("failed to create directory: {path}: {reason}")]
    DirectoryFailed {
        /// Path to the directory.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Generic I/O error wrapper.
    #[error("I/O error: {0}")]
    Generic(String),
}

/// Errors raised while validating an uploaded document.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The file extension is not one of the supported media kinds.
    #[error("unsupported file type: {path} (allowed: pdf, wav, mp3, png, jpg, jpeg)")]
    UnsupportedExtension {
        /// Offending path.
        path: String,
    },

    /// The file exceeds the configured upload size.
    #[error("file too large: {path}: {size} bytes (max: {max} bytes)")]
    TooLarge {
        /// Offending path.
        path: String,
        /// Actual size in bytes.
        size: u64,
        /// Configured maximum in bytes.
        max: u64,
    },
}

/// Failures of a single model dispatch.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The media file could not be read.
    #[error("{0}")]
    Media(#[from] IoError),

    /// The transport rejected or failed the request.
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// A media request arrived without a media file.
    #[error("no media file given for {modality} request")]
    MissingMedia {
        /// Requested modality.
        modality: String,
    },

    /// The model answered with no text.
    #[error("empty response from model")]
    EmptyResponse,
}

/// Errors reported by a [`crate::dispatch::ModelTransport`] implementation.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Missing or rejected credentials.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The request could not be built or sent.
    #[error("request failed: {0}")]
    Request(String),

    /// The API returned an error payload.
    #[error("API error: {0}")]
    Api(String),

    /// The response could not be interpreted.
    #[error("malformed response: {0}")]
    Response(String),
}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Invalid argument provided.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Command execution failed.
    #[error("command execution failed: {0}")]
    ExecutionFailed(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(IoError::Generic(err.to_string()))
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(err: serde_json::Error) -> Self {
        Self::ExecutionFailed(format!("JSON serialization failed: {err}"))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Command(err.into())
    }
}

//! # docqa-rs
//!
//! Document question answering over a bounded text context.
//!
//! Text extracted from PDFs, recordings and images is normalized and
//! appended to a per-session context capped at a fixed number of
//! characters; the oldest content slides out first. Questions are answered
//! by a hosted multimodal model using only that context.
//!
//! ## Features
//!
//! - **Normalization**: whitespace collapsing, character filtering and a
//!   per-document length cap
//! - **Sliding context**: bounded, tail-keeping accumulation
//! - **Dispatch**: context answers, image analysis, transcription and PDF
//!   summaries, with every failure returned as text
//! - **Pluggable transport**: the OpenAI client is one [`ModelTransport`]
//!   behind the `openai` feature

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod core;
pub mod dispatch;
pub mod error;
pub mod ingest;
pub mod io;
pub mod session;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

// Re-export core domain types
pub use core::{
    ContextStore, ContextSummary, IngestStats, Modality, Normalizer, QueryRequest, QueryResponse,
    normalize,
};

// Re-export configuration and session
pub use config::Config;
pub use session::Session;

// Re-export dispatch types
#[cfg(feature = "openai")]
pub use dispatch::OpenAiTransport;
pub use dispatch::{DispatchSettings, Dispatcher, ModelTransport};

// Re-export ingest types
pub use ingest::{DocumentConverter, IngestReport, MediaKind, ModelConverter};

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};

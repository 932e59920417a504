//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros. Every model setting
//! can also come from the environment.

use crate::config::{Config, DEFAULT_MODEL, DEFAULT_TRANSCRIPTION_MODEL};
use crate::core::DEFAULT_MAX_CONTEXT_LENGTH;
use crate::dispatch::{ImageMediaType, ReasoningEffort, Verbosity};
use crate::io::DEFAULT_MAX_FILE_SIZE;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// docqa: ask questions about PDFs, recordings and images.
///
/// Uploaded documents are converted to text, cleaned up and kept in a
/// bounded context; questions are answered from that context by a hosted
/// multimodal model.
#[derive(Parser, Debug)]
#[command(name = "docqa")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// OpenAI API key.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Alternate OpenAI-compatible API base URL.
    #[arg(long, env = "DOCQA_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Completion model.
    #[arg(long, env = "DOCQA_MODEL", default_value = DEFAULT_MODEL, global = true)]
    pub model: String,

    /// Transcription model.
    #[arg(
        long,
        env = "DOCQA_TRANSCRIPTION_MODEL",
        default_value = DEFAULT_TRANSCRIPTION_MODEL,
        global = true
    )]
    pub transcription_model: String,

    /// Answer verbosity (low, medium, high).
    #[arg(long, env = "DOCQA_VERBOSITY", default_value = "high", global = true)]
    pub verbosity: Verbosity,

    /// Reasoning effort (low, medium, high).
    #[arg(long, env = "DOCQA_REASONING_EFFORT", default_value = "low", global = true)]
    pub reasoning_effort: ReasoningEffort,

    /// Declared image media type (jpeg, detect).
    #[arg(long, env = "DOCQA_IMAGE_MEDIA_TYPE", default_value = "jpeg", global = true)]
    pub image_media_type: ImageMediaType,

    /// Maximum context length in characters.
    #[arg(
        long,
        env = "DOCQA_MAX_CONTEXT_LENGTH",
        default_value_t = DEFAULT_MAX_CONTEXT_LENGTH,
        global = true
    )]
    pub max_context_length: usize,

    /// Maximum upload size in bytes.
    #[arg(
        long,
        env = "DOCQA_MAX_UPLOAD_BYTES",
        default_value_t = DEFAULT_MAX_FILE_SIZE,
        global = true
    )]
    pub max_upload_bytes: u64,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Documents to load before a command runs.
#[derive(Args, Debug, Clone, Default)]
pub struct IngestArgs {
    /// Document to load (pdf, wav, mp3, png, jpg, jpeg). Repeatable.
    #[arg(short, long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Write extracted text next to each source file.
    #[arg(long)]
    pub save_extracted: bool,

    /// Replace extracted PDF text with a model-written summary.
    #[arg(long)]
    pub summarize_pdfs: bool,

    /// External command used to extract PDF text (e.g. pdftotext).
    /// PDFs are parsed in-process when unset.
    #[arg(long, env = "DOCQA_PDF_TOOL")]
    pub pdf_tool: Option<PathBuf>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load documents and answer one question about them.
    Ask {
        /// The question.
        question: String,

        /// Documents to load.
        #[command(flatten)]
        ingest: IngestArgs,
    },

    /// Load documents, then answer questions read from stdin.
    ///
    /// `status` prints what is loaded, `reset` clears it, `exit` quits.
    Chat {
        /// Documents to load.
        #[command(flatten)]
        ingest: IngestArgs,
    },

    /// Load documents and show what the context holds.
    Status {
        /// Documents to load.
        #[command(flatten)]
        ingest: IngestArgs,
    },

    /// Ask about an image, or extract its text.
    Image {
        /// Image file.
        path: PathBuf,

        /// Question about the image (default: extract all text).
        #[arg(short, long)]
        question: Option<String>,
    },

    /// Transcribe an audio file.
    Transcribe {
        /// Audio file.
        path: PathBuf,
    },

    /// Summarize the text of a PDF.
    SummarizePdf {
        /// PDF file.
        path: PathBuf,

        /// External command used to extract PDF text.
        #[arg(long, env = "DOCQA_PDF_TOOL")]
        pdf_tool: Option<PathBuf>,
    },
}

impl Cli {
    /// Builds the runtime configuration from flags and environment.
    #[must_use]
    pub fn to_config(&self) -> Config {
        Config {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            transcription_model: self.transcription_model.clone(),
            verbosity: self.verbosity,
            reasoning_effort: self.reasoning_effort,
            image_media_type: self.image_media_type,
            max_context_length: self.max_context_length,
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}

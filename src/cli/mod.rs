//! CLI layer for docqa.
//!
//! Provides the command-line interface using clap, with commands for
//! loading documents, asking questions and direct media analysis.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::{execute, execute_with_io, run_chat};
pub use output::OutputFormat;
pub use parser::{Cli, Commands, IngestArgs};

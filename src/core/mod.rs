//! Core domain models for docqa-rs.
//!
//! Text normalization, the bounded session context and the query values
//! exchanged with the dispatcher. Pure data and string handling, no I/O.

pub mod context;
pub mod normalize;
pub mod query;

pub use context::{ContextStore, ContextSummary, DEFAULT_MAX_CONTEXT_LENGTH, IngestStats};
pub use normalize::{DEFAULT_MAX_CHARS, ELLIPSIS, Normalizer, normalize, normalize_optional};
pub use query::{ERROR_MARKER, Modality, QueryRequest, QueryResponse, is_error_text};

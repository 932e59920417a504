//! Query dispatch to a hosted multimodal model.
//!
//! ```text
//! ┌─────────┐     ┌────────────┐     ┌────────────────┐
//! │ Session │────▶│ Dispatcher │────▶│ ModelTransport │  (trait)
//! └─────────┘     └────────────┘     └───────┬────────┘
//!                                            │
//!                                  ┌─────────┴─────────┐
//!                                  ▼                   ▼
//!                          ┌───────────────┐    ┌────────────┐
//!                          │OpenAiTransport│    │ test stubs │
//!                          └───────────────┘    └────────────┘
//! ```
//!
//! The dispatcher is the only place transport failures are handled; callers
//! above it receive text.

pub mod dispatcher;
#[cfg(feature = "openai")]
pub mod openai;
pub mod prompt;
pub mod transport;

pub use dispatcher::{DispatchSettings, Dispatcher};
#[cfg(feature = "openai")]
pub use openai::OpenAiTransport;
pub use prompt::DEFAULT_IMAGE_PROMPT;
pub use transport::{
    ImageMediaType, MediaPayload, ModelRequest, ModelTransport, ReasoningEffort,
    TranscriptionRequest, Verbosity,
};

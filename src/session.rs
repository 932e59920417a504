//! The session facade: the only API a CLI loop or request handler needs.
//!
//! A [`Session`] owns one context and one dispatcher. It is an ordinary
//! value; hosts that share a session between threads wrap it in their own
//! lock.

use crate::config::Config;
use crate::core::{ContextStore, ContextSummary, IngestStats, Normalizer};
use crate::dispatch::{DispatchSettings, Dispatcher, ModelTransport};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{error, info, warn};

/// Reply to a question asked before any document content was ingested.
pub const EMPTY_CONTEXT_MESSAGE: &str =
    "I don't have any document content to reference. Please upload some files first!";

/// Prefix of the reply when answering fails unexpectedly.
pub const APOLOGY_PREFIX: &str = "Sorry, I encountered an error while processing your question";

/// Conversational state for one user: accumulated context plus dispatcher.
///
/// # Examples
///
/// ```
/// use docqa_rs::Session;
/// use docqa_rs::dispatch::{ModelRequest, ModelTransport, TranscriptionRequest};
/// use docqa_rs::error::TransportError;
///
/// struct Echo;
///
/// impl ModelTransport for Echo {
///     fn complete(&self, _: &ModelRequest) -> Result<String, TransportError> {
///         Ok("Blue.".to_string())
///     }
///     fn transcribe(&self, _: &TranscriptionRequest) -> Result<String, TransportError> {
///         Ok(String::new())
///     }
/// }
///
/// let mut session = Session::new(Echo, &Default::default());
/// session.ingest_document("The sky is blue.");
/// assert_eq!(session.ask("What color is the sky?"), "Blue.");
/// ```
#[derive(Debug)]
pub struct Session<T> {
    store: ContextStore,
    dispatcher: Dispatcher<T>,
}

impl<T: ModelTransport> Session<T> {
    /// Creates an empty session.
    pub fn new(transport: T, config: &Config) -> Self {
        Self::from_parts(
            ContextStore::with_limits(config.max_context_length, Normalizer::new()),
            Dispatcher::new(transport, DispatchSettings::from(config)),
        )
    }

    /// Creates a session from an existing store and dispatcher.
    pub const fn from_parts(store: ContextStore, dispatcher: Dispatcher<T>) -> Self {
        Self { store, dispatcher }
    }

    /// Normalizes and appends document text to the context.
    pub fn ingest_document(&mut self, raw_text: &str) -> IngestStats {
        let stats = self.store.ingest(raw_text);
        info!(
            total_chars = stats.total_chars,
            appended_chars = stats.appended_chars,
            "Context updated. Total length: {} characters",
            stats.total_chars
        );
        if stats.dropped_chars > 0 {
            warn!(
                dropped_chars = stats.dropped_chars,
                max_length = self.store.max_length(),
                "context limit reached, oldest content dropped"
            );
        }
        stats
    }

    /// Answers `question` from the accumulated context.
    ///
    /// Always returns displayable text: guidance when nothing is loaded, the
    /// model's answer, or an error description.
    pub fn ask(&self, question: &str) -> String {
        if self.store.is_empty() {
            return EMPTY_CONTEXT_MESSAGE.to_string();
        }

        info!(question_chars = question.chars().count(), "answering question");
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.dispatcher
                .answer_from_context(self.store.current(), question)
        }));

        match outcome {
            Ok(response) => response.into_text(),
            Err(payload) => {
                let detail = panic_detail(payload.as_ref());
                error!(%detail, "question dispatch aborted");
                format!("{APOLOGY_PREFIX}: {detail}")
            }
        }
    }

    /// Describes what the context holds.
    pub fn status(&self) -> String {
        self.summary().to_string()
    }

    /// Structured form of [`Self::status`].
    pub fn summary(&self) -> ContextSummary {
        self.store.summary()
    }

    /// Returns the current context text.
    pub fn context(&self) -> &str {
        self.store.current()
    }

    /// Returns the dispatcher, for media operations outside the context.
    pub const fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    /// Discards the accumulated context.
    pub fn reset(&mut self) {
        self.store.clear();
        info!("context cleared");
    }
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unexpected internal failure".to_string())
}

//! Running document context for a session.
//!
//! The context is a flat text buffer: every ingested document is normalized
//! and appended, and when the buffer outgrows its limit the oldest text is
//! cut from the front. There is no indexing; every question is answered
//! against the whole buffer.

use crate::core::normalize::Normalizer;
use serde::Serialize;
use std::fmt;

/// Default maximum context length, in characters.
pub const DEFAULT_MAX_CONTEXT_LENGTH: usize = 10_000;

/// Accumulated document text with a sliding-window size bound.
///
/// # Examples
///
/// ```
/// use docqa_rs::core::ContextStore;
///
/// let mut store = ContextStore::new();
/// store.ingest("  The sky   is blue!!! ");
/// assert_eq!(store.current(), "The sky is blue!");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextStore {
    content: String,
    /// Cached `content.chars().count()`.
    char_len: usize,
    max_length: usize,
    normalizer: Normalizer,
}

/// Effect of a single ingest on the context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    /// Characters of normalized text appended (including the separator).
    pub appended_chars: usize,
    /// Characters cut from the front to stay within the limit.
    pub dropped_chars: usize,
    /// Context length after the ingest.
    pub total_chars: usize,
}

/// Summary of what the context currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ContextSummary {
    /// Nothing (or only whitespace) has been ingested.
    Empty,
    /// The context holds document text.
    Loaded {
        /// Whitespace-separated token count.
        word_count: usize,
        /// Character count.
        char_count: usize,
    },
}

impl fmt::Display for ContextSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("No documents loaded"),
            Self::Loaded {
                word_count,
                char_count,
            } => write!(
                f,
                "Loaded {word_count} words ({char_count} characters) from uploaded documents"
            ),
        }
    }
}

impl Default for ContextStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextStore {
    /// Creates an empty store with the default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_MAX_CONTEXT_LENGTH, Normalizer::new())
    }

    /// Creates an empty store with a custom context limit and normalizer.
    #[must_use]
    pub const fn with_limits(max_length: usize, normalizer: Normalizer) -> Self {
        Self {
            content: String::new(),
            char_len: 0,
            max_length,
            normalizer,
        }
    }

    /// Returns the maximum context length in characters.
    #[must_use]
    pub const fn max_length(&self) -> usize {
        self.max_length
    }

    /// Returns the current context text.
    #[must_use]
    pub fn current(&self) -> &str {
        &self.content
    }

    /// Returns the context length in characters.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.char_len
    }

    /// Returns `true` if the context is empty or whitespace-only.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Normalizes `raw_text` and appends it to the context.
    ///
    /// Text that normalizes to nothing leaves the context unchanged. When
    /// the result exceeds the limit, the oldest characters are dropped so
    /// that the most recent text survives.
    pub fn ingest(&mut self, raw_text: &str) -> IngestStats {
        let normalized = self.normalizer.normalize(raw_text);
        self.push_normalized(&normalized)
    }

    /// Appends text that is already normalized, applying the same window.
    pub fn push_normalized(&mut self, text: &str) -> IngestStats {
        if text.is_empty() {
            return IngestStats {
                total_chars: self.char_len,
                ..IngestStats::default()
            };
        }

        let mut appended_chars = text.chars().count();
        if !self.content.is_empty() {
            self.content.push(' ');
            appended_chars += 1;
        }
        self.content.push_str(text);
        self.char_len += appended_chars;

        let dropped_chars = self.char_len.saturating_sub(self.max_length);
        if dropped_chars > 0 {
            let cut = self
                .content
                .char_indices()
                .nth(dropped_chars)
                .map_or(self.content.len(), |(idx, _)| idx);
            self.content.drain(..cut);
            self.char_len = self.max_length;
        }

        IngestStats {
            appended_chars,
            dropped_chars,
            total_chars: self.char_len,
        }
    }

    /// Summarizes the current context.
    #[must_use]
    pub fn summary(&self) -> ContextSummary {
        if self.is_empty() {
            ContextSummary::Empty
        } else {
            ContextSummary::Loaded {
                word_count: self.content.split_whitespace().count(),
                char_count: self.char_len,
            }
        }
    }

    /// Discards all accumulated text.
    pub fn clear(&mut self) {
        self.content.clear();
        self.char_len = 0;
    }
}

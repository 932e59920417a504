//! Text normalization applied to everything entering the context.
//!
//! Converter output is noisy: OCR leaves stray symbols, PDF extraction keeps
//! layout whitespace, transcripts repeat punctuation. Normalization reduces
//! all of it to single-space separated words and a small punctuation set.

use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Default cap on normalized text length, in characters.
pub const DEFAULT_MAX_CHARS: usize = 8000;

/// Marker appended to text cut at the length cap.
pub const ELLIPSIS: &str = "...";

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

fn disallowed_char() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s.,!?;:\-()]").expect("valid regex"))
}

fn emphatic_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"!{2,}|\?{2,}").expect("valid regex"))
}

/// Text normalizer with a configurable length cap.
///
/// # Examples
///
/// ```
/// use docqa_rs::core::Normalizer;
///
/// let normalizer = Normalizer::new();
/// assert_eq!(normalizer.normalize("  The sky   is blue!!! "), "The sky is blue!");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    max_chars: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    /// Creates a normalizer with the default 8000 character cap.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    /// Creates a normalizer with a custom length cap.
    #[must_use]
    pub const fn with_max_chars(max_chars: usize) -> Self {
        Self { max_chars }
    }

    /// Returns the length cap in characters (excluding the ellipsis marker).
    #[must_use]
    pub const fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Normalizes raw extracted text.
    ///
    /// Whitespace runs collapse to one space, characters outside word
    /// characters and `. , ! ? ; : - ( )` are dropped (leaving a word
    /// boundary), repeated `!`/`?` collapse to one, the result is trimmed
    /// and cut to the cap with [`ELLIPSIS`] appended.
    ///
    /// Total: any input yields a string, empty input yields an empty string.
    #[must_use]
    pub fn normalize(&self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }

        let text = whitespace_run().replace_all(raw, " ");
        let text = if disallowed_char().is_match(&text) {
            let stripped = disallowed_char().replace_all(&text, " ");
            whitespace_run().replace_all(&stripped, " ").into_owned()
        } else {
            text.into_owned()
        };
        let text = emphatic_run().replace_all(&text, |caps: &Captures<'_>| caps[0][..1].to_string());

        truncate_chars(text.trim(), self.max_chars)
    }
}

/// Normalizes text with the default cap.
///
/// # Examples
///
/// ```
/// use docqa_rs::core::normalize;
///
/// assert_eq!(normalize("tabs\tand\nnewlines"), "tabs and newlines");
/// ```
#[must_use]
pub fn normalize(raw: &str) -> String {
    Normalizer::new().normalize(raw)
}

/// Normalizes possibly absent text; `None` yields an empty string.
#[must_use]
pub fn normalize_optional(raw: Option<&str>) -> String {
    raw.map_or_else(String::new, normalize)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let mut out = String::with_capacity(cut + ELLIPSIS.len());
            out.push_str(&text[..cut]);
            out.push_str(ELLIPSIS);
            out
        }
        None => text.to_string(),
    }
}

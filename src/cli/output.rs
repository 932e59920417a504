//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::core::{ContextSummary, QueryResponse};
use crate::error::Error;
use crate::ingest::{IngestOutcome, IngestReport};
use serde::Serialize;
use std::fmt::Write;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Formats the per-file ingest reports.
#[must_use]
pub fn format_ingest_reports(reports: &[IngestReport], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_ingest_reports_text(reports),
        OutputFormat::Json => format_json(&reports),
    }
}

fn format_ingest_reports_text(reports: &[IngestReport]) -> String {
    let mut output = String::new();
    for report in reports {
        match &report.outcome {
            IngestOutcome::Loaded {
                extracted_chars,
                dropped_chars,
                ..
            } => {
                let _ = write!(
                    output,
                    "Loaded {} ({}): {extracted_chars} characters",
                    report.file, report.kind
                );
                if *dropped_chars > 0 {
                    let _ = write!(output, ", {dropped_chars} older characters dropped");
                }
                output.push('\n');
            }
            IngestOutcome::Skipped { reason } => {
                let _ = writeln!(
                    output,
                    "Skipped {} ({}): {}",
                    report.file,
                    report.kind,
                    reason.to_lowercase()
                );
            }
        }
        if let Some(ref side) = report.side_file {
            let _ = writeln!(output, "  Saved text to {side}");
        }
    }
    output
}

/// Formats the answer to a question, preceded by the ingest reports.
#[must_use]
pub fn format_answer(
    question: &str,
    answer: &str,
    reports: &[IngestReport],
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = format_ingest_reports_text(reports);
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str(answer);
            if !answer.ends_with('\n') {
                output.push('\n');
            }
            output
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct AnswerOutput<'a> {
                question: &'a str,
                answer: &'a str,
                documents: &'a [IngestReport],
            }
            format_json(&AnswerOutput {
                question,
                answer,
                documents: reports,
            })
        }
    }
}

/// Formats a context summary.
#[must_use]
pub fn format_status(
    summary: &ContextSummary,
    reports: &[IngestReport],
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = format_ingest_reports_text(reports);
            let _ = writeln!(output, "{summary}");
            output
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct StatusOutput<'a> {
                context: &'a ContextSummary,
                documents: &'a [IngestReport],
            }
            format_json(&StatusOutput {
                context: summary,
                documents: reports,
            })
        }
    }
}

/// Formats the result of a direct media operation.
#[must_use]
pub fn format_media_response(
    operation: &str,
    file: &str,
    response: &QueryResponse,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = response.text.clone();
            if !output.ends_with('\n') {
                output.push('\n');
            }
            output
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct MediaOutput<'a> {
                operation: &'a str,
                file: &'a str,
                text: &'a str,
                is_error: bool,
            }
            format_json(&MediaOutput {
                operation,
                file,
                text: &response.text,
                is_error: response.is_error,
            })
        }
    }
}

/// Formats an error for display.
#[must_use]
pub fn format_error(error: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => error.to_string(),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ErrorOutput {
                error: String,
            }
            format_json(&ErrorOutput {
                error: error.to_string(),
            })
        }
    }
}

/// Formats a value as JSON.
fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IngestError;
    use crate::ingest::MediaKind;

    fn loaded(file: &str) -> IngestReport {
        IngestReport {
            file: file.to_string(),
            kind: MediaKind::Pdf,
            outcome: IngestOutcome::Loaded {
                extracted_chars: 120,
                context_chars: 120,
                dropped_chars: 0,
            },
            side_file: Some("report_extracted.txt".to_string()),
        }
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::parse("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("text"), OutputFormat::Text);
        assert_eq!(OutputFormat::parse("unknown"), OutputFormat::Text);
    }

    #[test]
    fn test_format_reports_text() {
        let skipped = IngestReport {
            file: "scan.png".to_string(),
            kind: MediaKind::Image,
            outcome: IngestOutcome::Skipped {
                reason: "Error processing image with gpt-5: bad key".to_string(),
            },
            side_file: None,
        };
        let text = format_ingest_reports(&[loaded("report.pdf"), skipped], OutputFormat::Text);
        assert!(text.contains("Loaded report.pdf (pdf): 120 characters\n"));
        assert!(text.contains("  Saved text to report_extracted.txt"));
        assert!(text.contains("Skipped scan.png (image): error processing image"));
    }

    #[test]
    fn test_format_answer() {
        let text = format_answer("q?", "Blue.", &[], OutputFormat::Text);
        assert_eq!(text, "Blue.\n");

        let json = format_answer("q?", "Blue.", &[loaded("r.pdf")], OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["answer"], "Blue.");
        assert_eq!(value["documents"][0]["status"], "loaded");
    }

    #[test]
    fn test_format_status() {
        let summary = ContextSummary::Loaded {
            word_count: 2,
            char_count: 10,
        };
        let text = format_status(&summary, &[], OutputFormat::Text);
        assert_eq!(text, "Loaded 2 words (10 characters) from uploaded documents\n");

        let json = format_status(&ContextSummary::Empty, &[], OutputFormat::Json);
        assert!(json.contains("\"state\": \"empty\""));
    }

    #[test]
    fn test_format_error_json() {
        let err: Error = IngestError::UnsupportedExtension {
            path: "notes.txt".to_string(),
        }
        .into();
        let json = format_error(&err, OutputFormat::Json);
        assert!(json.contains("unsupported file type: notes.txt"));
    }
}

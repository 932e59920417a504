//! Integration tests for docqa-rs.

#![allow(clippy::expect_used)]

use docqa_rs::core::{ContextStore, ContextSummary, Normalizer};
use docqa_rs::dispatch::{ModelRequest, ModelTransport, TranscriptionRequest};
use docqa_rs::error::TransportError;
use docqa_rs::session::EMPTY_CONTEXT_MESSAGE;
use docqa_rs::{Config, Session};
use std::cell::RefCell;

/// Transport that records every request and replies from a script.
#[derive(Default)]
struct RecordingTransport {
    reply: Option<String>,
    completions: RefCell<Vec<ModelRequest>>,
    transcriptions: RefCell<Vec<TranscriptionRequest>>,
}

impl RecordingTransport {
    fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        self.completions.borrow().len() + self.transcriptions.borrow().len()
    }
}

impl ModelTransport for RecordingTransport {
    fn complete(&self, request: &ModelRequest) -> Result<String, TransportError> {
        self.completions.borrow_mut().push(request.clone());
        self.reply
            .clone()
            .ok_or_else(|| TransportError::Auth("Incorrect API key provided".to_string()))
    }

    fn transcribe(&self, request: &TranscriptionRequest) -> Result<String, TransportError> {
        self.transcriptions.borrow_mut().push(request.clone());
        self.reply
            .clone()
            .ok_or_else(|| TransportError::Request("connection reset".to_string()))
    }
}

fn session(transport: RecordingTransport) -> Session<RecordingTransport> {
    Session::new(transport, &Config::default())
}

#[test]
fn test_scenario_normalized_context() {
    let mut session = session(RecordingTransport::replying("Blue."));
    session.ingest_document("  The sky   is blue!!! ");
    assert_eq!(session.context(), "The sky is blue!");
}

#[test]
fn test_scenario_window_keeps_tail() {
    let input: String = (0..12_000u32)
        .map(|i| char::from(b'a' + u8::try_from(i % 26).expect("fits")))
        .collect();
    let mut store = ContextStore::with_limits(10_000, Normalizer::with_max_chars(20_000));

    let stats = store.ingest(&input);

    assert_eq!(store.len(), 10_000);
    assert_eq!(store.current(), &input[2_000..]);
    assert_eq!(stats.dropped_chars, 2_000);
}

#[test]
fn test_scenario_fresh_session_asks_nothing() {
    let session = session(RecordingTransport::replying("unused"));
    assert_eq!(session.ask("What color is the sky?"), EMPTY_CONTEXT_MESSAGE);
    assert_eq!(session.dispatcher().transport().calls(), 0);
}

#[test]
fn test_repeated_ingests_slide_the_window() {
    let mut session = session(RecordingTransport::replying("ok"));
    let block = "word ".repeat(1_500);
    for _ in 0..3 {
        session.ingest_document(&block);
    }
    let context = session.context();
    assert_eq!(context.chars().count(), 10_000);
    assert!(context.ends_with("word word"));
}

#[test]
fn test_ask_sends_context_and_question() {
    let mut session = session(RecordingTransport::replying("It is blue."));
    session.ingest_document("The sky is blue.");
    session.ingest_document("Grass is green.");

    assert_eq!(session.ask("What color is the sky?"), "It is blue.");

    let sent = session.dispatcher().transport().completions.borrow();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].prompt.contains("Context: The sky is blue. Grass is green."));
    assert!(sent[0].prompt.contains("Question: What color is the sky?"));
}

#[test]
fn test_failing_transport_yields_error_text() {
    let mut session = session(RecordingTransport::default());
    session.ingest_document("content");

    let answer = session.ask("anything?");
    assert_eq!(
        answer,
        "Error: authentication failed: Incorrect API key provided. Please check your OpenAI API key."
    );
}

#[test]
fn test_status_lifecycle() {
    let mut session = session(RecordingTransport::replying("ok"));
    assert_eq!(session.summary(), ContextSummary::Empty);

    session.ingest_document("one two three");
    assert_eq!(
        session.status(),
        "Loaded 3 words (13 characters) from uploaded documents"
    );

    session.reset();
    assert_eq!(session.status(), "No documents loaded");
}

/// Ingest pipeline tests with a fake converter.
mod ingest_tests {
    use super::*;
    use docqa_rs::ingest::{
        DocumentConverter, IngestOutcome, MediaKind, ModelConverter, convert_file, finish_ingest,
        ingest_file,
    };
    use std::path::Path;
    use tempfile::TempDir;

    struct FakeConverter;

    impl DocumentConverter for FakeConverter {
        fn extract_pdf_text(&self, _path: &Path) -> String {
            "Quarterly   revenue grew 12%.".to_string()
        }

        fn transcribe(&self, _path: &Path) -> String {
            String::new()
        }

        fn ocr_image(&self, _path: &Path) -> String {
            "Error processing image with gpt-5: quota exceeded".to_string()
        }
    }

    fn write(dir: &TempDir, name: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"fixture").expect("write fixture");
        path
    }

    #[test]
    fn test_pipeline_over_mixed_uploads() {
        let temp = TempDir::new().expect("temp dir");
        let mut session = session(RecordingTransport::replying("12%"));

        let pdf = ingest_file(&mut session, &FakeConverter, &write(&temp, "q3.pdf"), 1024, true)
            .expect("pdf ingest");
        let audio = ingest_file(&mut session, &FakeConverter, &write(&temp, "call.wav"), 1024, true)
            .expect("audio ingest");
        let image = ingest_file(&mut session, &FakeConverter, &write(&temp, "scan.jpeg"), 1024, true)
            .expect("image ingest");

        assert!(matches!(pdf.outcome, IngestOutcome::Loaded { .. }));
        assert!(pdf.side_file.is_some());
        assert!(temp.path().join("q3_extracted.txt").exists());

        assert!(matches!(audio.outcome, IngestOutcome::Loaded { .. }));
        assert!(audio.side_file.is_none());

        assert!(matches!(image.outcome, IngestOutcome::Skipped { .. }));
        assert!(!temp.path().join("scan_ocr.txt").exists());

        assert_eq!(
            session.context(),
            "Quarterly revenue grew 12 . No speech detected in audio"
        );
        assert_eq!(session.ask("How much did revenue grow?"), "12%");
    }

    #[test]
    fn test_oversized_upload_rejected_before_conversion() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("big.png");
        std::fs::write(&path, vec![0u8; 64]).expect("write fixture");

        let err = convert_file(&FakeConverter, &path, 63).expect_err("too large");
        assert!(err.to_string().contains("file too large"));
    }

    #[cfg(unix)]
    #[test]
    fn test_pdf_summary_is_normalized_on_ingest() {
        let temp = TempDir::new().expect("temp dir");
        let pdf = write(&temp, "q3.pdf");
        let mut session = session(RecordingTransport::replying("Revenue   grew $12!!!"));

        let extraction = {
            let converter = ModelConverter::new(session.dispatcher())
                .with_pdf_tool("echo")
                .summarize_pdfs(true);
            convert_file(&converter, &pdf, 1024).expect("convert")
        };
        assert_eq!(extraction.text, "Revenue   grew $12!!!");

        let report = finish_ingest(&mut session, &extraction, false).expect("ingest");
        assert!(matches!(report.outcome, IngestOutcome::Loaded { .. }));
        assert_eq!(session.context(), "Revenue grew 12!");

        let sent = session.dispatcher().transport().completions.borrow();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].prompt.contains("-enc UTF-8"));
    }

    #[test]
    fn test_model_converter_through_session_dispatcher() {
        let temp = TempDir::new().expect("temp dir");
        let image = write(&temp, "receipt.png");
        let mut session = session(RecordingTransport::replying("TOTAL $42.00"));

        let extraction = {
            let converter = ModelConverter::new(session.dispatcher());
            convert_file(&converter, &image, 1024).expect("convert")
        };
        assert_eq!(extraction.kind, MediaKind::Image);

        let report = finish_ingest(&mut session, &extraction, false).expect("ingest");
        assert!(matches!(report.outcome, IngestOutcome::Loaded { .. }));
        assert_eq!(session.context(), "TOTAL 42.00");

        let sent = session.dispatcher().transport().completions.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].media.as_ref().expect("media").media_type,
            "image/jpeg"
        );
    }
}

mod property_tests {
    use docqa_rs::core::{ContextStore, Normalizer, normalize};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn context_never_exceeds_limit(
            docs in prop::collection::vec("[a-zA-Z .,!?]{0,300}", 0..20),
            limit in 1usize..1_000,
        ) {
            let mut store = ContextStore::with_limits(limit, Normalizer::new());
            for doc in &docs {
                store.ingest(doc);
                prop_assert!(store.current().chars().count() <= limit);
                prop_assert_eq!(store.len(), store.current().chars().count());
            }
        }

        #[test]
        fn latest_document_survives(
            older in prop::collection::vec("[a-z ]{0,200}", 0..10),
            latest in "[a-z]{1,50}",
        ) {
            let mut store = ContextStore::with_limits(100, Normalizer::new());
            for doc in &older {
                store.ingest(doc);
            }
            store.ingest(&latest);
            prop_assert!(store.current().ends_with(&latest));
        }

        #[test]
        fn normalized_text_has_no_double_spaces(raw in "\\PC{0,400}") {
            let out = normalize(&raw);
            prop_assert!(!out.contains("  "));
            prop_assert_eq!(out.trim(), out.as_str());
        }
    }
}

/// CLI command integration tests.
mod cli_tests {
    use super::*;
    use clap::Parser;
    use docqa_rs::cli::{Cli, execute_with_io};
    use tempfile::TempDir;

    fn run(args: &[&str], transport: RecordingTransport) -> docqa_rs::Result<String> {
        let mut argv = vec!["docqa", "--api-key", "sk-test"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).expect("parse");
        let mut sink = Vec::new();
        execute_with_io(&cli, transport, "".as_bytes(), &mut sink)
    }

    #[test]
    fn test_ask_json_output() {
        let temp = TempDir::new().expect("temp dir");
        let audio = temp.path().join("memo.mp3");
        std::fs::write(&audio, b"id3").expect("write fixture");
        let audio = audio.to_string_lossy().to_string();

        let output = run(
            &["--format", "json", "ask", "Who called?", "--file", &audio],
            RecordingTransport::replying("Alice called."),
        )
        .expect("ask");

        let value: serde_json::Value = serde_json::from_str(&output).expect("json");
        assert_eq!(value["question"], "Who called?");
        assert_eq!(value["answer"], "Alice called.");
        assert_eq!(value["documents"][0]["status"], "loaded");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = run(
            &["status", "--file", "/nonexistent/report.pdf"],
            RecordingTransport::default(),
        )
        .expect_err("missing file");
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_image_json_reports_error_flag() {
        let temp = TempDir::new().expect("temp dir");
        let image = temp.path().join("sign.jpg");
        std::fs::write(&image, b"jpg").expect("write fixture");
        let image = image.to_string_lossy().to_string();

        let output = run(
            &["--format", "json", "image", &image, "--question", "What does it say?"],
            RecordingTransport::default(),
        )
        .expect("image");
        let value: serde_json::Value = serde_json::from_str(&output).expect("json");
        assert_eq!(value["is_error"], true);
        assert!(
            value["text"]
                .as_str()
                .expect("text")
                .starts_with("Error processing image with gpt-5")
        );
    }
}

/// Binary smoke tests; none of them reach the network.
#[cfg(feature = "openai")]
mod binary_tests {
    use assert_cmd::Command;
    use predicates::prelude::*;

    fn docqa() -> Command {
        let mut cmd = Command::cargo_bin("docqa").expect("binary built");
        cmd.env_remove("OPENAI_API_KEY").env_remove("RUST_LOG");
        cmd
    }

    #[test]
    fn test_help_lists_commands() {
        docqa()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("ask"))
            .stdout(predicate::str::contains("transcribe"));
    }

    #[test]
    fn test_missing_api_key_fails() {
        docqa()
            .args(["ask", "What color is the sky?"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("OPENAI_API_KEY is required"));
    }

    #[test]
    fn test_missing_api_key_json_error_on_stdout() {
        docqa()
            .args(["--format", "json", "status"])
            .assert()
            .failure()
            .stdout(predicate::str::contains("\"error\""));
    }

    #[test]
    fn test_status_without_files_needs_no_network() {
        docqa()
            .args(["--api-key", "sk-test", "status"])
            .assert()
            .success()
            .stdout("No documents loaded\n");
    }
}

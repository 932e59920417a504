//! CLI command implementations.
//!
//! Contains the business logic for each CLI command. Commands are generic
//! over the [`ModelTransport`] so they run against stubs in tests.

use crate::cli::output::{
    OutputFormat, format_answer, format_ingest_reports, format_media_response, format_status,
};
use crate::cli::parser::{Cli, Commands, IngestArgs};
use crate::config::Config;
use crate::core::QueryResponse;
use crate::dispatch::{DispatchSettings, Dispatcher, ModelTransport};
use crate::error::{CommandError, Result};
use crate::ingest::{
    DocumentConverter, IngestReport, MediaKind, ModelConverter, convert_file, finish_ingest,
    validate_upload,
};
use crate::session::Session;
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::debug;

/// Prompt shown before each chat question.
pub const CHAT_PROMPT: &str = "> ";

/// Executes the CLI command against stdin and stdout.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute<T: ModelTransport>(cli: &Cli, transport: T) -> Result<String> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    execute_with_io(cli, transport, stdin.lock(), &mut stdout)
}

/// Executes the CLI command with explicit chat input and output streams.
///
/// Only `chat` touches the streams; every other command returns its output.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute_with_io<T, R, W>(cli: &Cli, transport: T, input: R, output: &mut W) -> Result<String>
where
    T: ModelTransport,
    R: BufRead,
    W: Write,
{
    let format = OutputFormat::parse(&cli.format);
    let config = cli.to_config();

    match &cli.command {
        Commands::Ask { question, ingest } => cmd_ask(transport, &config, ingest, question, format),
        Commands::Chat { ingest } => {
            cmd_chat(transport, &config, ingest, input, output, format)?;
            Ok(String::new())
        }
        Commands::Status { ingest } => cmd_status(transport, &config, ingest, format),
        Commands::Image { path, question } => {
            cmd_image(transport, &config, path, question.as_deref(), format)
        }
        Commands::Transcribe { path } => cmd_transcribe(transport, &config, path, format),
        Commands::SummarizePdf { path, pdf_tool } => {
            cmd_summarize_pdf(transport, &config, path, pdf_tool.as_deref(), format)
        }
    }
}

fn cmd_ask<T: ModelTransport>(
    transport: T,
    config: &Config,
    ingest: &IngestArgs,
    question: &str,
    format: OutputFormat,
) -> Result<String> {
    if question.trim().is_empty() {
        return Err(CommandError::InvalidArgument("question must not be empty".to_string()).into());
    }

    let mut session = Session::new(transport, config);
    let reports = load_documents(&mut session, ingest, config.max_upload_bytes)?;
    let answer = session.ask(question);
    Ok(format_answer(question, &answer, &reports, format))
}

fn cmd_status<T: ModelTransport>(
    transport: T,
    config: &Config,
    ingest: &IngestArgs,
    format: OutputFormat,
) -> Result<String> {
    let mut session = Session::new(transport, config);
    let reports = load_documents(&mut session, ingest, config.max_upload_bytes)?;
    Ok(format_status(&session.summary(), &reports, format))
}

fn cmd_chat<T, R, W>(
    transport: T,
    config: &Config,
    ingest: &IngestArgs,
    input: R,
    output: &mut W,
    format: OutputFormat,
) -> Result<()>
where
    T: ModelTransport,
    R: BufRead,
    W: Write,
{
    let mut session = Session::new(transport, config);
    let reports = load_documents(&mut session, ingest, config.max_upload_bytes)?;
    write!(output, "{}", format_ingest_reports(&reports, OutputFormat::Text))?;
    writeln!(output, "{}", session.status())?;
    run_chat(&mut session, input, output, format)
}

/// Runs the question loop until `exit` or end of input.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub fn run_chat<T, R, W>(
    session: &mut Session<T>,
    input: R,
    output: &mut W,
    format: OutputFormat,
) -> Result<()>
where
    T: ModelTransport,
    R: BufRead,
    W: Write,
{
    let mut lines = input.lines();
    loop {
        write!(output, "{CHAT_PROMPT}")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let line = line?;
        let line = line.trim();

        match line {
            "" => {}
            "exit" | "quit" => break,
            "status" => {
                writeln!(output, "{}", format_status(&session.summary(), &[], format).trim_end())?;
            }
            "reset" => {
                session.reset();
                writeln!(output, "Context cleared.")?;
            }
            question => {
                debug!(question, "chat question");
                let answer = session.ask(question);
                writeln!(
                    output,
                    "{}",
                    format_answer(question, &answer, &[], format).trim_end()
                )?;
            }
        }
    }
    Ok(())
}

fn cmd_image<T: ModelTransport>(
    transport: T,
    config: &Config,
    path: &Path,
    question: Option<&str>,
    format: OutputFormat,
) -> Result<String> {
    expect_kind(path, MediaKind::Image, config.max_upload_bytes)?;
    let dispatcher = Dispatcher::new(transport, DispatchSettings::from(config));
    let response = dispatcher.analyze_image(path, question);
    media_result("image", path, &response, format)
}

fn cmd_transcribe<T: ModelTransport>(
    transport: T,
    config: &Config,
    path: &Path,
    format: OutputFormat,
) -> Result<String> {
    expect_kind(path, MediaKind::Audio, config.max_upload_bytes)?;
    let dispatcher = Dispatcher::new(transport, DispatchSettings::from(config));
    let response = dispatcher.transcribe_audio(path);
    media_result("transcribe", path, &response, format)
}

fn cmd_summarize_pdf<T: ModelTransport>(
    transport: T,
    config: &Config,
    path: &Path,
    pdf_tool: Option<&Path>,
    format: OutputFormat,
) -> Result<String> {
    expect_kind(path, MediaKind::Pdf, config.max_upload_bytes)?;
    let dispatcher = Dispatcher::new(transport, DispatchSettings::from(config));
    let converter = pdf_converter(&dispatcher, pdf_tool).summarize_pdfs(true);
    let response = QueryResponse::from_text(converter.extract_pdf_text(path));
    media_result("summarize-pdf", path, &response, format)
}

fn load_documents<T: ModelTransport>(
    session: &mut Session<T>,
    ingest: &IngestArgs,
    max_bytes: u64,
) -> Result<Vec<IngestReport>> {
    let mut reports = Vec::with_capacity(ingest.files.len());
    for path in &ingest.files {
        let extraction = {
            let converter = pdf_converter(session.dispatcher(), ingest.pdf_tool.as_deref())
                .summarize_pdfs(ingest.summarize_pdfs);
            convert_file(&converter, path, max_bytes)?
        };
        reports.push(finish_ingest(session, &extraction, ingest.save_extracted)?);
    }
    Ok(reports)
}

fn pdf_converter<'a, T: ModelTransport>(
    dispatcher: &'a Dispatcher<T>,
    pdf_tool: Option<&Path>,
) -> ModelConverter<'a, T> {
    let converter = ModelConverter::new(dispatcher);
    match pdf_tool {
        Some(tool) => converter.with_pdf_tool(tool),
        None => converter,
    }
}

fn expect_kind(path: &Path, expected: MediaKind, max_bytes: u64) -> Result<()> {
    let kind = validate_upload(path, max_bytes)?;
    if kind != expected {
        return Err(CommandError::InvalidArgument(format!(
            "{} is a {kind} file, expected {expected}",
            path.display()
        ))
        .into());
    }
    Ok(())
}

fn media_result(
    operation: &str,
    path: &Path,
    response: &QueryResponse,
    format: OutputFormat,
) -> Result<String> {
    if response.is_error && format == OutputFormat::Text {
        return Err(CommandError::ExecutionFailed(response.text.clone()).into());
    }
    Ok(format_media_response(
        operation,
        &path.to_string_lossy(),
        response,
        format,
    ))
}

//! OpenAI transport: chat completions and Whisper transcription.
//!
//! Wraps the async `async-openai` client in a private current-thread
//! runtime so the rest of the crate stays synchronous. Works with any
//! OpenAI-compatible endpoint via `base_url`.

use super::transport::{
    ModelRequest, ModelTransport, ReasoningEffort, TranscriptionRequest,
};
use crate::config::{API_KEY_ENV, Config};
use crate::error::{Error, Result, TransportError};
use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::{
    AudioInput, ChatCompletionRequestMessageContentPartImageArgs,
    ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionRequestUserMessageContent, ChatCompletionRequestUserMessageContentPart,
    CreateChatCompletionRequest, CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    CreateTranscriptionRequestArgs, ImageUrlArgs,
};
use serde_json::Value;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

/// Blocking [`ModelTransport`] over the OpenAI HTTP API.
pub struct OpenAiTransport {
    client: Client<OpenAIConfig>,
    runtime: Runtime,
}

impl std::fmt::Debug for OpenAiTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiTransport").finish_non_exhaustive()
    }
}

impl OpenAiTransport {
    /// Creates a transport from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when no API key is configured, or an I/O
    /// error if the runtime cannot start.
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config.api_key().ok_or_else(|| Error::Config {
            message: format!("{API_KEY_ENV} is required"),
        })?;

        let mut openai = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base) = config.base_url.as_deref().filter(|b| !b.trim().is_empty()) {
            openai = openai.with_api_base(base);
        }

        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self {
            client: Client::with_config(openai),
            runtime,
        })
    }
}

impl ModelTransport for OpenAiTransport {
    fn complete(&self, request: &ModelRequest) -> std::result::Result<String, TransportError> {
        let body = build_chat_body(request).map_err(map_openai_error)?;
        debug!(model = %request.model, verbosity = %request.verbosity, "OpenAI chat request");

        let response: CreateChatCompletionResponse = self
            .runtime
            .block_on(self.client.chat().create_byot(body))
            .map_err(map_openai_error)?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| TransportError::Response("no choices in response".to_string()))
    }

    fn transcribe(
        &self,
        request: &TranscriptionRequest,
    ) -> std::result::Result<String, TransportError> {
        let body = CreateTranscriptionRequestArgs::default()
            .file(AudioInput::from_vec_u8(
                request.file_name.clone(),
                request.audio.clone(),
            ))
            .model(request.model.clone())
            .build()
            .map_err(map_openai_error)?;
        debug!(model = %request.model, file = %request.file_name, "OpenAI transcription request");

        let response = self
            .runtime
            .block_on(self.client.audio().transcribe(body))
            .map_err(map_openai_error)?;
        Ok(response.text)
    }
}

fn build_chat_request(
    request: &ModelRequest,
) -> std::result::Result<CreateChatCompletionRequest, OpenAIError> {
    let content = match &request.media {
        None => ChatCompletionRequestUserMessageContent::Text(request.prompt.clone()),
        Some(media) => {
            let text = ChatCompletionRequestMessageContentPartTextArgs::default()
                .text(request.prompt.clone())
                .build()?;
            let image = ChatCompletionRequestMessageContentPartImageArgs::default()
                .image_url(ImageUrlArgs::default().url(media.data_url()).build()?)
                .build()?;
            ChatCompletionRequestUserMessageContent::Array(vec![
                ChatCompletionRequestUserMessageContentPart::Text(text),
                ChatCompletionRequestUserMessageContentPart::ImageUrl(image),
            ])
        }
    };

    let message = ChatCompletionRequestUserMessageArgs::default()
        .content(content)
        .build()?;

    CreateChatCompletionRequestArgs::default()
        .model(request.model.clone())
        .messages(vec![message.into()])
        .reasoning_effort(effort(request.reasoning_effort))
        .build()
}

/// Serializes the typed request and adds `verbosity`, which the typed
/// request struct has no field for.
fn build_chat_body(request: &ModelRequest) -> std::result::Result<Value, OpenAIError> {
    let typed = build_chat_request(request)?;
    let mut body = serde_json::to_value(&typed).map_err(OpenAIError::JSONDeserialize)?;
    if let Some(fields) = body.as_object_mut() {
        fields.insert(
            "verbosity".to_string(),
            Value::from(request.verbosity.as_str()),
        );
    }
    Ok(body)
}

const fn effort(level: ReasoningEffort) -> async_openai::types::ReasoningEffort {
    match level {
        ReasoningEffort::Low => async_openai::types::ReasoningEffort::Low,
        ReasoningEffort::Medium => async_openai::types::ReasoningEffort::Medium,
        ReasoningEffort::High => async_openai::types::ReasoningEffort::High,
    }
}

fn map_openai_error(err: OpenAIError) -> TransportError {
    match err {
        OpenAIError::ApiError(api) => {
            let auth = api.code.as_deref() == Some("invalid_api_key")
                || api.message.contains("Incorrect API key");
            if auth {
                TransportError::Auth(api.message)
            } else {
                TransportError::Api(api.message)
            }
        }
        OpenAIError::Reqwest(e) => TransportError::Request(e.to_string()),
        OpenAIError::JSONDeserialize(e) => TransportError::Response(e.to_string()),
        OpenAIError::InvalidArgument(msg) => TransportError::Request(msg),
        other => TransportError::Request(other.to_string()),
    }
}

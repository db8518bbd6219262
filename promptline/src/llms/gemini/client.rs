//! Gemini API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::chat::ChatRequest;
use crate::error::{LlmError, Result};
use crate::message::Message;

use super::config::GeminiConfig;
use super::types::{
    GeminiContent, GeminiError, GeminiErrorResponse, GeminiPart, GenerateContentRequest,
    GenerationConfig,
};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini API client.
#[derive(Debug, Clone)]
pub struct Gemini {
    pub(crate) config: Arc<GeminiConfig>,
    pub(crate) client: Client,
}

impl Gemini {
    /// Provider name used in errors and logs.
    pub const PROVIDER: &'static str = "gemini";
    /// Default model.
    pub const DEFAULT_MODEL: &'static str = GeminiConfig::DEFAULT_MODEL;

    /// Create a new Gemini client with the given configuration.
    ///
    /// A missing API key is accepted; the service decides whether the
    /// request is allowed.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        let client = builder
            .build()
            .map_err(|e| LlmError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Create a client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env())
    }

    /// Get the default model.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Returns `true` if a credential is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.config.has_api_key()
    }

    /// Build the streaming endpoint URL for a model.
    pub(crate) fn stream_url(&self, model: &str) -> String {
        format!(
            "{}/models/{model}:streamGenerateContent?alt=sse",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Build a JSON POST request, attaching the key when one is configured.
    pub(crate) fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream");

        if let Some(key) = &self.config.api_key {
            req = req.header(API_KEY_HEADER, key);
        }

        req
    }

    /// Resolve the model for a request, falling back to the configured one.
    pub(crate) fn resolve_model<'a>(&'a self, request: &'a ChatRequest) -> &'a str {
        if request.model.is_empty() {
            &self.config.model
        } else {
            &request.model
        }
    }

    /// Convert a message to Gemini format.
    pub(crate) fn convert_message(msg: &Message) -> GeminiContent {
        GeminiContent {
            role: Some(msg.role),
            parts: vec![GeminiPart::text(msg.content.clone())],
        }
    }

    /// Build the request body.
    pub(crate) fn build_body(request: &ChatRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: request.messages.iter().map(Self::convert_message).collect(),
            generation_config: GenerationConfig {
                response_mime_type: request.response_mime_type.as_str().to_owned(),
            },
        }
    }

    /// Parse a non-success response.
    pub(crate) fn parse_error(&self, status: u16, body: &str) -> LlmError {
        match serde_json::from_str::<GeminiErrorResponse>(body) {
            Ok(envelope) => self.convert_error(Some(status), envelope.error),
            Err(_) if matches!(status, 401 | 403) => {
                LlmError::auth(Self::PROVIDER, self.auth_message(body))
            }
            Err(_) => LlmError::http_status(status, body.to_owned()),
        }
    }

    /// Convert an error reported by the service, from a status response or
    /// from inside the event stream.
    pub(crate) fn convert_error(&self, status: Option<u16>, error: GeminiError) -> LlmError {
        let status = status.or(error.code);

        match status {
            Some(401 | 403) => LlmError::auth(Self::PROVIDER, self.auth_message(&error.message)),
            Some(400) if error.is_api_key_error() => {
                LlmError::auth(Self::PROVIDER, self.auth_message(&error.message))
            }
            Some(429) => LlmError::rate_limited(Self::PROVIDER),
            _ => {
                let code = error
                    .status
                    .or_else(|| status.map(|s| s.to_string()))
                    .unwrap_or_else(|| "UNKNOWN".to_owned());
                LlmError::provider_code(Self::PROVIDER, code, error.message)
            }
        }
    }

    fn auth_message(&self, message: &str) -> String {
        if self.has_api_key() {
            message.to_owned()
        } else {
            format!("{message} ({} is not set)", GeminiConfig::API_KEY_ENV)
        }
    }
}

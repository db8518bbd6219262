//! Chat request types and the provider trait.
//!
//! This module provides:
//! - [`ChatRequest`]: the model id, the conversation and the response type
//! - [`ChatProvider`]: the seam between the runner and a generation backend
//! - [`ChunkStream`]: the lazy fragment sequence a provider hands back
//!
//! # Example
//!
//! ```rust,ignore
//! use promptline::prelude::*;
//!
//! let request = ChatRequest::new(Gemini::DEFAULT_MODEL).user("Hello!");
//! let mut stream = provider.chat_stream(&request).await?;
//! while let Some(chunk) = stream.next().await {
//!     if let StreamChunk::Text(text) = chunk? {
//!         print!("{text}");
//!     }
//! }
//! ```

use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::Message;
use crate::stream::StreamChunk;

/// Boxed stream of response chunks.
///
/// The stream is finite and cannot be restarted. It yields at most one `Err`,
/// after which it ends.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<StreamChunk>> + Send>>;

/// Content type the model is asked to produce.
///
/// Replies are written to a terminal, so plain text is the only type offered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseMimeType {
    /// Plain text.
    #[default]
    #[serde(rename = "text/plain")]
    TextPlain,
}

impl ResponseMimeType {
    /// Returns the MIME string sent on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TextPlain => "text/plain",
        }
    }
}

/// A streaming generation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier (e.g., "gemini-2.5-pro-preview-03-25").
    /// Empty means the provider's default model.
    #[serde(default)]
    pub model: String,

    /// Conversation messages.
    #[serde(default)]
    pub messages: Vec<Message>,

    /// Requested response content type.
    #[serde(default)]
    pub response_mime_type: ResponseMimeType,
}

impl ChatRequest {
    /// Creates a new request with the specified model.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Adds a user message.
    #[must_use]
    pub fn user(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::user(content));
        self
    }

    /// Sets the response content type.
    #[must_use]
    pub const fn response_mime_type(mut self, mime: ResponseMimeType) -> Self {
        self.response_mime_type = mime;
        self
    }
}

/// A backend that can stream a generation request.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Opens one streaming request.
    ///
    /// Failures before the first byte of the response arrives are returned
    /// directly; failures after that are yielded by the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent or the service
    /// rejected it.
    async fn chat_stream(&self, request: &ChatRequest) -> Result<ChunkStream>;

    /// Returns the provider name used in error messages.
    fn provider_name(&self) -> &'static str;

    /// Returns the model used when a request leaves it empty.
    fn default_model(&self) -> &str;
}

#[async_trait]
impl<T: ChatProvider + ?Sized> ChatProvider for Arc<T> {
    async fn chat_stream(&self, request: &ChatRequest) -> Result<ChunkStream> {
        (**self).chat_stream(request).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn default_model(&self) -> &str {
        (**self).default_model()
    }
}

//! Scripted provider for tests.
//!
//! [`MockProvider`] replays a fixed list of text fragments and can fail either
//! before the stream opens or after a given number of fragments. It records
//! every request it receives so tests can check what would have been sent.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::chat::{ChatProvider, ChatRequest, ChunkStream};
use crate::error::{LlmError, Result};
use crate::stream::{StopReason, StreamChunk};

/// A chat provider that returns predefined fragments.
///
/// # Example
///
/// ```rust,ignore
/// use promptline::mock::MockProvider;
///
/// let provider = MockProvider::new(["Hello", ", world"]);
/// let failing = MockProvider::failing_after(["partial"], LlmError::stream("reset"));
/// ```
#[derive(Debug)]
pub struct MockProvider {
    model_id: String,
    fragments: Vec<String>,
    on_open: Option<LlmError>,
    after_fragments: Option<LlmError>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockProvider {
    /// Create a provider that streams the fragments and then completes.
    #[must_use]
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            model_id: "mock-model".to_owned(),
            fragments: fragments.into_iter().map(Into::into).collect(),
            on_open: None,
            after_fragments: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a provider that streams the fragments and then fails.
    #[must_use]
    pub fn failing_after<I, S>(fragments: I, error: LlmError) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            after_fragments: Some(error),
            ..Self::new(fragments)
        }
    }

    /// Create a provider whose request fails before any fragment.
    #[must_use]
    pub fn failing_on_open(error: LlmError) -> Self {
        Self {
            on_open: Some(error),
            ..Self::new(Vec::<String>::new())
        }
    }

    /// Set a custom model ID.
    #[must_use]
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    /// Returns every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    async fn chat_stream(&self, request: &ChatRequest) -> Result<ChunkStream> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if let Some(error) = &self.on_open {
            return Err(error.clone().into());
        }

        let mut items: Vec<Result<StreamChunk>> = self
            .fragments
            .iter()
            .map(|fragment| Ok(StreamChunk::text(fragment.clone())))
            .collect();

        match &self.after_fragments {
            Some(error) => items.push(Err(error.clone().into())),
            None => items.push(Ok(StreamChunk::done(Some(StopReason::Stop)))),
        }

        Ok(Box::pin(futures::stream::iter(items)))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn default_model(&self) -> &str {
        &self.model_id
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use futures::StreamExt;

    use super::*;

    #[tokio::test]
    async fn streams_fragments_then_done() {
        let provider = MockProvider::new(["a", "b"]);
        let chunks: Vec<_> = provider
            .chat_stream(&ChatRequest::new("m").user("hi"))
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].as_ref().unwrap(), &StreamChunk::text("a"));
        assert_eq!(
            chunks[2].as_ref().unwrap(),
            &StreamChunk::done(Some(StopReason::Stop))
        );
    }

    #[tokio::test]
    async fn failing_after_ends_with_error() {
        let provider = MockProvider::failing_after(["a"], LlmError::stream("reset"));
        let chunks: Vec<_> = provider
            .chat_stream(&ChatRequest::new("m"))
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(chunks.len(), 2);
        assert!(chunks[1].is_err());
    }

    #[tokio::test]
    async fn failing_on_open_returns_error() {
        let provider = MockProvider::failing_on_open(LlmError::network("refused"));
        assert!(provider.chat_stream(&ChatRequest::new("m")).await.is_err());
        assert_eq!(provider.requests().len(), 1);
    }

    #[test]
    fn test_mock_custom_id() {
        let provider = MockProvider::new(["x"]).with_model_id("custom-mock");
        assert_eq!(provider.default_model(), "custom-mock");
    }
}

//! Gemini ChatProvider implementation.

use async_trait::async_trait;

use crate::chat::{ChatProvider, ChatRequest, ChunkStream};
use crate::error::Result;

use super::client::Gemini;
use super::stream::decode_events;

#[async_trait]
impl ChatProvider for Gemini {
    async fn chat_stream(&self, request: &ChatRequest) -> Result<ChunkStream> {
        let model = self.resolve_model(request);
        let url = self.stream_url(model);
        let body = Self::build_body(request);

        tracing::debug!(
            model,
            turns = body.contents.len(),
            authenticated = self.has_api_key(),
            "opening generation stream"
        );

        let response = self.build_request(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let err = self.parse_error(status.as_u16(), &error_text);
            tracing::warn!(status = status.as_u16(), error = %err, "generation request rejected");
            return Err(err.into());
        }

        Ok(Box::pin(decode_events(self.clone(), response.bytes_stream())))
    }

    fn provider_name(&self) -> &'static str {
        Self::PROVIDER
    }

    fn default_model(&self) -> &str {
        self.model()
    }
}

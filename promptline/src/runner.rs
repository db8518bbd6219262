//! Prompt runner: one prompt in, streamed text out.
//!
//! [`PromptRunner`] opens a single streaming request through a
//! [`ChatProvider`] and writes every text fragment to an output sink the
//! moment it arrives, flushing after each write so nothing sits in a buffer.
//!
//! Two entry points share the same loop:
//!
//! - [`PromptRunner::stream_to`] returns the typed [`Error`] to the caller.
//! - [`PromptRunner::run`] reports the failure as an
//!   `Error generating content: ...` line on the same sink and never fails.

use std::io::Write;

use futures::StreamExt as _;
use tracing::{Instrument, debug, info_span, warn};

use crate::chat::{ChatProvider, ChatRequest, ChunkStream, ResponseMimeType};
use crate::error::{Error, Result};
use crate::stream::{StopReason, StreamChunk};
use crate::usage::Usage;

/// Prefix of the line written when generation fails.
pub const ERROR_PREFIX: &str = "Error generating content";

/// Render the failure line for an error, without a trailing newline.
#[must_use]
pub fn error_line(error: &Error) -> String {
    format!("{ERROR_PREFIX}: {error}")
}

/// What a completed run produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of text fragments written.
    pub fragments: usize,
    /// Number of bytes of text written.
    pub bytes: usize,
    /// Why the model stopped, if it said.
    pub stop_reason: Option<StopReason>,
    /// Latest token usage report, if any.
    pub usage: Option<Usage>,
}

impl RunSummary {
    /// Account for one chunk. Later usage reports replace earlier ones.
    pub fn record(&mut self, chunk: &StreamChunk) {
        match chunk {
            StreamChunk::Text(text) => {
                self.fragments += 1;
                self.bytes += text.len();
            }
            StreamChunk::Usage(usage) => self.usage = Some(*usage),
            StreamChunk::Done { stop_reason } => self.stop_reason = *stop_reason,
        }
    }
}

/// Result of [`PromptRunner::run`].
#[derive(Debug)]
pub enum RunOutcome {
    /// The stream finished normally.
    Completed(RunSummary),
    /// The request failed; the error line has already been written.
    Failed(Error),
}

impl RunOutcome {
    /// Returns `true` if the stream finished normally.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Returns the summary of a completed run.
    #[must_use]
    pub const fn summary(&self) -> Option<&RunSummary> {
        match self {
            Self::Completed(summary) => Some(summary),
            Self::Failed(_) => None,
        }
    }

    /// Returns the error of a failed run.
    #[must_use]
    pub const fn error(&self) -> Option<&Error> {
        match self {
            Self::Completed(_) => None,
            Self::Failed(error) => Some(error),
        }
    }
}

/// Streams a single prompt through a provider.
#[derive(Debug)]
pub struct PromptRunner<P> {
    provider: P,
    model: String,
}

impl<P: ChatProvider> PromptRunner<P> {
    /// Create a runner that uses the provider's default model.
    pub fn new(provider: P) -> Self {
        let model = provider.default_model().to_owned();
        Self { provider, model }
    }

    /// Use a different model id.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// The model id requests are sent to.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the request for a prompt: one user turn, plain-text response.
    #[must_use]
    pub fn request(&self, prompt: &str) -> ChatRequest {
        ChatRequest::new(&self.model)
            .user(prompt)
            .response_mime_type(ResponseMimeType::TextPlain)
    }

    /// Stream the reply to `prompt` into `out`.
    ///
    /// Fragments already written stay written when a later one fails.
    ///
    /// # Errors
    ///
    /// Returns the first error from opening the stream, from the stream
    /// itself, or from writing to `out`.
    pub async fn stream_to<W>(&self, prompt: &str, out: &mut W) -> Result<RunSummary>
    where
        W: Write + ?Sized,
    {
        let request = self.request(prompt);
        let span = info_span!(
            "generate",
            provider = self.provider.provider_name(),
            model = %self.model,
            prompt_len = prompt.len()
        );

        async move {
            let mut stream = self.provider.chat_stream(&request).await?;
            let mut summary = RunSummary::default();

            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                if let StreamChunk::Text(text) = &chunk {
                    out.write_all(text.as_bytes())?;
                    out.flush()?;
                }
                summary.record(&chunk);
            }

            debug!(
                fragments = summary.fragments,
                bytes = summary.bytes,
                stop_reason = summary.stop_reason.map(|r| r.as_str()),
                "generation finished"
            );
            Ok::<_, Error>(summary)
        }
        .instrument(span)
        .await
    }

    /// Stream the reply to `prompt` into `out`, reporting failures inline.
    ///
    /// On failure the line `Error generating content: <error>` is written to
    /// `out` directly after whatever was already streamed.
    pub async fn run<W>(&self, prompt: &str, out: &mut W) -> RunOutcome
    where
        W: Write + ?Sized,
    {
        match self.stream_to(prompt, out).await {
            Ok(summary) => RunOutcome::Completed(summary),
            Err(error) => {
                debug!(error = %error, "generation failed");
                let reported = writeln!(out, "{}", error_line(&error)).and_then(|()| out.flush());
                if let Err(io_error) = reported {
                    warn!(error = %io_error, "could not write the error line");
                }
                RunOutcome::Failed(error)
            }
        }
    }
}

/// Drain a chunk stream and return the concatenated text.
///
/// # Errors
///
/// Returns the first error the stream yields.
pub async fn collect_text(mut stream: ChunkStream) -> Result<String> {
    let mut text = String::new();
    while let Some(chunk) = stream.next().await {
        if let StreamChunk::Text(fragment) = chunk? {
            text.push_str(&fragment);
        }
    }
    Ok(text)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use crate::message::Role;
    use crate::mock::MockProvider;

    #[test]
    fn request_is_single_user_turn() {
        let runner = PromptRunner::new(MockProvider::new(["x"]).with_model_id("gemini-x"));
        let request = runner.request("What is Rust?");

        assert_eq!(request.model, "gemini-x");
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, Role::User);
        assert_eq!(request.messages[0].content, "What is Rust?");
        assert_eq!(request.response_mime_type, ResponseMimeType::TextPlain);
    }

    #[test]
    fn with_model_overrides_default() {
        let runner = PromptRunner::new(MockProvider::new(["x"])).with_model("other");
        assert_eq!(runner.model(), "other");
        assert_eq!(runner.request("p").model, "other");
    }

    #[test]
    fn error_line_format() {
        let error: Error = LlmError::network("connection refused").into();
        assert_eq!(
            error_line(&error),
            "Error generating content: connection refused"
        );
    }

    #[tokio::test]
    async fn stream_to_writes_fragments_in_order() {
        let runner = PromptRunner::new(MockProvider::new(["Hel", "lo", ", world"]));
        let mut out = Vec::new();

        let summary = runner.stream_to("hi", &mut out).await.unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Hello, world");
        assert_eq!(summary.fragments, 3);
        assert_eq!(summary.bytes, 12);
        assert_eq!(summary.stop_reason, Some(StopReason::Stop));
    }

    #[tokio::test]
    async fn stream_to_returns_typed_error() {
        let runner =
            PromptRunner::new(MockProvider::failing_on_open(LlmError::auth("mock", "no key")));
        let mut out = Vec::new();

        let err = runner.stream_to("hi", &mut out).await.unwrap_err();

        assert!(err.as_llm().is_some_and(LlmError::is_auth));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn run_reports_error_after_partial_output() {
        let runner = PromptRunner::new(MockProvider::failing_after(
            ["one ", "two"],
            LlmError::stream("connection reset"),
        ));
        let mut out = Vec::new();

        let outcome = runner.run("hi", &mut out).await;

        assert!(!outcome.is_success());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "one twoError generating content: connection reset\n"
        );
    }

    #[test]
    fn summary_records_chunks() {
        let mut summary = RunSummary::default();
        for chunk in [
            StreamChunk::text("Hel"),
            StreamChunk::Usage(Usage::with_total(8, 2, None)),
            StreamChunk::text("lo"),
            StreamChunk::Usage(Usage::with_total(8, 10, None)),
            StreamChunk::done(Some(StopReason::Length)),
        ] {
            summary.record(&chunk);
        }

        assert_eq!(summary.fragments, 2);
        assert_eq!(summary.bytes, 5);
        assert_eq!(summary.usage, Some(Usage::with_total(8, 10, None)));
        assert_eq!(summary.stop_reason, Some(StopReason::Length));
    }

    #[tokio::test]
    async fn collect_text_concatenates() {
        let provider = MockProvider::new(["a", "b", "c"]);
        let stream = provider.chat_stream(&ChatRequest::new("m")).await.unwrap();
        assert_eq!(collect_text(stream).await.unwrap(), "abc");
    }
}

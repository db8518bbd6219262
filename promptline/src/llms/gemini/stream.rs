//! Gemini SSE stream parsing.

use eventsource_stream::Eventsource;
use futures::{Stream, StreamExt, future, stream};

use crate::error::{LlmError, Result};
use crate::stream::{StopReason, StreamChunk};
use crate::usage::Usage;

use super::client::Gemini;
use super::types::{GeminiErrorResponse, GenerateContentResponse};

/// Parse the `data` field of one server-sent event.
pub fn parse_event(gemini: &Gemini, data: &str) -> Vec<Result<StreamChunk>> {
    let data = data.trim();
    if data.is_empty() {
        return Vec::new();
    }

    if let Ok(envelope) = serde_json::from_str::<GeminiErrorResponse>(data) {
        tracing::warn!(error = %envelope.error.message, "service reported an error mid-stream");
        return vec![Err(gemini.convert_error(None, envelope.error).into())];
    }

    match serde_json::from_str::<GenerateContentResponse>(data) {
        Ok(response) => convert_response(&response),
        Err(e) => {
            tracing::warn!("Failed to parse SSE payload: {e}, data: {data}");
            vec![Err(LlmError::response_format(
                "GenerateContentResponse JSON",
                format!("parse error: {e}, payload: {data}"),
            )
            .into())]
        }
    }
}

/// Convert a Gemini response payload to our format.
fn convert_response(response: &GenerateContentResponse) -> Vec<Result<StreamChunk>> {
    if response.candidates.is_empty()
        && let Some(reason) = response
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
    {
        return vec![Err(
            LlmError::empty_response(format!("prompt blocked ({reason})")).into(),
        )];
    }

    let mut results = Vec::new();

    if let Some(candidate) = response.candidates.first() {
        let text: String = candidate
            .content
            .iter()
            .flat_map(|content| &content.parts)
            .filter(|part| part.thought != Some(true))
            .filter_map(|part| part.text.as_deref())
            .collect();

        if !text.is_empty() {
            results.push(Ok(StreamChunk::text(text)));
        }
    }

    if let Some(meta) = response.usage_metadata {
        results.push(Ok(StreamChunk::Usage(Usage::with_total(
            meta.prompt_token_count,
            meta.candidates_token_count,
            meta.total_token_count,
        ))));
    }

    if let Some(reason) = response
        .candidates
        .first()
        .and_then(|candidate| candidate.finish_reason.as_deref())
    {
        tracing::trace!(
            finish_reason = reason,
            model_version = response.model_version.as_deref().unwrap_or_default(),
            response_id = response.response_id.as_deref().unwrap_or_default(),
            "stream finished"
        );
        results.push(Ok(StreamChunk::done(Some(StopReason::parse(reason)))));
    }

    results
}

/// Decode a raw SSE byte stream into chunks.
///
/// Events split across network reads are reassembled before parsing. A body
/// that ends without a single event carrying data yields
/// [`LlmError::EmptyResponse`]. The resulting stream ends after the first error.
pub fn decode_events<S, B, E>(gemini: Gemini, bytes: S) -> impl Stream<Item = Result<StreamChunk>>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let chunks = bytes
        .eventsource()
        .map(Some)
        .chain(stream::once(future::ready(None)))
        .scan(false, move |seen, event| {
            let chunks = match event {
                Some(Ok(event)) => {
                    tracing::trace!(bytes = event.data.len(), "received event");
                    *seen |= !event.data.trim().is_empty();
                    parse_event(&gemini, &event.data)
                }
                Some(Err(e)) => vec![Err(LlmError::stream(e.to_string()).into())],
                None if *seen => Vec::new(),
                None => {
                    tracing::warn!("response body ended without any event");
                    let error = LlmError::empty_response("no events in the response stream");
                    vec![Err(error.into())]
                }
            };
            future::ready(Some(stream::iter(chunks)))
        })
        .flatten();
    fuse_on_error(chunks)
}

/// End a chunk stream right after its first error.
pub fn fuse_on_error<S>(stream: S) -> impl Stream<Item = Result<StreamChunk>>
where
    S: Stream<Item = Result<StreamChunk>>,
{
    stream.scan(false, |failed, item| {
        if *failed {
            return future::ready(None);
        }
        *failed = item.is_err();
        future::ready(Some(item))
    })
}

//! Behavioral tests for the prompt runner against a scripted provider.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::sync::Arc;

use promptline::prelude::*;

fn output(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap()
}

#[tokio::test]
async fn multi_chunk_response_is_printed_in_order() {
    let fragments = ["The sky ", "is blue ", "because of ", "Rayleigh scattering."];
    let runner = PromptRunner::new(MockProvider::new(fragments));
    let mut out = Vec::new();

    let outcome = runner.run("Why is the sky blue?", &mut out).await;

    assert!(outcome.is_success());
    assert_eq!(output(out), fragments.concat());
    assert_eq!(outcome.summary().unwrap().fragments, 4);
}

#[tokio::test]
async fn no_separator_or_trailing_newline_is_added() {
    let runner = PromptRunner::new(MockProvider::new(["a", "b", "c\n"]));
    let mut out = Vec::new();

    runner.run("p", &mut out).await;

    assert_eq!(output(out), "abc\n");
}

#[tokio::test]
async fn failure_before_any_chunk_prints_only_the_error_line() {
    let runner = PromptRunner::new(MockProvider::failing_on_open(LlmError::auth(
        "gemini",
        "API key not valid. Please pass a valid API key.",
    )));
    let mut out = Vec::new();

    let outcome = runner.run("hello", &mut out).await;

    assert!(!outcome.is_success());
    assert_eq!(
        output(out),
        "Error generating content: [gemini] API key not valid. Please pass a valid API key.\n"
    );
}

#[tokio::test]
async fn failure_after_chunks_keeps_partial_output() {
    let runner = PromptRunner::new(MockProvider::failing_after(
        ["First, ", "second, "],
        LlmError::network("Connection failed: reset by peer"),
    ));
    let mut out = Vec::new();

    let outcome = runner.run("count", &mut out).await;

    let error = outcome.error().unwrap();
    assert!(matches!(error.as_llm(), Some(LlmError::Network(_))));
    assert_eq!(
        output(out),
        "First, second, Error generating content: Connection failed: reset by peer\n"
    );
}

#[tokio::test]
async fn empty_prompt_is_still_sent() {
    let provider = Arc::new(MockProvider::new(["ok"]));
    let runner = PromptRunner::new(Arc::clone(&provider));
    let mut out = Vec::new();

    let outcome = runner.run("", &mut out).await;

    assert!(outcome.is_success());
    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].messages.len(), 1);
    assert_eq!(requests[0].messages[0].content, "");
}

#[tokio::test]
async fn exactly_one_request_per_run() {
    let provider = Arc::new(MockProvider::failing_after(["x"], LlmError::stream("eof")));
    let runner = PromptRunner::new(Arc::clone(&provider));

    runner.run("once", &mut Vec::new()).await;

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].messages[0].role, Role::User);
    assert_eq!(requests[0].response_mime_type, ResponseMimeType::TextPlain);
}

#[tokio::test]
async fn independent_runners_share_nothing() {
    let first = PromptRunner::new(MockProvider::new(["one"]));
    let second = PromptRunner::new(MockProvider::new(["two"]));
    let (mut a, mut b) = (Vec::new(), Vec::new());

    let (ra, rb) = tokio::join!(first.run("a", &mut a), second.run("b", &mut b));

    assert!(ra.is_success() && rb.is_success());
    assert_eq!(output(a), "one");
    assert_eq!(output(b), "two");
}

/// A sink that rejects every write.
struct ClosedPipe;

impl std::io::Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn write_failure_is_reported_as_io_error() {
    let runner = PromptRunner::new(MockProvider::new(["text"]));

    let err = runner.stream_to("p", &mut ClosedPipe).await.unwrap_err();
    assert!(matches!(err, Error::Io(_)));

    let outcome = runner.run("p", &mut ClosedPipe).await;
    assert!(matches!(outcome, RunOutcome::Failed(Error::Io(_))));
}

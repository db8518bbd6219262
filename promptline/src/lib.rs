//! Promptline - stream one prompt through a generative model.
//!
//! This crate sends a single user prompt to Google Gemini's streaming
//! endpoint and writes the reply to any [`std::io::Write`] sink fragment by
//! fragment as it arrives.
//!
//! The pieces are split along a few seams:
//!
//! - [`chat::ChatProvider`] is the backend trait; [`llms::Gemini`] is the real
//!   implementation and [`mock::MockProvider`] a scripted one for tests.
//! - [`runner::PromptRunner`] drives one request and owns the output loop.
//! - [`error::Error`] keeps the failure cases apart even though the command
//!   line reports them all as one line.

pub mod chat;
pub mod error;
pub mod llms;
pub mod message;
pub mod mock;
pub mod prelude;
pub mod runner;
pub mod stream;
pub mod usage;

pub use error::{Error, LlmError, Result};

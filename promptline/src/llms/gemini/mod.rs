//! Google Gemini API client.
//!
//! Streams `streamGenerateContent` responses as server-sent events and turns
//! each payload into [`StreamChunk`](crate::stream::StreamChunk)s.

mod chat;
mod client;
mod config;
mod stream;
mod types;

pub use client::Gemini;
pub use config::GeminiConfig;

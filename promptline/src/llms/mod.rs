//! LLM backend implementations.
//!
//! # Available Backends
//!
//! - [`gemini`] - Google Gemini API (`streamGenerateContent`)

pub mod error;
pub mod gemini;

pub use error::LlmError;
pub use gemini::{Gemini, GeminiConfig};

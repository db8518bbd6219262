//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use promptline::prelude::*;
//! ```

pub use crate::chat::{ChatProvider, ChatRequest, ChunkStream, ResponseMimeType};
pub use crate::error::{Error, LlmError, Result};
pub use crate::llms::{Gemini, GeminiConfig};
pub use crate::message::{Message, Role};
pub use crate::mock::MockProvider;
pub use crate::runner::{PromptRunner, RunOutcome, RunSummary, collect_text, error_line};
pub use crate::stream::{StopReason, StreamChunk};
pub use crate::usage::Usage;

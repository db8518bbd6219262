//! Unified error types for promptline.
//!
//! [`Error`] wraps the generation failures described by [`LlmError`] together
//! with the local I/O failures that can happen around them.

pub use crate::llms::error::LlmError;

/// Result type alias for promptline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for promptline.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Generation request error.
    #[error("{0}")]
    Llm(#[from] LlmError),

    /// I/O error while writing output or reading input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the generation error, if this is one.
    #[must_use]
    pub const fn as_llm(&self) -> Option<&LlmError> {
        match self {
            Self::Llm(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Llm(err.into())
    }
}

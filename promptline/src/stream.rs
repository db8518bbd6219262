//! Streaming response types.
//!
//! A provider turns one request into an ordered sequence of [`StreamChunk`]s.
//! Text chunks are the fragments written to the user; usage and completion
//! markers ride along in the same sequence.

use serde::{Deserialize, Serialize};

use crate::usage::Usage;

/// A chunk of a streaming response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
#[non_exhaustive]
pub enum StreamChunk {
    /// Text fragment, in arrival order.
    Text(String),

    /// Token usage information.
    Usage(Usage),

    /// Stream is complete.
    Done {
        /// Stop reason from the model.
        stop_reason: Option<StopReason>,
    },
}

impl StreamChunk {
    /// Creates a text chunk.
    #[inline]
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// Creates a done chunk.
    #[must_use]
    pub const fn done(stop_reason: Option<StopReason>) -> Self {
        Self::Done { stop_reason }
    }

}

/// Reason why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum StopReason {
    /// Natural stop (end of response).
    #[default]
    Stop,
    /// Maximum token limit reached.
    Length,
    /// Content was withheld by safety systems.
    ContentFilter,
    /// Any other reason the service reports.
    Other,
}

impl StopReason {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Length => "length",
            Self::ContentFilter => "content_filter",
            Self::Other => "other",
        }
    }

    /// Parse a `finishReason` value (case-insensitive).
    ///
    /// - `STOP` → [`StopReason::Stop`]
    /// - `MAX_TOKENS` → [`StopReason::Length`]
    /// - `SAFETY`, `RECITATION`, `BLOCKLIST`, `PROHIBITED_CONTENT`, `SPII` →
    ///   [`StopReason::ContentFilter`]
    /// - anything else → [`StopReason::Other`]
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "STOP" => Self::Stop,
            "MAX_TOKENS" => Self::Length,
            "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => {
                Self::ContentFilter
            }
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod stream_chunk {
        use super::*;

        #[test]
        fn constructors() {
            assert_eq!(StreamChunk::text("Hello"), StreamChunk::Text("Hello".to_owned()));
            assert_eq!(
                StreamChunk::done(Some(StopReason::Length)),
                StreamChunk::Done {
                    stop_reason: Some(StopReason::Length)
                }
            );
        }

        #[test]
        fn serde_uses_snake_case_tags() {
            let json = serde_json::to_string(&StreamChunk::done(Some(StopReason::Stop))).unwrap();
            assert!(json.contains("\"type\":\"done\""));
            assert!(json.contains("\"stop\""));
        }

        #[test]
        fn text_chunk_serializes() {
            let json = serde_json::to_string(&StreamChunk::text("hi")).unwrap();
            assert_eq!(json, r#"{"type":"text","data":"hi"}"#);
        }
    }

    mod stop_reason {
        use super::*;

        #[test]
        fn default_is_stop() {
            assert_eq!(StopReason::default(), StopReason::Stop);
        }

        #[test]
        fn parse_gemini_values() {
            assert_eq!(StopReason::parse("STOP"), StopReason::Stop);
            assert_eq!(StopReason::parse("MAX_TOKENS"), StopReason::Length);
            assert_eq!(StopReason::parse("SAFETY"), StopReason::ContentFilter);
            assert_eq!(StopReason::parse("RECITATION"), StopReason::ContentFilter);
            assert_eq!(StopReason::parse("MALFORMED_FUNCTION_CALL"), StopReason::Other);
        }

        #[test]
        fn parse_case_insensitive() {
            assert_eq!(StopReason::parse("stop"), StopReason::Stop);
            assert_eq!(StopReason::parse("Max_Tokens"), StopReason::Length);
        }

        #[test]
        fn display_matches_as_str() {
            assert_eq!(StopReason::ContentFilter.to_string(), "content_filter");
        }
    }
}

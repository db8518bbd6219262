//! Token usage reported by the generation service.

use serde::{Deserialize, Serialize};

/// Token usage statistics for one request.
///
/// Gemini reports cumulative counts on every streamed payload, so the latest
/// report replaces any earlier one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Number of tokens in the prompt.
    #[serde(default)]
    pub prompt_tokens: u32,

    /// Number of tokens generated so far.
    #[serde(default)]
    pub completion_tokens: u32,

    /// Total tokens (prompt + completion, plus any thinking tokens).
    #[serde(default)]
    pub total_tokens: u32,
}

impl Usage {
    /// Create usage with an explicit total, falling back to the sum.
    #[must_use]
    pub fn with_total(prompt_tokens: u32, completion_tokens: u32, total: Option<u32>) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: total.unwrap_or_else(|| prompt_tokens.saturating_add(completion_tokens)),
        }
    }
}

impl std::fmt::Display for Usage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} prompt + {} completion = {} tokens",
            self.prompt_tokens, self.completion_tokens, self.total_tokens
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_total_is_the_sum() {
        let usage = Usage::with_total(8, 10, None);
        assert_eq!(usage.total_tokens, 18);
    }

    #[test]
    fn explicit_total_wins() {
        // thinking tokens count toward the total but not the completion
        let usage = Usage::with_total(8, 10, Some(42));
        assert_eq!(usage.total_tokens, 42);
    }

    #[test]
    fn huge_counts_saturate() {
        assert_eq!(Usage::with_total(u32::MAX, 1, None).total_tokens, u32::MAX);
        assert_eq!(Usage::with_total(u32::MAX, 1, Some(5)).total_tokens, 5);
    }

    #[test]
    fn display() {
        assert_eq!(
            Usage::with_total(1, 2, None).to_string(),
            "1 prompt + 2 completion = 3 tokens"
        );
    }
}

//! Message types sent to the generation service.
//!
//! A request carries a single user turn; the types still keep the role explicit
//! so the wire conversion does not have to guess it.

use serde::{Deserialize, Serialize};

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message written by the person asking.
    User,
    /// Message produced by the model.
    Model,
}

/// One conversation turn with plain text content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Author of the turn.
    pub role: Role,
    /// Text body, sent verbatim.
    pub content: String,
}

impl Message {
    /// Create a message with an explicit role.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_keeps_content_verbatim() {
        let msg = Message::user("  spaced\tprompt\n");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "  spaced\tprompt\n");
    }

    #[test]
    fn empty_content_is_allowed() {
        let msg = Message::user("");
        assert!(msg.content.is_empty());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap_or_default(), "\"user\"");
        let role: Role = serde_json::from_str("\"model\"").unwrap_or(Role::User);
        assert_eq!(role, Role::Model);
    }
}

//! Chat transcript entities.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

impl Sender {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "You",
            Self::Ai => "Bhavya",
        }
    }
}

/// One line of the local transcript. The backend keeps no history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub sent_at: DateTime<Local>,
}

impl ChatMessage {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            sent_at: Local::now(),
        }
    }

    #[must_use]
    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Ai,
            text: text.into(),
            sent_at: Local::now(),
        }
    }
}

/// Reply body from the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default = "default_sender")]
    pub sender: Sender,
}

const fn default_sender() -> Sender {
    Sender::Ai
}

impl From<ChatReply> for ChatMessage {
    fn from(reply: ChatReply) -> Self {
        Self {
            sender: reply.sender,
            text: reply.response,
            sent_at: Local::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_defaults_to_ai_sender() {
        let reply: ChatReply = serde_json::from_str(r#"{"response":"I'm listening. Go on."}"#).unwrap();
        assert_eq!(reply.sender, Sender::Ai);

        let message = ChatMessage::from(reply);
        assert_eq!(message.sender.label(), "Bhavya");
        assert_eq!(message.text, "I'm listening. Go on.");
    }
}

//! Chat use case.

use std::sync::Arc;

use tracing::debug;

use crate::domain::entities::{AuthToken, ChatMessage};
use crate::domain::errors::ApiError;
use crate::domain::ports::WellnessApiPort;

/// Sends one message to the companion and returns its reply.
pub struct ChatUseCase {
    api: Arc<dyn WellnessApiPort>,
}

impl ChatUseCase {
    #[must_use]
    pub const fn new(api: Arc<dyn WellnessApiPort>) -> Self {
        Self { api }
    }

    /// # Errors
    /// Returns `ApiError::InvalidRequest` for a blank message, or a backend error.
    pub async fn send(&self, token: &AuthToken, message: &str) -> Result<ChatMessage, ApiError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ApiError::invalid_request("message is empty"));
        }

        debug!(chars = message.chars().count(), "Sending chat message");
        let reply = self.api.send_chat_message(token, message).await?;
        Ok(ChatMessage::from(reply))
    }
}

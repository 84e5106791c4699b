use std::sync::Arc;

use bon::Builder;
use thiserror::Error;
use tracing::info;

use crate::models::types::{ChatRequest, ChatResponse, UserMessage};
use crate::traits::chat_api::{ChatApi, ChatApiError};

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("no message provided")]
    NoMessage,

    #[error(transparent)]
    Upstream(#[from] ChatApiError),
}

/// Validates a chat request and relays it to the completion service.
/// Holds no per-request state; one instance serves every request.
#[derive(Builder)]
pub struct ChatProxy {
    chat_api: Arc<dyn ChatApi>,
    #[builder(default = 200)]
    preview_chars: usize,
}

impl ChatProxy {
    pub async fn reply(&self, request: ChatRequest) -> Result<ChatResponse, ChatError> {
        let message = UserMessage::try_from(request).map_err(|_| ChatError::NoMessage)?;

        info!(
            message_len = message.len(),
            message_preview = %preview(message.as_str(), self.preview_chars),
            "chat: forwarding message"
        );
        let text = self.chat_api.complete(&message).await?;
        info!(
            response_len = text.len(),
            response_preview = %preview(&text, self.preview_chars),
            "chat: reply received"
        );

        Ok(ChatResponse { response: text })
    }
}

/// Trim text to at most `max_chars` characters, appending an ellipsis if trimmed.
/// Char-aware so UTF-8 sequences are never split.
fn preview(text: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut s: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    s.push('…');
    s
}

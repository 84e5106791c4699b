use async_trait::async_trait;
use thiserror::Error;

use crate::models::types::UserMessage;

/// Failure of a single completion call.
///
/// The split matters to callers: `Provider` means the upstream service
/// answered and refused (bad key, rate limit, overload), `Unexpected` covers
/// everything else (transport failure, timeout, a body we cannot read).
#[derive(Debug, Error)]
pub enum ChatApiError {
    #[error("provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("unexpected completion failure: {0}")]
    Unexpected(String),
}

/// Defines the interface for a chat-based language model API (e.g., OpenAI).
///
/// This trait allows consumers to abstract over different backend implementations
/// (e.g., real HTTP clients, recording doubles for testing).
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Sends one user turn and returns the assistant's reply text.
    async fn complete(&self, message: &UserMessage) -> Result<String, ChatApiError>;
}

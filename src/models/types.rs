use bon::Builder;
use derive_more::{AsRef, Display, Into};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: Some(message.into()) }
    }
}

/// Successful reply of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Error body shared by every JSON endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

/// A user turn that passed validation: trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Display, AsRef, Into)]
pub struct UserMessage(String);

impl UserMessage {
    /// Trims `raw`; returns `None` when nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<ChatRequest> for UserMessage {
    type Error = ChatRequest;

    fn try_from(request: ChatRequest) -> Result<Self, Self::Error> {
        match request.message.as_deref().and_then(UserMessage::parse) {
            Some(message) => Ok(message),
            None => Err(request),
        }
    }
}

/// Generation parameters sent with every completion call.
/// Fixed at startup, never taken from the client.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct CompletionParams {
    #[builder(into)]
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

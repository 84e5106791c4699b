use async_trait::async_trait;
use bon::Builder;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::types::{CompletionParams, UserMessage};
use crate::services::settings::LlmSettings;
use crate::traits::chat_api::{ChatApi, ChatApiError};

/// `ChatApi` backed by an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Builder)]
pub struct OpenAiChatApi {
    client: Client,
    #[builder(into)]
    endpoint: String,
    #[builder(into)]
    api_key: String,
    params: CompletionParams,
}

impl OpenAiChatApi {
    /// Builds the shared HTTP client once; every call reuses it.
    pub fn from_settings(llm: &LlmSettings) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = llm.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        info!(
            endpoint = %llm.completions_endpoint(),
            model = %llm.params.model,
            temperature = llm.params.temperature,
            max_tokens = llm.params.max_tokens,
            timeout = ?llm.request_timeout,
            "openai: client configured"
        );
        Ok(Self::builder()
            .client(client)
            .endpoint(llm.completions_endpoint())
            .api_key(llm.api_key.clone())
            .params(llm.params.clone())
            .build())
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Pulls `error.message` out of an OpenAI error body; falls back to the raw text.
fn provider_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(env) => env.error.message,
        Err(_) => body.to_string(),
    }
}

#[async_trait]
impl ChatApi for OpenAiChatApi {
    async fn complete(&self, message: &UserMessage) -> Result<String, ChatApiError> {
        let body = CompletionRequest {
            model: &self.params.model,
            messages: vec![WireMessage { role: "user", content: message.as_str() }],
            temperature: self.params.temperature,
            max_tokens: self.params.max_tokens,
        };

        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                // Client timeouts land here too: nothing came back from the provider.
                debug!(error = %e, timeout = e.is_timeout(), "openai: request failed");
                ChatApiError::Unexpected(format!("request failed: {e}"))
            })?;

        let code = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| ChatApiError::Unexpected(format!("failed to read response body: {e}")))?;

        if !code.is_success() {
            let message = provider_message(&text);
            debug!(status = %code, body_len = text.len(), "openai: provider error");
            return Err(ChatApiError::Provider { status: code.as_u16(), message });
        }

        let parsed: CompletionResponse = serde_json::from_str(&text)
            .map_err(|e| ChatApiError::Unexpected(format!("malformed completion response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ChatApiError::Unexpected("completion response has no content".to_string()))
    }
}

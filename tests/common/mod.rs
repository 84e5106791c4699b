#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use stchatbot::models::types::UserMessage;
use stchatbot::services::chat_proxy::ChatProxy;
use stchatbot::services::pages::PageRenderer;
use stchatbot::services::settings::{AppConfig, Settings};
use stchatbot::traits::chat_api::{ChatApi, ChatApiError};
use stchatbot::web::{AppState, router};
use tower::ServiceExt;

/// What the recording double answers with.
#[derive(Clone)]
pub enum Outcome {
    Reply(String),
    Provider(u16, String),
    Unexpected(String),
    Panic(String),
}

/// `ChatApi` double that records every call it receives.
pub struct RecordingChatApi {
    outcome: Outcome,
    calls: AtomicUsize,
    messages: Mutex<Vec<String>>,
}

impl RecordingChatApi {
    pub fn new(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self { outcome, calls: AtomicUsize::new(0), messages: Mutex::new(Vec::new()) })
    }

    pub fn replying(text: &str) -> Arc<Self> {
        Self::new(Outcome::Reply(text.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatApi for RecordingChatApi {
    async fn complete(&self, message: &UserMessage) -> Result<String, ChatApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.messages.lock().unwrap().push(message.as_str().to_string());
        match &self.outcome {
            Outcome::Reply(text) => Ok(text.clone()),
            Outcome::Provider(status, message) => {
                Err(ChatApiError::Provider { status: *status, message: message.clone() })
            }
            Outcome::Unexpected(detail) => Err(ChatApiError::Unexpected(detail.clone())),
            Outcome::Panic(msg) => panic!("{msg}"),
        }
    }
}

/// Router wired to the given double, with built-in static assets.
pub fn app(api: Arc<RecordingChatApi>) -> Router {
    let proxy = ChatProxy::builder().chat_api(api).build();
    let state = AppState::new(proxy, PageRenderer::new().unwrap());
    router(state, None)
}

/// Valid settings pointing the real OpenAI client at `base_url`.
pub fn settings_for(base_url: &str) -> Settings {
    let base_url = base_url.to_string();
    AppConfig::default()
        .apply_env(move |key| match key {
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            "OPENAI_BASE_URL" => Some(base_url.clone()),
            _ => None,
        })
        .validate()
        .unwrap()
}

pub async fn send(app: Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let res = app.oneshot(req).await.expect("request");
    let status = res.status();
    let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.expect("read body");
    (status, body.to_vec())
}

pub async fn get(app: Router, path: &str) -> (StatusCode, Vec<u8>) {
    let req = Request::builder().uri(path).body(Body::empty()).unwrap();
    send(app, req).await
}

pub async fn post_raw(app: Router, body: &str) -> (StatusCode, serde_json::Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, bytes) = send(app, req).await;
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

pub async fn post_chat(app: Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    post_raw(app, &body.to_string()).await
}

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use stchatbot::web::CHAT_BODY_LIMIT;

mod common;

use crate::common::{Outcome, RecordingChatApi, app, post_chat, post_raw, send};

#[rstest]
#[case("hello", "hello")]
#[case("   padded question   ", "padded question")]
#[case("multi\nline", "multi\nline")]
#[case("Привет, бот!", "Привет, бот!")]
#[tokio::test]
async fn valid_message_is_relayed(#[case] message: &str, #[case] forwarded: &str) {
    let api = RecordingChatApi::replying("  generated reply \n");
    let (status, body) = post_chat(app(api.clone()), json!({ "message": message })).await;

    assert_eq!(status, StatusCode::OK);
    // reply text is relayed verbatim
    assert_eq!(body, json!({ "response": "  generated reply \n" }));
    assert_eq!(api.calls(), 1);
    assert_eq!(api.messages(), vec![forwarded.to_string()]);
}

#[rstest]
#[case(json!({ "message": "" }))]
#[case(json!({ "message": "   " }))]
#[case(json!({ "message": "\t\n " }))]
#[case(json!({}))]
#[case(json!({ "text": "wrong field" }))]
#[case(json!({ "message": null }))]
#[tokio::test]
async fn missing_or_blank_message_is_rejected(#[case] payload: serde_json::Value) {
    let api = RecordingChatApi::replying("never");
    let (status, body) = post_chat(app(api.clone()), payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "No message provided" }));
    assert_eq!(api.calls(), 0);
}

#[rstest]
#[case("{not json")]
#[case("")]
#[case(r#"{"message": 42}"#)]
#[case(r#""just a string""#)]
#[tokio::test]
async fn unreadable_body_is_rejected_without_upstream_call(#[case] raw: &str) {
    let api = RecordingChatApi::replying("never");
    let (status, body) = post_raw(app(api.clone()), raw).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "No message provided" }));
    assert_eq!(api.calls(), 0);
}

#[tokio::test]
async fn missing_content_type_is_rejected_without_upstream_call() {
    let api = RecordingChatApi::replying("never");
    let req = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(r#"{"message":"hi"}"#))
        .unwrap();
    let (status, bytes) = send(app(api.clone()), req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "error": "No message provided" }));
    assert_eq!(api.calls(), 0);
}

#[tokio::test]
async fn oversized_message_is_too_large_not_missing() {
    let api = RecordingChatApi::replying("never");
    let payload = json!({ "message": "a".repeat(CHAT_BODY_LIMIT) }).to_string();
    let (status, body) = post_raw(app(api.clone()), &payload).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body, json!({ "error": "Request body too large" }));
    assert_eq!(api.calls(), 0);
}

#[tokio::test]
async fn message_just_under_limit_is_relayed() {
    let api = RecordingChatApi::replying("ok");
    let message = "a".repeat(CHAT_BODY_LIMIT - 64);
    let (status, body) = post_chat(app(api.clone()), json!({ "message": message })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "response": "ok" }));
    assert_eq!(api.calls(), 1);
}

#[rstest]
#[case(401, "Incorrect API key provided: sk-abc")]
#[case(429, "Rate limit reached for gpt-3.5-turbo")]
#[case(500, "The server had an error while processing your request")]
#[tokio::test]
async fn provider_error_maps_to_generic_message(#[case] status: u16, #[case] detail: &str) {
    let api = RecordingChatApi::new(Outcome::Provider(status, detail.to_string()));
    let (code, body) = post_chat(app(api.clone()), json!({ "message": "hi" })).await;

    assert_eq!(code, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "OpenAI API error occurred." }));
    assert!(!body.to_string().contains(detail));
    assert_eq!(api.calls(), 1);
}

#[tokio::test]
async fn unexpected_error_hides_raw_text() {
    let detail = "error sending request: operation timed out";
    let api = RecordingChatApi::new(Outcome::Unexpected(detail.to_string()));
    let (code, body) = post_chat(app(api.clone()), json!({ "message": "hi" })).await;

    assert_eq!(code, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "An unexpected error occurred." }));
    assert!(!body.to_string().contains("timed out"));
    assert_eq!(api.calls(), 1);
}

#[tokio::test]
async fn panic_in_upstream_client_is_contained() {
    let api = RecordingChatApi::new(Outcome::Panic("secret internal state".to_string()));
    let (code, body) = post_chat(app(api.clone()), json!({ "message": "hi" })).await;

    assert_eq!(code, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "An unexpected error occurred." }));
    assert!(!body.to_string().contains("secret"));
}

#[tokio::test]
async fn requests_do_not_share_state() {
    let api = RecordingChatApi::replying("ok");
    let router = app(api.clone());

    let (first, _) = post_chat(router.clone(), json!({ "message": "one" })).await;
    let (second, _) = post_chat(router.clone(), json!({ "message": "" })).await;
    let (third, _) = post_chat(router, json!({ "message": "three" })).await;

    assert_eq!((first, second, third), (StatusCode::OK, StatusCode::BAD_REQUEST, StatusCode::OK));
    assert_eq!(api.messages(), vec!["one".to_string(), "three".to_string()]);
}

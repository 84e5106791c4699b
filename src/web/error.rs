//! HTTP mapping for handler errors.
//!
//! Upstream and internal failures are logged with full detail; the client
//! only ever sees one of the fixed messages below.

use std::any::Any;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::models::types::ErrorBody;
use crate::services::chat_proxy::ChatError;
use crate::traits::chat_api::ChatApiError;

pub const NO_MESSAGE: &str = "No message provided";
pub const PROVIDER_ERROR: &str = "OpenAI API error occurred.";
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred.";
pub const BODY_TOO_LARGE: &str = "Request body too large";
pub const UNREADABLE_BODY: &str = "Failed to read request body";

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorBody::new(message))).into_response()
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        match self {
            ChatError::NoMessage => json_error(StatusCode::BAD_REQUEST, NO_MESSAGE),
            ChatError::Upstream(ChatApiError::Provider { status, message }) => {
                error!(upstream_status = status, message = %message, "chat: OpenAI API error");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, PROVIDER_ERROR)
            }
            ChatError::Upstream(ChatApiError::Unexpected(detail)) => {
                error!(detail = %detail, "chat: unexpected error");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_ERROR)
            }
        }
    }
}

/// Error type of `POST /api/chat`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Chat(#[from] ChatError),

    /// The body could not be buffered (over the size limit, or the stream failed).
    #[error("request body rejected: {0}")]
    Body(JsonRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Chat(err) => err.into_response(),
            ApiError::Body(rejection) => {
                let status = rejection.status();
                warn!(%status, reason = %rejection.body_text(), "chat: request body rejected");
                let message = if status == StatusCode::PAYLOAD_TOO_LARGE {
                    BODY_TOO_LARGE
                } else {
                    UNREADABLE_BODY
                };
                json_error(status, message)
            }
        }
    }
}

fn internal_error_text() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

#[derive(Debug, Error)]
#[error("page render failed: {0}")]
pub struct PageError(#[from] pub tera::Error);

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        error!(error = ?self.0, "pages: render failed");
        internal_error_text()
    }
}

fn panic_detail(err: &(dyn Any + Send)) -> &str {
    err.downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload")
}

/// Response for a panic caught inside the chat API routes.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    error!(panic = %panic_detail(err.as_ref()), "chat: handler panicked");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_ERROR)
}

/// Response for a panic anywhere outside the chat API: same plain 500 as a failed render.
pub fn page_panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    error!(panic = %panic_detail(err.as_ref()), "pages: handler panicked");
    internal_error_text()
}

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::Html;
use tracing::warn;

use crate::models::types::{ChatRequest, ChatResponse};
use crate::services::pages::Page;
use crate::web::AppState;
use crate::web::error::{ApiError, PageError};

fn render(state: &AppState, page: Page) -> Result<Html<String>, PageError> {
    Ok(Html(state.pages.render(page)?))
}

/// `GET /`
pub async fn home(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    render(&state, Page::Home)
}

/// `GET /stchatbot`
pub async fn stchatbot(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    render(&state, Page::Stchatbot)
}

/// `GET /history`: static page, nothing is stored.
pub async fn history(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    render(&state, Page::History)
}

/// `POST /api/chat`
///
/// A body that is not JSON of the shape `{"message": string}` is treated the
/// same as a missing message. A body that cannot be buffered at all (over the
/// size limit) keeps its own status.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(
            rejection @ (JsonRejection::JsonSyntaxError(_)
            | JsonRejection::JsonDataError(_)
            | JsonRejection::MissingJsonContentType(_)),
        ) => {
            warn!(reason = %rejection.body_text(), "chat: unreadable request body");
            ChatRequest::default()
        }
        Err(rejection) => return Err(ApiError::Body(rejection)),
    };
    Ok(Json(state.proxy.reply(request).await?))
}

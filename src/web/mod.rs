//! Front controller: the route table and the state shared by its handlers.

pub mod assets;
pub mod error;
pub mod handlers;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::services::chat_proxy::ChatProxy;
use crate::services::pages::{Page, PageRenderer};
use crate::web::error::{page_panic_response, panic_response};

pub const CHAT_ROUTE: &str = "/api/chat";

/// Largest accepted `POST /api/chat` body; larger bodies get 413.
pub const CHAT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Read-only state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<ChatProxy>,
    pub pages: Arc<PageRenderer>,
}

impl AppState {
    pub fn new(proxy: ChatProxy, pages: PageRenderer) -> Self {
        Self { proxy: Arc::new(proxy), pages: Arc::new(pages) }
    }
}

/// Builds the route table. Unmatched paths fall through to axum's 404.
pub fn router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let pages = Router::new()
        .route(Page::Home.path(), get(handlers::home))
        .route(Page::Stchatbot.path(), get(handlers::stchatbot))
        .route(Page::History.path(), get(handlers::history));

    let api = Router::new()
        .route(CHAT_ROUTE, post(handlers::chat))
        .layer(DefaultBodyLimit::max(CHAT_BODY_LIMIT))
        .layer(CatchPanicLayer::custom(panic_response));

    let router = Router::new().merge(pages).merge(api);
    let router = match static_dir {
        Some(dir) => router.nest_service("/static", ServeDir::new(dir)),
        None => router.route("/static/{*path}", get(assets::builtin_asset)),
    };

    guarded(router).with_state(state)
}

/// Outer layers: request tracing, and a plain 500 for panics the chat API
/// layer did not already turn into JSON.
fn guarded<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(CatchPanicLayer::custom(page_panic_response))
        .layer(TraceLayer::new_for_http())
}

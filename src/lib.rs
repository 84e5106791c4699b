pub mod models;
pub mod services;
pub mod subsystems;
pub mod traits;
pub mod web;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, anyhow};
use axum::Router;
use tokio::net::TcpListener;
use tokio_graceful_shutdown::{SubsystemBuilder, SubsystemHandle, Toplevel};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::services::chat_api_openai::OpenAiChatApi;
use crate::services::chat_proxy::ChatProxy;
use crate::services::pages::PageRenderer;
use crate::services::settings::{LoggingConfig, Settings};
use crate::subsystems::http_server::HttpServerSubsystem;
use crate::traits::chat_api::ChatApi;
use crate::web::AppState;

/// High-level entrypoint: load settings, init logging, serve until a signal arrives.
///
/// Configuration errors (a missing API key above all) are returned before
/// any socket is bound.
pub async fn run_with_config_path(path: Option<&Path>, bind: Option<SocketAddr>) -> anyhow::Result<()> {
    let mut settings = Settings::load_with_process_env(path).context("invalid configuration")?;
    if let Some(addr) = bind {
        settings.bind_addr = addr;
    }
    let _log_guard = init_logging(&settings.logging);
    run(settings).await
}

/// Initialize structured logging; also writes daily-rotated files when `logging.dir` is set.
/// The returned guard must live as long as the process.
pub fn init_logging(cfg: &LoggingConfig) -> Option<WorkerGuard> {
    let (file_layer, guard) = match cfg.dir.as_ref() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "stchatbot.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false).with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(&cfg.level))
        .with(fmt::layer().with_target(false).compact())
        .with(file_layer)
        .try_init();

    guard
}

/// Wires the production services into handler state.
pub fn build_state(settings: &Settings) -> anyhow::Result<AppState> {
    let chat_api: Arc<dyn ChatApi> = Arc::new(
        OpenAiChatApi::from_settings(&settings.llm).context("failed to build OpenAI HTTP client")?,
    );
    let proxy = ChatProxy::builder()
        .chat_api(chat_api)
        .preview_chars(settings.llm.log_preview_chars)
        .build();
    let pages = PageRenderer::new().context("failed to compile page templates")?;
    Ok(AppState::new(proxy, pages))
}

pub fn build_router(settings: &Settings) -> anyhow::Result<Router> {
    Ok(web::router(build_state(settings)?, settings.static_dir.clone()))
}

/// Binds `settings.bind_addr` and serves.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let listener = TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;
    serve(listener, settings).await
}

/// Serves on an already-bound listener under the graceful-shutdown supervisor.
pub async fn serve(listener: TcpListener, settings: Settings) -> anyhow::Result<()> {
    if settings.uses_default_secret() {
        warn!("SECRET_KEY not set; using the built-in placeholder");
    }
    let router = build_router(&settings)?;
    let server = HttpServerSubsystem::builder().listener(listener).router(router).build();

    info!(model = %settings.llm.params.model, "stchatbot starting");

    Toplevel::new(move |s: SubsystemHandle| async move {
        s.start(SubsystemBuilder::new("http", move |h| server.run(h)));
    })
    .catch_signals()
    .handle_shutdown_requests(settings.shutdown_timeout)
    .await
    .map_err(|e| anyhow!("shutdown error: {e}"))
}

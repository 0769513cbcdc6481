//! The studio's web front-end.

use std::num::NonZeroU16;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tracing::info;

use crate::config::StudioConfig;
use crate::constants::MAX_UPLOAD_BYTES;
use crate::fetcher::ImageFetcher;
use crate::studio::{ProgressPacer, StudioRegistry};

mod csrf;
mod extract;
mod flash;
mod images;
mod prelude;
mod views;

use views::generate::generate_handler;
use views::history::{history_download_handler, history_image_handler};
use views::upload::upload_handler;
use views::{reset_handler, root_handler};

#[derive(Clone, Debug)]
pub(crate) struct AppState {
    fetcher: ImageFetcher,
    studios: Arc<StudioRegistry>,
    pacer: ProgressPacer,
}

impl AppState {
    fn new(config: &StudioConfig, fetcher: ImageFetcher) -> Self {
        Self {
            fetcher,
            studios: Arc::new(StudioRegistry::new(
                config.session_idle,
                config.history_retain,
            )),
            pacer: ProgressPacer::new(config.progress_duration),
        }
    }
}

fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::get(root_handler))
        .route("/static/styles.css", axum::routing::get(styles_handler))
        .route("/generate", axum::routing::post(generate_handler))
        .route(
            "/upload",
            axum::routing::post(upload_handler).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/reset", axum::routing::post(reset_handler))
        .route(
            "/history/{sequence}/image.png",
            axum::routing::get(history_image_handler),
        )
        .route(
            "/history/{sequence}/download",
            axum::routing::get(history_download_handler),
        )
}

fn build_app(state: AppState, session_idle: Duration) -> Router {
    let idle_seconds = i64::try_from(session_idle.as_secs()).unwrap_or(i64::from(u32::MAX));
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(time::Duration::seconds(idle_seconds)));

    create_router()
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn styles_handler() -> impl IntoResponse {
    const STYLES: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/styles.css"));
    ([(CONTENT_TYPE, "text/css")], STYLES)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

/// Binds the listener and serves the studio until ctrl-c.
pub async fn setup_server(
    listen_addr: &str,
    port: NonZeroU16,
    config: &StudioConfig,
) -> Result<(), anyhow::Error> {
    let fetcher = ImageFetcher::new(&config.api_base_url, config.fetch_timeout)?;
    info!("Generating images via {}", fetcher.base_url());
    let app = build_app(AppState::new(config, fetcher), config.session_idle);

    let addr = format!("{}:{}", listen_addr, port);
    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

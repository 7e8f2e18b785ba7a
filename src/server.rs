//! HTTP surface: PDF generation, progress streaming, static landing page.
//!
//! `POST /generate-pdf` runs the pipeline synchronously on the handling task
//! and answers with the PDF as an attachment. `GET /stream-logs/{run_id}`
//! relays that run's progress messages as server-sent events. Clients that
//! want live progress pick a run id, open the stream, then submit the form
//! with the same id.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, HeaderName, StatusCode};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use futures::Stream;
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::github::{load_github_token, GithubClient};
use crate::pipeline::{Pipeline, PipelineResult};
use crate::progress::ProgressHub;

const RUN_ID_HEADER: HeaderName = HeaderName::from_static("x-run-id");

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<Pipeline>,
    hub: Arc<ProgressHub>,
}

impl AppState {
    pub fn new(pipeline: Arc<Pipeline>, hub: Arc<ProgressHub>) -> Self {
        Self { pipeline, hub }
    }
}

/// Build the service router.
pub fn router(state: AppState, static_dir: &std::path::Path) -> Router {
    Router::new()
        .route("/generate-pdf", post(generate_pdf))
        .route("/stream-logs/:run_id", get(stream_logs))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wire up state from config and serve until shutdown.
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let token = load_github_token(&config.github_token_file)?;
    let config = Arc::new(config);

    let host = Arc::new(GithubClient::new(config.github_api_base.clone(), token));
    let hub = Arc::new(ProgressHub::new());
    let pipeline = Arc::new(Pipeline::new(config.clone(), host, hub.clone()));

    let app = router(AppState::new(pipeline, hub), &config.static_dir);

    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid bind address {}: {e}", config.bind_addr))?;
    info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    #[serde(default)]
    url: String,
    run_id: Option<String>,
}

async fn generate_pdf(State(state): State<AppState>, Form(req): Form<GenerateRequest>) -> Response {
    if req.url.is_empty() {
        return (StatusCode::BAD_REQUEST, "URL is required").into_response();
    }

    let run_id = req
        .run_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let outcome = state.pipeline.run(&req.url, &run_id).await;
    state.hub.close(&run_id);

    match outcome {
        Ok(PipelineResult {
            coordinate,
            layout: _,
            artifact_path,
            artifact_bytes,
            lease,
        }) => {
            let filename = artifact_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "documentation.pdf".to_string());

            // The mirror is removed while the lease is still held, so a
            // queued run for the same repository starts from a clean slate.
            state.pipeline.remove_mirror(&coordinate).await;
            drop(lease);

            (
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename={filename}"),
                    ),
                    (RUN_ID_HEADER, run_id),
                ],
                artifact_bytes,
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, url = %req.url, "PDF generation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("PDF generation failed: {e}"),
            )
                .into_response()
        }
    }
}

async fn stream_logs(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.hub.subscribe(&run_id);

    let stream = futures::stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(message) => return Some((Ok(Event::default().data(message)), receiver)),
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "Progress subscriber lagged, messages dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

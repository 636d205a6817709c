//! HTTP surface: router, shared state, and the converter endpoints.
//!
//! Routes:
//! - `POST /converter/htmlToWord`: multipart upload, parts named `files`
//! - `GET /converter/result/{file_name}`: stream a converted artifact
//! - `GET /health`: liveness probe
//!
//! The upload route has the default body limit disabled; arbitrarily large
//! documents are accepted and streamed to disk by the staging step.

use crate::convert::{convert_upload, ConversionOutcome};
use crate::engine::EngineCoordinator;
use crate::error::ConvertError;
use crate::store::ArtifactStore;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// State shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ArtifactStore>,
    pub engine: Arc<EngineCoordinator>,
}

impl AppState {
    pub fn new(store: ArtifactStore, engine: EngineCoordinator) -> Self {
        Self {
            store: Arc::new(store),
            engine: Arc::new(engine),
        }
    }
}

/// Build the API router with all endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/converter/htmlToWord", post(html_to_word))
        .route("/converter/result/{file_name}", get(download))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn start_server(addr: &str, state: AppState) -> Result<(), std::io::Error> {
    tracing::info!("Starting html2doc server on {addr}");
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Convert the first usable uploaded part.
///
/// Parts are visited in upload order and only parts named `files` count.
/// Empty parts are skipped; the first non-empty one is validated and
/// converted, and the rest of the body is never read. If the whole list is
/// empty or zero-length the request is rejected with the catch-all message.
async fn html_to_word(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ConversionOutcome>, ConvertError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ConvertError::Multipart(e.to_string()))?
    {
        if field.name() != Some("files") {
            continue;
        }

        let content_type = field.content_type().map(str::to_owned);
        let file_name = field.file_name().unwrap_or_default().to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ConvertError::Multipart(e.to_string()))?;

        if bytes.is_empty() {
            continue;
        }
        if content_type.as_deref() != Some("text/html") {
            return Err(ConvertError::WrongContentType);
        }

        let outcome = convert_upload(&file_name, &bytes, &state.store, &state.engine).await?;
        return Ok(Json(outcome));
    }

    Err(ConvertError::EmptyUpload)
}

/// Stream a converted artifact out of the export directory.
async fn download(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<impl IntoResponse, ConvertError> {
    let path = state.store.resolve_download(&file_name)?;
    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|_| ConvertError::ExportNotFound)?;

    let body = axum::body::Body::from_stream(ReaderStream::new(file));
    Ok(([(header::CONTENT_TYPE, "application/msword")], body))
}

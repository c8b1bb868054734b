//! HTTP surface.
//!
//! One route path, two methods:
//!
//! * `POST /api/analyze`: multipart upload with the file in the `contract`
//!   field. `200` with the analysis object, or `{ "error": ... }` with the
//!   status from [`PipelineError::status`].
//! * `GET /api/analyze`: liveness probe, always `200`.
//!
//! A panic inside a handler is caught and answered with the unclassified
//! `500` body.
//!
//! Framework body limits are disabled on this router. The upload is read in
//! chunks and buffering stops one byte past [`MAX_FILE_SIZE`], so an
//! oversized file becomes `FileTooLarge` (400) instead of a bare 413, and
//! memory per request stays bounded by the ceiling.

use crate::analyze::Analyzer;
use crate::config::MAX_FILE_SIZE;
use crate::error::PipelineError;
use crate::pipeline::input::UploadedArtifact;
use crate::prompts::PromptVariant;
use axum::extract::multipart::{Field, MultipartError, MultipartRejection};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use bytes::BytesMut;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::net::SocketAddr;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

/// Route path for both the analysis endpoint and the liveness probe.
pub const ANALYZE_PATH: &str = "/api/analyze";

/// Multipart field carrying the contract file.
pub const CONTRACT_FIELD: &str = "contract";

/// Liveness probe body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: String,
}

/// Build the application router around a shared analyzer.
pub fn router(analyzer: Analyzer) -> Router {
    Router::new()
        .route(ANALYZE_PATH, post(analyze_handler).get(health_handler))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(analyzer)
}

/// A panicking handler still answers with the unclassified `{ "error": ... }` body.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    error!(%detail, "request handler panicked");
    PipelineError::Internal(format!("handler panicked: {detail}")).into_response()
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(analyzer: Analyzer, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}{}", listener.local_addr()?, ANALYZE_PATH);

    axum::serve(listener, router(analyzer))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
}

async fn analyze_handler(
    State(analyzer): State<Analyzer>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let artifact = match multipart {
        Ok(multipart) => read_contract(multipart).await,
        Err(rejection) => {
            debug!(error = %rejection, "request is not a readable multipart upload");
            None
        }
    };

    match analyzer.analyze(artifact).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: PromptVariant::ACTIVE.service_name().to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_body())).into_response()
    }
}

/// Find the `contract` field and read it. Any multipart error counts as no file.
async fn read_contract(mut multipart: Multipart) -> Option<UploadedArtifact> {
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some(CONTRACT_FIELD) => {
                return match read_capped(field).await {
                    Ok(artifact) => Some(artifact),
                    Err(e) => {
                        debug!(error = %e, "contract field could not be read");
                        None
                    }
                };
            }
            Ok(Some(_)) => continue,
            Ok(None) => return None,
            Err(e) => {
                debug!(error = %e, "malformed multipart body");
                return None;
            }
        }
    }
}

/// Buffer a field up to one byte past the size ceiling.
async fn read_capped(mut field: Field<'_>) -> Result<UploadedArtifact, MultipartError> {
    let filename = field.file_name().unwrap_or_default().to_string();
    let media_type = field.content_type().unwrap_or_default().to_string();

    let mut buf = BytesMut::new();
    let mut size: u64 = 0;
    while let Some(chunk) = field.chunk().await? {
        size += chunk.len() as u64;
        if size > MAX_FILE_SIZE {
            break;
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(UploadedArtifact {
        filename,
        media_type,
        size,
        content: buf.freeze(),
    })
}

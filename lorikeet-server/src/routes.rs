//! HTTP surface: wire types, handlers, router.

use crate::error::{ApiError, TranscribeError};
use crate::lifecycle::{Lifecycle, ModelState};
use crate::transcribe;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use lorikeet_asr::Recognizer;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// `POST /transcribe` request body.
///
/// `audio` is base64 of raw little-endian f32 PCM, mono, 16kHz.
#[derive(Debug, Deserialize, Serialize)]
pub struct TranscribeRequest {
    pub audio: String,
}

/// `POST /transcribe` response body.
#[derive(Debug, Deserialize, Serialize)]
pub struct TranscribeResponse {
    pub text: String,
}

/// `GET /health` response body.
#[derive(Debug, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Build the router over a shared lifecycle.
pub fn router<R>(lifecycle: Arc<Lifecycle<R>>) -> Router
where
    R: Recognizer + Send + 'static,
{
    Router::new()
        .route("/health", get(health::<R>))
        .route("/transcribe", post(handle_transcribe::<R>))
        .with_state(lifecycle)
}

/// GET /health
async fn health<R>(State(lifecycle): State<Arc<Lifecycle<R>>>) -> Json<HealthResponse>
where
    R: Recognizer + Send + 'static,
{
    Json(HealthResponse {
        status: lifecycle.state().to_string(),
    })
}

/// POST /transcribe
async fn handle_transcribe<R>(
    State(lifecycle): State<Arc<Lifecycle<R>>>,
    Json(request): Json<TranscribeRequest>,
) -> Result<Json<TranscribeResponse>, ApiError>
where
    R: Recognizer + Send + 'static,
{
    // Readiness gate runs before any decoding work
    let state = lifecycle.state();
    if state != ModelState::Ready {
        return Err(TranscribeError::NotReady(state).into());
    }

    let text = tokio::task::spawn_blocking(move || transcribe::run(&lifecycle, &request.audio))
        .await
        .map_err(TranscribeError::from)??;

    Ok(Json(TranscribeResponse { text }))
}

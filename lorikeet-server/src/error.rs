//! Request-pipeline errors and their HTTP mapping.

use crate::lifecycle::ModelState;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failure of one stage of the transcription pipeline.
#[derive(Debug, Error)]
pub enum TranscribeError {
    /// Precondition failed: no model installed
    #[error("model not ready: {0}")]
    NotReady(ModelState),

    /// Request payload was not valid base64
    #[error("invalid base64 audio: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Writing the temporary WAV failed
    #[error("failed to write audio: {0}")]
    Wav(#[from] hound::Error),

    /// Temporary file IO failed
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Model invocation failed
    #[error(transparent)]
    Model(#[from] lorikeet_asr::Error),

    /// The blocking inference task died
    #[error("inference task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// An error rendered to the client as `{"detail": ...}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "detail": self.detail }));
        (self.status, body).into_response()
    }
}

impl From<TranscribeError> for ApiError {
    fn from(err: TranscribeError) -> Self {
        let status = match err {
            TranscribeError::NotReady(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

//! lorikeet-server: HTTP transcription service.
//!
//! One model, loaded once at startup; two endpoints:
//!
//! - `GET /health` reports the model lifecycle state
//! - `POST /transcribe` turns a base64 f32 PCM payload into text
//!
//! The lifecycle is constructed in `main` and passed into the router, so
//! tests can drive the same handlers with a fake recognizer.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod routes;
pub mod transcribe;

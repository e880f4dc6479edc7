//! Model lifecycle: one-shot load and readiness state.

use lorikeet_asr::TdtRecognizer;
#[allow(unused_imports)]
use ort::execution_providers::*;
use ort::session::Session;
use ort::session::builder::SessionBuilder;
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::path::Path;
use std::time::Instant;

/// Readiness of the process-wide model.
///
/// Transitions at most once, from `Loading` to `Ready` or `Error`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModelState {
    Loading,
    Ready,
    Error(String),
}

impl fmt::Display for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelState::Loading => f.write_str("loading"),
            ModelState::Ready => f.write_str("ready"),
            ModelState::Error(reason) => write!(f, "error: {reason}"),
        }
    }
}

/// Owner of the single model instance and its readiness state.
///
/// Constructed once at startup and handed to request handlers by `Arc`.
/// The model sits behind a `Mutex` because inference needs `&mut`; that
/// mutex is the serialization point for concurrent transcription calls.
pub struct Lifecycle<R> {
    state: RwLock<ModelState>,
    model: Mutex<Option<R>>,
}

impl<R> Lifecycle<R> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(ModelState::Loading),
            model: Mutex::new(None),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ModelState {
        self.state.read().clone()
    }

    /// Install the loaded model. No-op unless currently loading.
    pub fn ready(&self, model: R) {
        let mut state = self.state.write();
        if matches!(*state, ModelState::Loading) {
            *self.model.lock() = Some(model);
            *state = ModelState::Ready;
        }
    }

    /// Record a load failure. No-op unless currently loading.
    pub fn fail(&self, reason: impl Into<String>) {
        let mut state = self.state.write();
        if matches!(*state, ModelState::Loading) {
            let reason = reason.into();
            tracing::error!(reason = %reason, "model load failed");
            *state = ModelState::Error(reason);
        }
    }

    /// Run `op` against the model, serialized with other callers.
    ///
    /// Returns `None` when no model is installed.
    pub fn run<T>(&self, op: impl FnOnce(&mut R) -> T) -> Option<T> {
        self.model.lock().as_mut().map(op)
    }
}

impl<R> Default for Lifecycle<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// ONNX session builder with execution providers from Cargo features.
///
/// The first available provider wins; CPU is the implicit fallback.
fn session_builder() -> Result<SessionBuilder, ort::Error> {
    Session::builder()?.with_execution_providers([
        #[cfg(feature = "cuda")]
        CUDAExecutionProvider::default().build(),
        #[cfg(feature = "tensorrt")]
        TensorRTExecutionProvider::default().build(),
        #[cfg(feature = "openvino")]
        OpenVINOExecutionProvider::default().build(),
        #[cfg(feature = "directml")]
        DirectMLExecutionProvider::default().build(),
        #[cfg(feature = "coreml")]
        CoreMLExecutionProvider::default().build(),
    ])
}

/// Load the model from `dir`, recording the outcome in the lifecycle.
///
/// A missing directory and a failed construction both end in the `Error`
/// state; neither is fatal to the process. Runs exactly once per process,
/// on a blocking task.
pub fn load_from_dir(lifecycle: &Lifecycle<TdtRecognizer>, dir: &Path) {
    let resolved = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());

    if !resolved.exists() {
        lifecycle.fail(format!("model not found at {}", resolved.display()));
        return;
    }

    let builder = match session_builder() {
        Ok(builder) => builder,
        Err(e) => {
            lifecycle.fail(e.to_string());
            return;
        }
    };

    tracing::info!(dir = %resolved.display(), "loading model");
    let start = Instant::now();

    match TdtRecognizer::from_dir(&resolved, Some(builder)) {
        Ok(model) => {
            tracing::info!(duration = ?start.elapsed(), "model ready");
            lifecycle.ready(model);
        }
        Err(e) => lifecycle.fail(e.to_string()),
    }
}

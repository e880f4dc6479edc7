//! Error types organized by processing stage.

use ndarray::ShapeError;
use ndarray_stats::errors::MinMaxError;
use thiserror::Error;

/// Recognition error variants organized by processing stage.
#[derive(Debug, Error)]
pub enum Error {
    /// Model artifact resolution error
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// Audio loading stage error
    #[error(transparent)]
    Audio(#[from] AudioError),

    /// Model inference stage error
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Artifact directory and vocabulary errors.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// Required artifact file missing
    #[error("model file not found: {name} in {dir}")]
    MissingFile { name: String, dir: String },

    /// None of the candidate file names resolved
    #[error("no model file matched candidates in {dir}")]
    NoCandidate { dir: String },

    /// Vocabulary file contained no pieces
    #[error("empty vocabulary: {0}")]
    EmptyVocabulary(String),

    /// IO error while reading artifact files
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Audio loading and validation errors.
#[derive(Debug, Error)]
pub enum AudioError {
    /// Sample rate validation failed
    #[error("invalid sample rate: expected {expected}Hz, got {got}Hz")]
    InvalidSampleRate { expected: u32, got: u32 },

    /// Channel count validation failed
    #[error("invalid channel count: expected mono or stereo, got {0} channels")]
    InvalidChannels(u16),

    /// IO error during audio loading
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// WAV file format error
    #[error(transparent)]
    Hound(#[from] hound::Error),
}

/// Model inference errors (ONNX, ndarray operations).
#[derive(Debug, Error)]
pub enum ModelError {
    /// Missing expected output tensor
    #[error("missing model output: {name}")]
    MissingOutput { name: String },

    /// Duration index out of bounds
    #[error("duration index {index} out of bounds (max {max})")]
    DurationOutOfRange { index: usize, max: usize },

    /// ONNX Runtime error
    #[error(transparent)]
    Ort(#[from] ort::Error),

    /// ndarray shape error
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// ndarray-stats min/max error
    #[error(transparent)]
    MinMax(#[from] MinMaxError),
}

/// Result type alias for recognition operations.
pub type Result<T> = std::result::Result<T, Error>;

// Nested From implementations for automatic conversion chains

// hound::Error -> AudioError -> Error
impl From<hound::Error> for Error {
    fn from(e: hound::Error) -> Self {
        Error::Audio(AudioError::Hound(e))
    }
}

// std::io::Error -> AudioError -> Error
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Audio(AudioError::Io(e))
    }
}

// ort::Error -> ModelError -> Error
impl From<ort::Error> for Error {
    fn from(e: ort::Error) -> Self {
        Error::Model(ModelError::Ort(e))
    }
}

// ShapeError -> ModelError -> Error
impl From<ShapeError> for Error {
    fn from(e: ShapeError) -> Self {
        Error::Model(ModelError::Shape(e))
    }
}

// MinMaxError -> ModelError -> Error
impl From<MinMaxError> for Error {
    fn from(e: MinMaxError) -> Self {
        Error::Model(ModelError::MinMax(e))
    }
}

//! Model artifact location and required files.

use crate::error::{ArtifactError, Result};
use std::path::{Path, PathBuf};

/// Hugging Face repository the downloader fetches from.
pub const MODEL_REPO: &str = "istupakov/parakeet-tdt-0.6b-v3-onnx";

/// Files a complete model snapshot consists of.
pub const MODEL_FILES: &[&str] = &[
    "encoder-model.onnx",
    "encoder-model.onnx.data",
    "decoder_joint-model.onnx",
    "vocab.txt",
];

/// Default model directory, relative to the process working directory.
pub const DEFAULT_MODEL_DIR: &str = "transcription-model";

/// A local directory holding a model snapshot.
#[derive(Clone, Debug)]
pub struct ModelDir {
    root: PathBuf,
}

impl ModelDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a file name within the directory.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        let path = self.root.join(name);
        if path.is_file() {
            Ok(path)
        } else {
            Err(ArtifactError::MissingFile {
                name: name.to_string(),
                dir: self.root.display().to_string(),
            }
            .into())
        }
    }

    /// Resolve the first candidate file name that exists.
    pub fn resolve_any(&self, candidates: &[&str]) -> Result<PathBuf> {
        candidates
            .iter()
            .find_map(|name| self.resolve(name).ok())
            .ok_or_else(|| {
                ArtifactError::NoCandidate {
                    dir: self.root.display().to_string(),
                }
                .into()
            })
    }
}

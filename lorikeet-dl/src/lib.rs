//! lorikeet-dl: fetch the Parakeet model snapshot from the Hugging Face Hub.
//!
//! Each step emits one JSON line on stdout:
//!
//! ```text
//! {"message":"downloading encoder-model.onnx..."}
//! {"status":"complete","message":"model ready at transcription-model"}
//! ```
//!
//! Downloads land in the home-derived hub cache and are then copied into
//! the directory the server reads from. The process exits non-zero on any
//! failure, after a final `{"status":"error",...}` line.

use eyre::{Result, WrapErr};
use hf_hub::api::sync::ApiBuilder;
use lorikeet_asr::artifact::{DEFAULT_MODEL_DIR, MODEL_FILES, MODEL_REPO};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Terminal outcome of a downloader run.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Complete,
    Error,
}

/// One line of downloader output.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum StatusLine {
    /// Intermediate progress
    Step { message: String },
    /// Final line of the run
    Terminal { status: Outcome, message: String },
}

impl StatusLine {
    pub fn step(message: impl Into<String>) -> Self {
        StatusLine::Step {
            message: message.into(),
        }
    }

    pub fn complete(message: impl Into<String>) -> Self {
        StatusLine::Terminal {
            status: Outcome::Complete,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        StatusLine::Terminal {
            status: Outcome::Error,
            message: message.into(),
        }
    }
}

/// Print a status line to stdout, flushed so watchers see it immediately.
pub fn emit(line: &StatusLine) {
    if let Ok(json) = serde_json::to_string(line) {
        println!("{json}");
        let _ = std::io::stdout().flush();
    }
}

/// Hub cache directory under the user's home.
pub fn cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("huggingface")
        .join("hub")
}

/// Directory the server loads from by default.
pub fn default_target_dir() -> PathBuf {
    PathBuf::from(DEFAULT_MODEL_DIR)
}

/// Fetch the model snapshot into `target_dir`, emitting progress lines.
///
/// Files already present in the target are skipped. The hub client keeps
/// its own cache, so a re-run after a partial failure resumes from there.
pub fn fetch_snapshot(target_dir: &Path) -> Result<()> {
    emit(&StatusLine::step(format!("locating snapshot {MODEL_REPO}...")));

    let api = ApiBuilder::new()
        .with_cache_dir(cache_dir())
        .build()
        .wrap_err("failed to initialize hub client")?;
    let repo = api.model(MODEL_REPO.to_string());

    std::fs::create_dir_all(target_dir)
        .wrap_err_with(|| format!("failed to create {}", target_dir.display()))?;

    for &name in MODEL_FILES {
        let target = target_dir.join(name);

        if target.exists() {
            emit(&StatusLine::step(format!("{name} already present, skipping")));
            continue;
        }

        emit(&StatusLine::step(format!("downloading {name}...")));

        let cached = repo
            .get(name)
            .wrap_err_with(|| format!("download failed for {name}"))?;

        if cached != target {
            std::fs::copy(&cached, &target)
                .wrap_err_with(|| format!("failed to copy {name} into place"))?;
        }
    }

    Ok(())
}

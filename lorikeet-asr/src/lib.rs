//! lorikeet-asr: Parakeet TDT speech recognition over ONNX Runtime.
//!
//! The crate loads a model snapshot from a local directory and transcribes
//! 16kHz mono WAV files. Callers depend on the [`traits::Recognizer`] seam
//! and the [`hypothesis::ModelOutput`] shapes rather than on the concrete
//! decoder.
//!
//! ```ignore
//! use lorikeet_asr::{Recognizer, TdtRecognizer};
//! use std::path::Path;
//!
//! let mut model = TdtRecognizer::from_dir(Path::new("transcription-model"), None)?;
//! let output = model.transcribe_files(&[Path::new("clip.wav")])?;
//! println!("{}", output.best_text().unwrap_or_default());
//! ```

pub mod artifact;
pub mod audio;
pub mod error;
pub mod features;
pub mod hypothesis;
pub mod tdt;
pub mod traits;
pub mod vocab;

pub use error::{Error, Result};
pub use hypothesis::{Hypothesis, ModelOutput, TokenSpan};
pub use tdt::TdtRecognizer;
pub use traits::Recognizer;

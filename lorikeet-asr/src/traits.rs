//! The recognizer seam between model implementations and callers.

use crate::error::Result;
use crate::hypothesis::ModelOutput;
use std::path::Path;

/// A loaded speech recognition model.
///
/// Produces one hypothesis per input file, in input order.
pub trait Recognizer {
    /// Transcribe audio files.
    ///
    /// Note: takes `&mut self` because ONNX Runtime's `Session::run`
    /// requires it; callers serialize access accordingly.
    fn transcribe_files(&mut self, paths: &[&Path]) -> Result<ModelOutput>;
}

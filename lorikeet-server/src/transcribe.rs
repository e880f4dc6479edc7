//! The per-request pipeline: decode, materialize, invoke, extract.

use crate::error::TranscribeError;
use crate::lifecycle::Lifecycle;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use lorikeet_asr::{Recognizer, audio};
use tempfile::NamedTempFile;

/// Decode a base64 payload into little-endian f32 samples.
///
/// A trailing remainder shorter than one sample (1 to 3 bytes) is dropped;
/// every call applies the same truncation.
pub fn decode_samples(audio_b64: &str) -> Result<Vec<f32>, TranscribeError> {
    let bytes = STANDARD.decode(audio_b64)?;

    let samples = bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    Ok(samples)
}

/// Write samples to a uniquely named temporary WAV file.
///
/// The returned handle removes the file when dropped, on every exit path;
/// removal of an already-missing file is ignored.
pub fn write_temp_wav(samples: &[f32]) -> Result<NamedTempFile, TranscribeError> {
    let file = tempfile::Builder::new()
        .prefix("transcribe-")
        .suffix(".wav")
        .tempfile()?;

    audio::write_float_wav(file.as_file(), samples)?;

    Ok(file)
}

/// Run the full pipeline against the lifecycle's model. Blocking.
///
/// Call from a blocking task; model invocation serializes on the lifecycle
/// mutex while decode and file IO from other requests proceed.
pub fn run<R: Recognizer>(
    lifecycle: &Lifecycle<R>,
    audio_b64: &str,
) -> Result<String, TranscribeError> {
    let samples = decode_samples(audio_b64)?;
    let wav = write_temp_wav(&samples)?;

    let output = lifecycle
        .run(|model| model.transcribe_files(&[wav.path()]))
        .ok_or_else(|| TranscribeError::NotReady(lifecycle.state()))??;

    let text = output
        .best_text()
        .map(|text| text.trim().to_string())
        .unwrap_or_default();

    Ok(text)
}

//! WAV loading and writing at the model's fixed sample rate.

use crate::error::{AudioError, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::{Seek, Write};
use std::path::Path;

/// Expected sample rate for recognition (16kHz)
pub const SAMPLE_RATE: u32 = 16000;

/// WAV spec for materialized request audio: 32-bit float, mono, 16kHz.
pub fn float_spec() -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    }
}

/// Load audio from a WAV file.
///
/// Returns audio samples and WAV specification.
pub fn load_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, WavSpec)> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<hound::Result<_>>()?,
        SampleFormat::Int => reader
            .samples::<i16>()
            .map(|s| s.map(|s| s as f32 / i16::MAX as f32))
            .collect::<hound::Result<_>>()?,
    };

    Ok((samples, spec))
}

/// Load a WAV file as mono f32 samples at 16kHz.
///
/// Validates the sample rate and downmixes stereo to mono.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the sample rate is not
/// 16kHz, or the channel count is 0 or greater than 2.
pub fn read_mono(path: impl AsRef<Path>) -> Result<Vec<f32>> {
    let (mut samples, spec) = load_wav(path)?;

    if spec.sample_rate != SAMPLE_RATE {
        return Err(AudioError::InvalidSampleRate {
            expected: SAMPLE_RATE,
            got: spec.sample_rate,
        }
        .into());
    }

    if spec.channels == 0 || spec.channels > 2 {
        return Err(AudioError::InvalidChannels(spec.channels).into());
    }

    if spec.channels == 2 {
        samples = samples
            .chunks(2)
            .map(|pair| pair.iter().sum::<f32>() / 2.0)
            .collect();
    }

    Ok(samples)
}

/// Write f32 samples as a 16kHz mono float WAV to `writer`.
pub fn write_float_wav<W: Write + Seek>(writer: W, samples: &[f32]) -> Result<()> {
    let mut wav = WavWriter::new(writer, float_spec())?;
    for &sample in samples {
        wav.write_sample(sample)?;
    }
    wav.finalize()?;
    Ok(())
}

//! Log-mel feature extraction for the Parakeet TDT frontend.

use crate::audio::SAMPLE_RATE;
use ndarray::Array2;
use rustfft::{FftPlanner, num_complex::Complex};
use std::f32::consts::PI;

/// Mel frontend configuration.
#[derive(Clone, Debug)]
pub struct FeatureConfig {
    pub n_mels: usize,
    pub n_fft: usize,
    pub hop_length: usize,
    pub win_length: usize,
    pub preemphasis: f32,
    pub sample_rate: usize,
}

impl FeatureConfig {
    /// Parakeet TDT frontend (128 mel features).
    pub const TDT: Self = Self {
        n_mels: 128,
        n_fft: 512,
        hop_length: 160,
        win_length: 400,
        preemphasis: 0.97,
        sample_rate: SAMPLE_RATE as usize,
    };

    /// Convert an encoder frame index to seconds.
    ///
    /// `subsampling` is the encoder's downsampling factor over mel frames.
    pub fn frame_to_secs(&self, frame: usize, subsampling: usize) -> f32 {
        (frame * subsampling * self.hop_length) as f32 / self.sample_rate as f32
    }

    /// Extract log-mel features from 16kHz mono samples.
    ///
    /// Returns a `(frames, n_mels)` matrix. The input must span at least one
    /// analysis window; callers gate shorter inputs.
    pub fn extract(&self, samples: &[f32]) -> Array2<f32> {
        let emphasized = preemphasize(samples, self.preemphasis);
        let power = power_spectrogram(&emphasized, self.n_fft, self.hop_length, self.win_length);

        let banks = mel_banks(self.n_fft, self.n_mels, self.sample_rate);
        let mel = banks.dot(&power).mapv(|x| x.max(1e-10).ln());

        normalize_features(mel.t().to_owned())
    }
}

/// High-frequency emphasis: `y[i] = x[i] - coef * x[i-1]`.
fn preemphasize(samples: &[f32], coef: f32) -> Vec<f32> {
    let mut out = Vec::with_capacity(samples.len());
    let mut prev = 0.0;
    for &x in samples {
        out.push(x - coef * prev);
        prev = x;
    }
    out
}

/// Hann-windowed STFT power spectrogram, `(n_fft / 2 + 1, frames)`.
fn power_spectrogram(
    samples: &[f32],
    n_fft: usize,
    hop_length: usize,
    win_length: usize,
) -> Array2<f32> {
    let window: Vec<f32> = (0..win_length)
        .map(|i| 0.5 - 0.5 * ((2.0 * PI * i as f32) / (win_length as f32 - 1.0)).cos())
        .collect();

    let num_frames = (samples.len() - win_length) / hop_length + 1;
    let freq_bins = n_fft / 2 + 1;
    let mut spectrogram = Array2::<f32>::zeros((freq_bins, num_frames));

    let fft = FftPlanner::<f32>::new().plan_fft_forward(n_fft);
    let mut frame = vec![Complex::new(0.0f32, 0.0); n_fft];

    for frame_idx in 0..num_frames {
        let start = frame_idx * hop_length;
        let span = win_length.min(samples.len() - start);

        frame.fill(Complex::new(0.0, 0.0));
        for i in 0..span {
            frame[i] = Complex::new(samples[start + i] * window[i], 0.0);
        }

        fft.process(&mut frame);

        for (k, slot) in spectrogram.column_mut(frame_idx).iter_mut().enumerate() {
            let magnitude = frame[k].norm();
            *slot = magnitude * magnitude;
        }
    }

    spectrogram
}

fn hz_to_mel(freq: f32) -> f32 {
    2595.0 * (1.0 + freq / 700.0).log10()
}

fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0_f32.powf(mel / 2595.0) - 1.0)
}

/// Triangular mel filterbank, `(n_mels, n_fft / 2 + 1)`.
fn mel_banks(n_fft: usize, n_mels: usize, sample_rate: usize) -> Array2<f32> {
    let freq_bins = n_fft / 2 + 1;
    let mut banks = Array2::<f32>::zeros((n_mels, freq_bins));

    let max_mel = hz_to_mel(sample_rate as f32 / 2.0);
    let mel_points: Vec<f32> = (0..=n_mels + 1)
        .map(|i| mel_to_hz(max_mel * i as f32 / (n_mels + 1) as f32))
        .collect();

    let bin_width = sample_rate as f32 / n_fft as f32;

    for mel_idx in 0..n_mels {
        let left = mel_points[mel_idx];
        let center = mel_points[mel_idx + 1];
        let right = mel_points[mel_idx + 2];

        for freq_idx in 0..freq_bins {
            let freq = freq_idx as f32 * bin_width;

            if freq >= left && freq <= center {
                banks[[mel_idx, freq_idx]] = (freq - left) / (center - left);
            } else if freq > center && freq <= right {
                banks[[mel_idx, freq_idx]] = (right - freq) / (right - center);
            }
        }
    }

    banks
}

/// Per-feature mean/variance normalization over time.
fn normalize_features(mut features: Array2<f32>) -> Array2<f32> {
    let num_frames = features.shape()[0];

    for mut column in features.columns_mut() {
        let mean: f32 = column.iter().sum::<f32>() / num_frames as f32;
        let variance: f32 =
            column.iter().map(|&x| (x - mean).powi(2)).sum::<f32>() / num_frames as f32;
        let std = variance.sqrt().max(1e-10);

        for val in column.iter_mut() {
            *val = (*val - mean) / std;
        }
    }

    features
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tdt_config_matches_model_frontend() {
        let config = FeatureConfig::TDT;
        assert_eq!(config.n_mels, 128);
        assert_eq!(config.n_fft, 512);
        assert_eq!(config.hop_length, 160);
        assert_eq!(config.win_length, 400);
        assert_eq!(config.sample_rate, 16000);
    }

    #[test]
    fn extract_shape_for_one_second() {
        let config = FeatureConfig::TDT;
        let samples = vec![0.0f32; config.sample_rate];

        let features = config.extract(&samples);

        let expected_frames = (samples.len() - config.win_length) / config.hop_length + 1;
        assert_eq!(features.shape(), &[expected_frames, config.n_mels]);
        assert!(features.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn extract_is_normalized_per_feature() {
        let config = FeatureConfig::TDT;
        let samples: Vec<f32> = (0..config.sample_rate)
            .map(|i| (i as f32 * 0.01).sin() * 0.5)
            .collect();

        let features = config.extract(&samples);

        for column in features.columns() {
            let mean: f32 = column.iter().sum::<f32>() / column.len() as f32;
            assert!(mean.abs() < 1e-3, "column mean {mean} not near zero");
        }
    }

    #[test]
    fn frame_to_secs_scales_with_subsampling() {
        let config = FeatureConfig::TDT;
        // one encoder frame = 8 mel hops = 8 * 160 samples at 16kHz
        assert!((config.frame_to_secs(1, 8) - 0.08).abs() < 1e-6);
        assert_eq!(config.frame_to_secs(0, 8), 0.0);
    }
}

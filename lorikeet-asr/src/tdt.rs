//! Parakeet TDT inference: ONNX sessions and greedy decoding.

use crate::artifact::ModelDir;
use crate::audio;
use crate::error::{ModelError, Result};
use crate::features::FeatureConfig;
use crate::hypothesis::{Hypothesis, ModelOutput, TokenSpan};
use crate::traits::Recognizer;
use crate::vocab::Vocabulary;
use ndarray::prelude::*;
use ndarray_stats::QuantileExt;
use ort::session::Session;
use ort::session::builder::SessionBuilder;
use ort::{inputs, value::Tensor, value::Value};
use std::path::Path;

const ENCODER_CANDIDATES: &[&str] = &[
    "encoder-model.onnx",
    "encoder.onnx",
    "encoder-model.int8.onnx",
];

const DECODER_CANDIDATES: &[&str] = &[
    "decoder_joint-model.onnx",
    "decoder_joint.onnx",
    "decoder_joint-model.int8.onnx",
];

/// Cap on tokens emitted from a single encoder frame.
const MAX_SYMBOLS_PER_FRAME: usize = 10;

/// Prediction-network LSTM state shape: (layers, batch, hidden).
const PRED_STATE: (usize, usize, usize) = (2, 1, 640);

/// A non-blank token emitted by the greedy decoder.
#[derive(Clone, Debug)]
struct Emission {
    token_id: usize,
    frame: usize,
    skip: usize,
    logit: f32,
}

/// Parakeet TDT (Token-and-Duration Transducer) recognizer.
///
/// The decoder predicts a token and a frame duration at each step; the
/// duration advances the encoder frame cursor, so most frames are never
/// visited.
pub struct TdtRecognizer {
    features: FeatureConfig,
    encoder: Session,
    decoder_joint: Session,
    vocab: Vocabulary,
    durations: Vec<usize>,
}

impl TdtRecognizer {
    /// Encoder subsampling factor over mel frames (8x).
    pub const SUBSAMPLING: usize = 8;

    /// Load a recognizer from a snapshot directory.
    ///
    /// `builder` configures execution providers; `None` runs on CPU.
    pub fn from_dir(dir: &Path, builder: Option<SessionBuilder>) -> Result<Self> {
        let dir = ModelDir::new(dir);

        let encoder_path = dir.resolve_any(ENCODER_CANDIDATES)?;
        let decoder_path = dir.resolve_any(DECODER_CANDIDATES)?;
        let vocab = Vocabulary::from_file(&dir.resolve("vocab.txt")?)?;

        let builder = match builder {
            Some(builder) => builder,
            None => Session::builder().map_err(ModelError::Ort)?,
        };

        let encoder = builder
            .clone()
            .commit_from_file(&encoder_path)
            .map_err(ModelError::Ort)?;

        let decoder_joint = builder
            .commit_from_file(&decoder_path)
            .map_err(ModelError::Ort)?;

        tracing::debug!(
            dir = %dir.root().display(),
            vocab_size = vocab.size(),
            "recognizer loaded"
        );

        Ok(Self {
            features: FeatureConfig::TDT,
            encoder,
            decoder_joint,
            vocab,
            durations: vec![0, 1, 2, 3, 4],
        })
    }

    fn frame_to_secs(&self, frame: usize) -> f32 {
        self.features.frame_to_secs(frame, Self::SUBSAMPLING)
    }

    /// Run the encoder over a feature matrix, returning frames and length.
    fn encode(&mut self, features: Array2<f32>) -> Result<(Array3<f32>, usize)> {
        let num_frames = features.shape()[0];

        let length = Value::from_array(Array1::from_elem((1,), num_frames as i64))
            .map_err(ModelError::Ort)?;
        let signal = Value::from_array(features.reversed_axes().insert_axis(Axis(0)))
            .map_err(ModelError::Ort)?;

        let mut outputs = self
            .encoder
            .run(inputs!(
                "audio_signal" => signal,
                "length" => length,
            ))
            .map_err(ModelError::Ort)?;

        let encoded = outputs
            .remove("outputs")
            .ok_or_else(|| ModelError::MissingOutput {
                name: "outputs".to_string(),
            })?;

        let encoded_lengths =
            outputs
                .remove("encoded_lengths")
                .ok_or_else(|| ModelError::MissingOutput {
                    name: "encoded_lengths".to_string(),
                })?;

        let encoded = encoded
            .try_extract_array::<f32>()
            .map_err(ModelError::Ort)?
            .to_owned()
            .into_dimensionality::<Ix3>()
            .map_err(ModelError::Shape)?;

        let encoded_lengths = encoded_lengths
            .try_extract_array::<i64>()
            .map_err(ModelError::Ort)?
            .to_owned()
            .into_dimensionality::<Ix1>()
            .map_err(ModelError::Shape)?;

        Ok((encoded, encoded_lengths[0].max(0) as usize))
    }

    /// Greedy token-and-duration decoding over encoder frames.
    fn decode_greedy(&mut self, encoded: &Array3<f32>, encoded_len: usize) -> Result<Vec<Emission>> {
        let blank = self.vocab.size();

        let mut state_1 = Tensor::from_array(Array3::<f32>::zeros(PRED_STATE))
            .map_err(ModelError::Ort)?
            .into_dyn();
        let mut state_2 = Tensor::from_array(Array3::<f32>::zeros(PRED_STATE))
            .map_err(ModelError::Ort)?
            .into_dyn();

        let mut target =
            Tensor::from_array(Array2::from_elem((1, 1), blank as i32)).map_err(ModelError::Ort)?;
        let target_length =
            Tensor::from_array(Array1::from_elem((1,), 1)).map_err(ModelError::Ort)?;

        let mut emissions = Vec::new();
        let mut frame = 0;

        while frame + 1 < encoded_len {
            let enc_frame = encoded
                .slice_axis(Axis(2), (frame..frame + 1).into())
                .into_owned();
            let enc_frame = Tensor::from_array(enc_frame).map_err(ModelError::Ort)?;

            let mut advanced = false;

            // Label looping: one frame may emit several tokens before the
            // decoder predicts a non-zero duration.
            for _ in 0..MAX_SYMBOLS_PER_FRAME {
                let mut outputs = self
                    .decoder_joint
                    .run(inputs!(
                        "encoder_outputs" => &enc_frame,
                        "targets" => &target,
                        "target_length" => &target_length,
                        "input_states_1" => &state_1,
                        "input_states_2" => &state_2,
                    ))
                    .map_err(ModelError::Ort)?;

                let logits: ArrayViewD<f32> = outputs["outputs"]
                    .try_extract_array()
                    .map_err(ModelError::Ort)?;
                let logits = logits.flatten();

                // Logit layout: [vocab_0..vocab_n, blank, duration_0..duration_4]
                let token_logits = logits.slice_axis(Axis(0), (0..blank + 1).into());
                let token_id = token_logits.argmax().map_err(ModelError::MinMax)?;
                let token_logit = token_logits[token_id];

                let duration_logits = logits.slice_axis(Axis(0), (blank + 1..).into());
                let duration_idx = duration_logits.argmax().map_err(ModelError::MinMax)?;

                let skip = self.durations.get(duration_idx).copied().ok_or_else(|| {
                    ModelError::DurationOutOfRange {
                        index: duration_idx,
                        max: self.durations.len() - 1,
                    }
                })?;

                if token_id != blank {
                    state_1 = outputs.remove("output_states_1").ok_or_else(|| {
                        ModelError::MissingOutput {
                            name: "output_states_1".to_string(),
                        }
                    })?;
                    state_2 = outputs.remove("output_states_2").ok_or_else(|| {
                        ModelError::MissingOutput {
                            name: "output_states_2".to_string(),
                        }
                    })?;

                    emissions.push(Emission {
                        token_id,
                        frame,
                        skip,
                        logit: token_logit,
                    });

                    target[[0, 0]] = token_id as i32;
                }

                tracing::trace!(frame, skip);

                frame = encoded_len.min(frame + skip);

                if skip != 0 {
                    advanced = true;
                    break;
                }
            }

            // Symbol cap reached with zero-duration predictions only
            if !advanced {
                frame += 1;
            }
        }

        Ok(emissions)
    }

    /// Render emissions into a hypothesis and its token timings.
    fn render(&self, emissions: &[Emission]) -> (Hypothesis, Vec<TokenSpan>) {
        if emissions.is_empty() {
            return (Hypothesis::Bare(String::new()), Vec::new());
        }

        let ids: Vec<usize> = emissions.iter().map(|e| e.token_id).collect();
        let text = self.vocab.decode(&ids);

        let score =
            emissions.iter().map(|e| e.logit).sum::<f32>() / emissions.len() as f32;

        let spans = emissions
            .iter()
            .map(|e| TokenSpan {
                text: self.vocab.piece_text(e.token_id),
                start: self.frame_to_secs(e.frame),
                end: self.frame_to_secs(e.frame + e.skip),
            })
            .collect();

        (Hypothesis::Scored { text, score }, spans)
    }

    fn transcribe_path(&mut self, path: &Path) -> Result<(Hypothesis, Vec<TokenSpan>)> {
        let samples = audio::read_mono(path)?;

        // Shorter than one analysis window: nothing to decode
        if samples.len() < self.features.win_length {
            return Ok((Hypothesis::Bare(String::new()), Vec::new()));
        }

        let features = self.features.extract(&samples);
        let (encoded, encoded_len) = self.encode(features)?;
        let emissions = self.decode_greedy(&encoded, encoded_len)?;

        tracing::debug!(
            path = %path.display(),
            tokens = emissions.len(),
            "transcribed file"
        );

        Ok(self.render(&emissions))
    }
}

impl Recognizer for TdtRecognizer {
    fn transcribe_files(&mut self, paths: &[&Path]) -> Result<ModelOutput> {
        let mut hypotheses = Vec::with_capacity(paths.len());
        let mut timings = Vec::with_capacity(paths.len());

        for path in paths {
            let (hypothesis, spans) = self.transcribe_path(path)?;
            hypotheses.push(hypothesis);
            timings.push(spans);
        }

        Ok(ModelOutput::WithTimings {
            hypotheses,
            timings,
        })
    }
}

//! Transcription hypotheses and model-output normalization.

/// A decoded token with its position in the audio, in seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenSpan {
    pub text: String,
    pub start: f32,
    pub end: f32,
}

/// A candidate transcription.
///
/// Models differ in what they attach to a hypothesis; both shapes expose
/// their text the same way.
#[derive(Clone, Debug, PartialEq)]
pub enum Hypothesis {
    /// Text with a decoder confidence score
    Scored { text: String, score: f32 },
    /// Plain text
    Bare(String),
}

impl Hypothesis {
    pub fn text(&self) -> &str {
        match self {
            Hypothesis::Scored { text, .. } => text,
            Hypothesis::Bare(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Hypothesis::Scored { text, .. } => text,
            Hypothesis::Bare(text) => text,
        }
    }
}

/// Output of one transcription pass, one hypothesis per input file.
///
/// Some decoders return the hypothesis list alone, others pair it with
/// per-file token timings. [`ModelOutput::best_text`] collapses both.
#[derive(Clone, Debug, PartialEq)]
pub enum ModelOutput {
    /// Hypothesis list only
    Hypotheses(Vec<Hypothesis>),
    /// Hypothesis list paired with per-file token timings
    WithTimings {
        hypotheses: Vec<Hypothesis>,
        timings: Vec<Vec<TokenSpan>>,
    },
}

impl ModelOutput {
    /// The hypothesis list, discarding any paired timings.
    pub fn into_hypotheses(self) -> Vec<Hypothesis> {
        match self {
            ModelOutput::Hypotheses(hypotheses) => hypotheses,
            ModelOutput::WithTimings { hypotheses, .. } => hypotheses,
        }
    }

    /// Text of the first hypothesis, if any was produced.
    pub fn best_text(self) -> Option<String> {
        self.into_hypotheses()
            .into_iter()
            .next()
            .map(Hypothesis::into_text)
    }
}

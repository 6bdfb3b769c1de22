//! Emotion signal adapter.
//!
//! The pretrained emotion model is an opaque collaborator. Everything that talks to it goes
//! through [`EmotionClassifier`], so scoring can be exercised with deterministic stubs. The
//! adapter owns the input limit and the conversion of raw probabilities into the percentage
//! mapping exposed in results.

mod lexicon;
mod remote;

pub use lexicon::LexiconClassifier;
pub use remote::RemoteClassifier;

use std::sync::{Arc, Mutex};

use super::domain::{round_to_tenth, EmotionScore, EmotionSignal};

/// Character limit of the upstream model input.
pub const MAX_CLASSIFIER_CHARS: usize = 512;

/// Narrow capability over an emotion model: text in, (label, probability) pairs out.
pub trait EmotionClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<Vec<EmotionScore>, ClassifierError>;
}

impl<C: EmotionClassifier + ?Sized> EmotionClassifier for Arc<C> {
    fn classify(&self, text: &str) -> Result<Vec<EmotionScore>, ClassifierError> {
        (**self).classify(text)
    }
}

impl<C: EmotionClassifier + ?Sized> EmotionClassifier for Box<C> {
    fn classify(&self, text: &str) -> Result<Vec<EmotionScore>, ClassifierError> {
        (**self).classify(text)
    }
}

/// Failure raised when the classifier cannot produce a signal.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("emotion classifier unavailable: {0}")]
    Unavailable(String),
    #[error("emotion classifier request failed: {0}")]
    Request(String),
    #[error("emotion classifier returned an unexpected response: {0}")]
    Response(String),
}

/// Runs at most one classification at a time against the wrapped classifier.
pub struct SerializedClassifier<C> {
    inner: C,
    gate: Mutex<()>,
}

impl<C> SerializedClassifier<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            gate: Mutex::new(()),
        }
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: EmotionClassifier> EmotionClassifier for SerializedClassifier<C> {
    fn classify(&self, text: &str) -> Result<Vec<EmotionScore>, ClassifierError> {
        let _turn = self
            .gate
            .lock()
            .map_err(|_| ClassifierError::Unavailable("classifier gate poisoned".to_string()))?;
        self.inner.classify(text)
    }
}

/// Classifier output for one entry: raw probabilities for scoring, percentages for display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmotionReading {
    pub probabilities: Vec<EmotionScore>,
    pub signal: EmotionSignal,
}

impl EmotionReading {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Builds a reading from raw classifier output.
    ///
    /// Probabilities are clamped into [0, 1]; non-finite values are dropped.
    pub fn from_scores(scores: Vec<EmotionScore>) -> Self {
        let probabilities: Vec<EmotionScore> = scores
            .into_iter()
            .filter(|entry| entry.score.is_finite())
            .map(|entry| EmotionScore {
                score: entry.score.clamp(0.0, 1.0),
                label: entry.label,
            })
            .collect();

        let signal = probabilities
            .iter()
            .map(|entry| (entry.label.clone(), round_to_tenth(entry.score * 100.0)))
            .collect();

        Self {
            probabilities,
            signal,
        }
    }
}

/// Wraps a classifier with the input limit and blank-text short circuit.
pub struct EmotionSignalAdapter<C> {
    classifier: C,
    max_chars: usize,
}

impl<C: EmotionClassifier> EmotionSignalAdapter<C> {
    pub fn new(classifier: C) -> Self {
        Self {
            classifier,
            max_chars: MAX_CLASSIFIER_CHARS,
        }
    }

    /// Reads the emotion signal for a journal entry.
    ///
    /// Absent or whitespace-only text never reaches the classifier and yields an empty reading.
    pub fn read(&self, text: Option<&str>) -> Result<EmotionReading, ClassifierError> {
        let Some(text) = text.filter(|text| !text.trim().is_empty()) else {
            return Ok(EmotionReading::empty());
        };

        let excerpt = truncate_chars(text, self.max_chars);
        let scores = self.classifier.classify(excerpt)?;
        Ok(EmotionReading::from_scores(scores))
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }
}

/// Prefix of `text` holding at most `limit` characters, cut on a char boundary.
pub(crate) fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

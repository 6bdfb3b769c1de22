use super::{ClassifierError, EmotionClassifier};
use crate::analysis::domain::{EmotionLabel, EmotionScore};

/// Mass given to `neutral` before any cue is counted; text without cues reads fully neutral.
const NEUTRAL_PRIOR: f64 = 1.0;

const ANGER_CUES: &[&str] = &[
    "anger", "angry", "annoyed", "furious", "frustrated", "frustrating", "hate", "irritated",
    "livid", "mad", "rage", "resent", "resentful",
];
const DISGUST_CUES: &[&str] = &[
    "awful", "disgust", "disgusted", "disgusting", "gross", "nasty", "repulsive", "revolting",
    "vile",
];
const FEAR_CUES: &[&str] = &[
    "afraid", "anxiety", "anxious", "dread", "fear", "nervous", "overwhelmed", "panic",
    "scared", "stressed", "terrified", "worried", "worry",
];
const SADNESS_CUES: &[&str] = &[
    "burned", "burnt", "cried", "crying", "depressed", "drained", "empty", "exhausted", "grief",
    "hopeless", "hurt", "lonely", "miserable", "sad", "tired", "unhappy",
];
const SURPRISE_CUES: &[&str] = &[
    "amazed", "astonished", "shocked", "suddenly", "surprised", "unexpected", "wow",
];
const JOY_CUES: &[&str] = &[
    "amazing", "calm", "enjoyed", "excited", "fun", "glad", "grateful", "great", "happy", "joy",
    "love", "loved", "peaceful", "proud", "relaxed", "wonderful",
];

/// Deterministic keyword classifier over the seven-label emotion set.
///
/// Each cue word counts one point for its label; `neutral` starts from a fixed prior. Scores
/// are the normalized point shares, reported highest first.
#[derive(Debug, Clone, Default)]
pub struct LexiconClassifier;

impl LexiconClassifier {
    pub fn new() -> Self {
        Self
    }

    fn cues(label: EmotionLabel) -> &'static [&'static str] {
        match label {
            EmotionLabel::Anger => ANGER_CUES,
            EmotionLabel::Disgust => DISGUST_CUES,
            EmotionLabel::Fear => FEAR_CUES,
            EmotionLabel::Sadness => SADNESS_CUES,
            EmotionLabel::Surprise => SURPRISE_CUES,
            EmotionLabel::Joy => JOY_CUES,
            EmotionLabel::Neutral => &[],
        }
    }
}

impl EmotionClassifier for LexiconClassifier {
    fn classify(&self, text: &str) -> Result<Vec<EmotionScore>, ClassifierError> {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphabetic())
            .filter(|word| !word.is_empty())
            .collect();

        let points: Vec<(EmotionLabel, f64)> = EmotionLabel::ALL
            .into_iter()
            .map(|label| {
                let cues = Self::cues(label);
                let hits = words.iter().filter(|word| cues.contains(*word)).count() as f64;
                let prior = if label == EmotionLabel::Neutral {
                    NEUTRAL_PRIOR
                } else {
                    0.0
                };
                (label, hits + prior)
            })
            .collect();

        let total: f64 = points.iter().map(|(_, value)| value).sum();

        let mut scores: Vec<EmotionScore> = points
            .into_iter()
            .map(|(label, value)| EmotionScore::new(label.as_str(), value / total))
            .collect();
        scores.sort_by(|a, b| b.score.total_cmp(&a.score));

        Ok(scores)
    }
}

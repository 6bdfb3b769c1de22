mod config;
mod policy;
mod rules;

pub use config::{ActivityWeightTable, EmotionWeightTable, ScoringConfig, WeightsError};
pub use policy::{classify_risk, tips, MAX_RECOMMENDATIONS};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::{round_to_tenth, AnalysisInput, AnalysisResult};
use super::emotion::{ClassifierError, EmotionClassifier, EmotionReading, EmotionSignalAdapter};
use policy::RecommendationContext;

/// What happens to a request when the emotion classifier fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClassifierFailurePolicy {
    /// Abort the analysis and surface the classifier error.
    #[default]
    Fail,
    /// Score the entry as if no text had been submitted.
    Degrade,
}

/// Deterministic rule engine fusing the emotion signal with lifestyle factors.
pub struct BurnoutEngine<C> {
    config: ScoringConfig,
    adapter: EmotionSignalAdapter<C>,
    failure_policy: ClassifierFailurePolicy,
}

impl<C: EmotionClassifier> BurnoutEngine<C> {
    pub fn new(config: ScoringConfig, classifier: C) -> Self {
        Self {
            config,
            adapter: EmotionSignalAdapter::new(classifier),
            failure_policy: ClassifierFailurePolicy::default(),
        }
    }

    pub fn with_failure_policy(mut self, policy: ClassifierFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn failure_policy(&self) -> ClassifierFailurePolicy {
        self.failure_policy
    }

    pub fn classifier(&self) -> &C {
        self.adapter.classifier()
    }

    /// Classifies the entry text (at most once) and scores it.
    pub fn analyze(&self, input: &AnalysisInput) -> Result<AnalysisOutcome, ClassifierError> {
        let (reading, classifier_degraded) = match self.adapter.read(input.text.as_deref()) {
            Ok(reading) => (reading, false),
            Err(err) if self.failure_policy == ClassifierFailurePolicy::Degrade => {
                warn!(error = %err, "emotion classifier failed; scoring without journal text");
                (EmotionReading::empty(), true)
            }
            Err(err) => return Err(err),
        };

        let mut outcome = self.score(input, reading);
        outcome.classifier_degraded = classifier_degraded;
        Ok(outcome)
    }

    /// Scores an entry against an already computed emotion reading.
    pub fn score(&self, input: &AnalysisInput, reading: EmotionReading) -> AnalysisOutcome {
        let (components, raw_score) = rules::score_entry(input, &reading, &self.config);
        for component in &components {
            debug!(
                factor = ?component.factor,
                points = component.points,
                notes = %component.notes,
                "score contribution"
            );
        }

        let score = raw_score.clamp(0.0, 100.0);
        let risk_level = classify_risk(score);
        let emotions = reading.signal;
        let recommendations = policy::recommendations(&RecommendationContext {
            score,
            input,
            emotions: &emotions,
        });
        let insights = policy::insight(score, risk_level);

        AnalysisOutcome {
            result: AnalysisResult {
                burnout_score: round_to_tenth(score),
                risk_level,
                emotions,
                recommendations,
                insights,
            },
            raw_score,
            components,
            classifier_degraded: false,
        }
    }
}

/// Contribution category feeding the burnout score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    Emotion,
    Activity,
    Sleep,
    Stress,
}

impl ScoreFactor {
    pub fn label(&self) -> &'static str {
        match self {
            ScoreFactor::Emotion => "emotion",
            ScoreFactor::Activity => "activity",
            ScoreFactor::Sleep => "sleep",
            ScoreFactor::Stress => "stress",
        }
    }
}

/// Discrete contribution to a score, kept for audits and CLI explanations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub points: f64,
    pub notes: String,
}

/// Engine output: the public result plus the breakdown that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    pub result: AnalysisResult,
    /// Baseline plus all contributions, before clamping.
    pub raw_score: f64,
    pub components: Vec<ScoreComponent>,
    /// Set when the classifier failed and the entry was scored without its text.
    pub classifier_degraded: bool,
}

impl AnalysisOutcome {
    pub fn component(&self, factor: ScoreFactor) -> Option<&ScoreComponent> {
        self.components
            .iter()
            .find(|component| component.factor == factor)
    }
}

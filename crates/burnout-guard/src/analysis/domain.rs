use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

fn default_sleep_hours() -> f64 {
    7.0
}

fn default_stress_level() -> i32 {
    5
}

/// Raw journal submission: free text plus lifestyle signals.
///
/// Ranges are advisory only (sleep 0-12, stress 1-10); the engine clamps its output instead
/// of rejecting out-of-range inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInput {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default = "default_sleep_hours")]
    pub sleep_hours: f64,
    #[serde(default = "default_stress_level")]
    pub stress_level: i32,
}

impl Default for AnalysisInput {
    fn default() -> Self {
        Self {
            text: None,
            activities: Vec::new(),
            sleep_hours: default_sleep_hours(),
            stress_level: default_stress_level(),
        }
    }
}

impl AnalysisInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_activities<I, S>(mut self, activities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.activities = activities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sleep_hours(mut self, hours: f64) -> Self {
        self.sleep_hours = hours;
        self
    }

    pub fn with_stress_level(mut self, level: i32) -> Self {
        self.stress_level = level;
        self
    }

    pub fn has_activity(&self, name: &str) -> bool {
        self.activities.iter().any(|activity| activity == name)
    }
}

/// Closed label set produced by the pretrained emotion model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Anger,
    Disgust,
    Fear,
    Sadness,
    Surprise,
    Joy,
    Neutral,
}

impl EmotionLabel {
    pub const ALL: [EmotionLabel; 7] = [
        EmotionLabel::Anger,
        EmotionLabel::Disgust,
        EmotionLabel::Fear,
        EmotionLabel::Sadness,
        EmotionLabel::Surprise,
        EmotionLabel::Joy,
        EmotionLabel::Neutral,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EmotionLabel::Anger => "anger",
            EmotionLabel::Disgust => "disgust",
            EmotionLabel::Fear => "fear",
            EmotionLabel::Sadness => "sadness",
            EmotionLabel::Surprise => "surprise",
            EmotionLabel::Joy => "joy",
            EmotionLabel::Neutral => "neutral",
        }
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (label, probability) pair as reported by a classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionScore {
    pub label: String,
    pub score: f64,
}

impl EmotionScore {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Label to percentage (0-100, one decimal) mapping exposed in results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmotionSignal(BTreeMap<String, f64>);

impl EmotionSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, percentage: f64) {
        self.0.insert(label.into(), percentage);
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.get(label).copied()
    }

    /// Percentage for a known label, 0 when the classifier did not report it.
    pub fn percentage(&self, label: EmotionLabel) -> f64 {
        self.get(label.as_str()).unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(label, value)| (label.as_str(), *value))
    }

    /// Label with the highest percentage, if any.
    pub fn dominant(&self) -> Option<(&str, f64)> {
        let mut best: Option<(&str, f64)> = None;
        for (label, value) in self.iter() {
            if best.map_or(true, |(_, top)| value > top) {
                best = Some((label, value));
            }
        }
        best
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for EmotionSignal {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(label, value)| (label.into(), value))
                .collect(),
        )
    }
}

/// Coarse bucketing of the burnout score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }

    /// Inverse of [`RiskLevel::label`]; exact match only.
    pub fn parse(raw: &str) -> Option<Self> {
        [RiskLevel::Low, RiskLevel::Moderate, RiskLevel::High]
            .into_iter()
            .find(|level| level.label() == raw)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Final, immutable analysis handed to persistence and transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub burnout_score: f64,
    pub risk_level: RiskLevel,
    pub emotions: EmotionSignal,
    pub recommendations: Vec<String>,
    pub insights: String,
}

pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::domain::EmotionLabel;

/// Weight tables driving the additive scoring rules.
///
/// Missing tables in a weights file fall back to the standard ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub activity_impacts: ActivityWeightTable,
    #[serde(default)]
    pub emotion_weights: EmotionWeightTable,
}

impl ScoringConfig {
    pub fn standard() -> Self {
        Self::default()
    }

    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn from_json_path(path: &Path) -> Result<Self, WeightsError> {
        let raw = fs::read_to_string(path).map_err(|source| WeightsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw).map_err(|source| WeightsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Signed point impact per activity identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityWeightTable(BTreeMap<String, i32>);

impl ActivityWeightTable {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, i32)>,
        S: Into<String>,
    {
        Self(
            entries
                .into_iter()
                .map(|(name, impact)| (name.into(), impact))
                .collect(),
        )
    }

    pub fn standard() -> Self {
        Self::new([
            ("Overtime Work", 25),
            ("Deadline Pressure", 22),
            ("Conflict", 20),
            ("Poor Sleep", 18),
            ("Skipped Meals", 15),
            ("Commuting", 10),
            ("Screen Time", 8),
            ("Meditation", -20),
            ("Rest Day", -20),
            ("Nature Walk", -18),
            ("Exercise", -15),
            ("Journaling", -15),
            ("Helping Others", -12),
            ("Socializing", -10),
            ("Music", -10),
            ("Creative Work", -10),
            ("Reading", -8),
            ("Cooking", -7),
            ("Gaming", -5),
            ("Learning", -5),
        ])
    }

    /// Unrecognized activities carry no impact.
    pub fn impact(&self, activity: &str) -> i32 {
        self.0.get(activity).copied().unwrap_or(0)
    }

    pub fn contains(&self, activity: &str) -> bool {
        self.0.contains_key(activity)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.0.iter().map(|(name, impact)| (name.as_str(), *impact))
    }
}

impl Default for ActivityWeightTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Signed coefficient per emotion label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmotionWeightTable(BTreeMap<EmotionLabel, f64>);

impl EmotionWeightTable {
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (EmotionLabel, f64)>,
    {
        Self(entries.into_iter().collect())
    }

    pub fn standard() -> Self {
        Self::new([
            (EmotionLabel::Anger, 0.7),
            (EmotionLabel::Disgust, 0.5),
            (EmotionLabel::Fear, 0.8),
            (EmotionLabel::Sadness, 0.9),
            (EmotionLabel::Surprise, 0.1),
            (EmotionLabel::Joy, -0.6),
            (EmotionLabel::Neutral, 0.0),
        ])
    }

    /// Weight for a reported label, matched exactly against the lowercase label
    /// names; anything else weighs nothing.
    pub fn weight(&self, label: &str) -> f64 {
        self.0
            .iter()
            .find(|(known, _)| known.as_str() == label)
            .map_or(0.0, |(_, weight)| *weight)
    }
}

impl Default for EmotionWeightTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WeightsError {
    #[error("failed to read weights file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid weights file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

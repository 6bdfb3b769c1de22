//! Journal entry analysis: emotion signal, burnout scoring, entry log, and HTTP surface.
//!
//! The scoring engine is a deterministic rule set over injected weight tables. The emotion
//! model and the entry log sit behind traits so each layer can be exercised in isolation.

pub mod domain;
pub mod emotion;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    AnalysisInput, AnalysisResult, EmotionLabel, EmotionScore, EmotionSignal, RiskLevel,
};
pub use emotion::{
    ClassifierError, EmotionClassifier, EmotionReading, EmotionSignalAdapter, LexiconClassifier,
    RemoteClassifier, SerializedClassifier, MAX_CLASSIFIER_CHARS,
};
pub use repository::{
    EntryRecord, EntryRepository, HistoryEntryView, HistoryView, RepositoryError, HISTORY_LIMIT,
};
pub use router::analysis_router;
pub use scoring::{
    classify_risk, tips, ActivityWeightTable, AnalysisOutcome, BurnoutEngine,
    ClassifierFailurePolicy, EmotionWeightTable, ScoreComponent, ScoreFactor, ScoringConfig,
    WeightsError, MAX_RECOMMENDATIONS,
};
pub use service::{AnalysisServiceError, BurnoutAnalysisService};
pub use store::SqliteEntryRepository;

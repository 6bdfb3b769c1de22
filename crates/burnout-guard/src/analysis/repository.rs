use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{AnalysisInput, AnalysisResult, EmotionSignal, RiskLevel};

/// Most entries a history query returns.
pub const HISTORY_LIMIT: usize = 50;

/// Stored journal entry: the raw submission, its result, and server-assigned metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub input: AnalysisInput,
    #[serde(flatten)]
    pub result: AnalysisResult,
}

impl EntryRecord {
    pub fn history_view(&self) -> HistoryEntryView {
        HistoryEntryView {
            id: self.id,
            timestamp: self.timestamp,
            text: self.input.text.clone(),
            activities: self.input.activities.clone(),
            sleep_hours: self.input.sleep_hours,
            stress_level: self.input.stress_level,
            burnout_score: self.result.burnout_score,
            risk_level: self.result.risk_level,
            emotions: self.result.emotions.clone(),
            insights: self.result.insights.clone(),
        }
    }
}

/// Append-only entry log, queryable by recency.
pub trait EntryRepository: Send + Sync {
    /// Stores one entry, assigning its id and timestamp.
    fn append(
        &self,
        input: &AnalysisInput,
        result: &AnalysisResult,
    ) -> Result<EntryRecord, RepositoryError>;

    /// Newest entries first, at most `limit` of them.
    fn recent(&self, limit: usize) -> Result<Vec<EntryRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("corrupt stored entry {id}: {reason}")]
    Corrupt { id: i64, reason: String },
}

/// History projection of a stored entry (recommendations are not echoed back).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntryView {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub text: Option<String>,
    pub activities: Vec<String>,
    pub sleep_hours: f64,
    pub stress_level: i32,
    pub burnout_score: f64,
    pub risk_level: RiskLevel,
    pub emotions: EmotionSignal,
    pub insights: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryView {
    pub entries: Vec<HistoryEntryView>,
    pub count: usize,
}

impl HistoryView {
    pub fn from_records(records: &[EntryRecord]) -> Self {
        let entries: Vec<HistoryEntryView> =
            records.iter().map(EntryRecord::history_view).collect();
        Self {
            count: entries.len(),
            entries,
        }
    }
}

/// Sorts newest first (ties broken by id) and keeps at most `limit` records.
pub fn newest_first(mut records: Vec<EntryRecord>, limit: usize) -> Vec<EntryRecord> {
    records.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| b.id.cmp(&a.id))
    });
    records.truncate(limit);
    records
}

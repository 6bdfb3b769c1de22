use std::sync::Arc;

use tracing::info;

use super::domain::AnalysisInput;
use super::emotion::{ClassifierError, EmotionClassifier};
use super::repository::{EntryRepository, HistoryView, RepositoryError, HISTORY_LIMIT};
use super::scoring::{AnalysisOutcome, BurnoutEngine};

/// Service composing the scoring engine with the entry log.
pub struct BurnoutAnalysisService<R, C> {
    repository: Arc<R>,
    engine: Arc<BurnoutEngine<C>>,
}

impl<R, C> BurnoutAnalysisService<R, C>
where
    R: EntryRepository + 'static,
    C: EmotionClassifier + 'static,
{
    pub fn new(repository: Arc<R>, engine: BurnoutEngine<C>) -> Self {
        Self {
            repository,
            engine: Arc::new(engine),
        }
    }

    pub fn engine(&self) -> &BurnoutEngine<C> {
        &self.engine
    }

    /// Scores an entry and appends it, together with its result, to the log.
    ///
    /// Nothing is stored when scoring fails.
    pub fn analyze(&self, input: &AnalysisInput) -> Result<AnalysisOutcome, AnalysisServiceError> {
        let outcome = self.engine.analyze(input)?;
        let record = self.repository.append(input, &outcome.result)?;

        info!(
            entry_id = record.id,
            burnout_score = outcome.result.burnout_score,
            risk_level = %outcome.result.risk_level,
            degraded = outcome.classifier_degraded,
            "journal entry analyzed"
        );

        Ok(outcome)
    }

    /// Scores an entry without recording it.
    pub fn preview(&self, input: &AnalysisInput) -> Result<AnalysisOutcome, AnalysisServiceError> {
        Ok(self.engine.analyze(input)?)
    }

    /// Newest entries first; `limit` is capped at [`HISTORY_LIMIT`] and defaults to it.
    pub fn history(&self, limit: Option<usize>) -> Result<HistoryView, AnalysisServiceError> {
        let limit = limit.unwrap_or(HISTORY_LIMIT).min(HISTORY_LIMIT);
        let records = self.repository.recent(limit)?;
        Ok(HistoryView::from_records(&records))
    }
}

/// Error raised by the analysis service.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisServiceError {
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::analysis::domain::{AnalysisInput, AnalysisResult, EmotionScore};
use crate::analysis::emotion::{ClassifierError, EmotionClassifier};
use crate::analysis::repository::{newest_first, EntryRecord, EntryRepository, RepositoryError};
use crate::analysis::scoring::{BurnoutEngine, ScoringConfig};
use crate::analysis::router::analysis_router;
use crate::analysis::service::BurnoutAnalysisService;

/// Returns a fixed set of scores and records what it was asked to classify.
#[derive(Default)]
pub(super) struct StubClassifier {
    scores: Vec<EmotionScore>,
    calls: AtomicUsize,
    last_input: Mutex<Option<String>>,
}

impl StubClassifier {
    pub(super) fn new(scores: &[(&str, f64)]) -> Self {
        Self {
            scores: scores
                .iter()
                .map(|(label, score)| EmotionScore::new(*label, *score))
                .collect(),
            ..Self::default()
        }
    }

    pub(super) fn neutral() -> Self {
        Self::new(&[("neutral", 1.0)])
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn last_input(&self) -> Option<String> {
        self.last_input.lock().expect("stub mutex poisoned").clone()
    }
}

impl EmotionClassifier for StubClassifier {
    fn classify(&self, text: &str) -> Result<Vec<EmotionScore>, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_input.lock().expect("stub mutex poisoned") = Some(text.to_string());
        Ok(self.scores.clone())
    }
}

pub(super) struct FailingClassifier;

impl EmotionClassifier for FailingClassifier {
    fn classify(&self, _text: &str) -> Result<Vec<EmotionScore>, ClassifierError> {
        Err(ClassifierError::Unavailable("model failed to load".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<Vec<EntryRecord>>>,
}

impl MemoryRepository {
    pub(super) fn stored(&self) -> Vec<EntryRecord> {
        self.records.lock().expect("repository mutex poisoned").clone()
    }
}

impl EntryRepository for MemoryRepository {
    fn append(
        &self,
        input: &AnalysisInput,
        result: &AnalysisResult,
    ) -> Result<EntryRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = EntryRecord {
            id: guard.len() as u64 + 1,
            timestamp: Utc::now(),
            input: input.clone(),
            result: result.clone(),
        };
        guard.push(record.clone());
        Ok(record)
    }

    fn recent(&self, limit: usize) -> Result<Vec<EntryRecord>, RepositoryError> {
        Ok(newest_first(self.stored(), limit))
    }
}

pub(super) struct UnavailableRepository;

impl EntryRepository for UnavailableRepository {
    fn append(
        &self,
        _input: &AnalysisInput,
        _result: &AnalysisResult,
    ) -> Result<EntryRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn recent(&self, _limit: usize) -> Result<Vec<EntryRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn engine<C: EmotionClassifier>(classifier: C) -> BurnoutEngine<C> {
    BurnoutEngine::new(ScoringConfig::standard(), classifier)
}

/// Entry without journal text, so only lifestyle factors contribute.
pub(super) fn lifestyle_input(
    activities: &[&str],
    sleep_hours: f64,
    stress_level: i32,
) -> AnalysisInput {
    AnalysisInput {
        text: Some(String::new()),
        activities: activities.iter().map(|activity| activity.to_string()).collect(),
        sleep_hours,
        stress_level,
    }
}

/// Entry with journal text, scored through whatever the classifier reports.
pub(super) fn journal_input(text: &str, activities: &[&str]) -> AnalysisInput {
    AnalysisInput::new(text)
        .with_activities(activities.iter().copied())
        .with_sleep_hours(8.0)
        .with_stress_level(5)
}

pub(super) fn build_service<C: EmotionClassifier + 'static>(
    classifier: C,
) -> (
    Arc<BurnoutAnalysisService<MemoryRepository, C>>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = BurnoutAnalysisService::new(repository.clone(), engine(classifier));
    (Arc::new(service), repository)
}

pub(super) fn router_with_service<C: EmotionClassifier + 'static>(
    service: Arc<BurnoutAnalysisService<MemoryRepository, C>>,
) -> axum::Router {
    analysis_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

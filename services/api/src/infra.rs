use burnout_guard::analysis::{
    AnalysisInput, AnalysisResult, BurnoutAnalysisService, BurnoutEngine, ClassifierError,
    ClassifierFailurePolicy, EmotionClassifier, EmotionScore, EntryRecord, EntryRepository,
    LexiconClassifier, RemoteClassifier, RepositoryError, ScoringConfig, SerializedClassifier,
    SqliteEntryRepository, HISTORY_LIMIT,
};
use burnout_guard::config::{
    AppConfig, ClassifierBackend, ClassifierConfig, StorageConfig, StorageKind,
};
use burnout_guard::error::AppError;
use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Entry log that lives for the lifetime of the process.
#[derive(Default, Clone)]
pub(crate) struct InMemoryEntryRepository {
    records: Arc<Mutex<Vec<EntryRecord>>>,
}

impl InMemoryEntryRepository {
    fn guard(&self) -> Result<MutexGuard<'_, Vec<EntryRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl EntryRepository for InMemoryEntryRepository {
    fn append(
        &self,
        input: &AnalysisInput,
        result: &AnalysisResult,
    ) -> Result<EntryRecord, RepositoryError> {
        let mut guard = self.guard()?;
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
        let guard = self.guard()?;
        // Appends are chronological, so the tail is the newest slice.
        Ok(guard.iter().rev().take(limit).cloned().collect())
    }
}

/// Emotion classifier selected by `BURNOUT_CLASSIFIER`.
pub(crate) enum ConfiguredClassifier {
    Lexicon(LexiconClassifier),
    Remote(SerializedClassifier<RemoteClassifier>),
}

impl EmotionClassifier for ConfiguredClassifier {
    fn classify(&self, text: &str) -> Result<Vec<EmotionScore>, ClassifierError> {
        match self {
            ConfiguredClassifier::Lexicon(classifier) => classifier.classify(text),
            ConfiguredClassifier::Remote(classifier) => classifier.classify(text),
        }
    }
}

/// Entry log selected by `BURNOUT_STORAGE`.
pub(crate) enum ConfiguredRepository {
    Sqlite(SqliteEntryRepository),
    Memory(InMemoryEntryRepository),
}

impl EntryRepository for ConfiguredRepository {
    fn append(
        &self,
        input: &AnalysisInput,
        result: &AnalysisResult,
    ) -> Result<EntryRecord, RepositoryError> {
        match self {
            ConfiguredRepository::Sqlite(repository) => repository.append(input, result),
            ConfiguredRepository::Memory(repository) => repository.append(input, result),
        }
    }

    fn recent(&self, limit: usize) -> Result<Vec<EntryRecord>, RepositoryError> {
        match self {
            ConfiguredRepository::Sqlite(repository) => repository.recent(limit),
            ConfiguredRepository::Memory(repository) => repository.recent(limit),
        }
    }
}

pub(crate) type ConfiguredService =
    BurnoutAnalysisService<ConfiguredRepository, ConfiguredClassifier>;

/// Remote classifiers capture the current tokio runtime, so call this from inside one.
pub(crate) fn build_classifier(
    config: &ClassifierConfig,
) -> Result<ConfiguredClassifier, AppError> {
    match config.backend {
        ClassifierBackend::Lexicon => Ok(ConfiguredClassifier::Lexicon(LexiconClassifier::new())),
        ClassifierBackend::Remote => {
            let remote = RemoteClassifier::new(config.endpoint.clone(), config.api_token.clone())?;
            info!(endpoint = remote.endpoint(), "using remote emotion classifier");
            Ok(ConfiguredClassifier::Remote(SerializedClassifier::new(
                remote,
            )))
        }
    }
}

pub(crate) fn build_repository(config: &StorageConfig) -> Result<ConfiguredRepository, AppError> {
    match config.kind {
        StorageKind::Sqlite => {
            let store = SqliteEntryRepository::open(&config.database_path)?;
            info!(path = %store.path().display(), "sqlite entry store ready");
            Ok(ConfiguredRepository::Sqlite(store))
        }
        StorageKind::Memory => Ok(ConfiguredRepository::Memory(
            InMemoryEntryRepository::default(),
        )),
    }
}

pub(crate) fn load_scoring_config(weights_path: Option<&Path>) -> Result<ScoringConfig, AppError> {
    match weights_path {
        Some(path) => {
            let config = ScoringConfig::from_json_path(path)?;
            info!(path = %path.display(), "loaded custom scoring weights");
            Ok(config)
        }
        None => Ok(ScoringConfig::standard()),
    }
}

pub(crate) fn build_service(config: &AppConfig) -> Result<ConfiguredService, AppError> {
    let scoring = load_scoring_config(config.weights_path.as_deref())?;
    let classifier = build_classifier(&config.classifier)?;
    let repository = build_repository(&config.storage)?;

    let failure_policy = if config.classifier.fallback_on_failure {
        ClassifierFailurePolicy::Degrade
    } else {
        ClassifierFailurePolicy::Fail
    };
    let engine = BurnoutEngine::new(scoring, classifier).with_failure_policy(failure_policy);

    Ok(BurnoutAnalysisService::new(Arc::new(repository), engine))
}

/// Clamps a user-supplied history size to the service maximum.
pub(crate) fn history_limit(requested: usize) -> usize {
    requested.clamp(1, HISTORY_LIMIT)
}

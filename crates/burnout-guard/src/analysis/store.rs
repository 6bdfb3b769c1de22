use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use libsql::params::Params;
use libsql::{params, Connection, Database, Value};
use tokio::runtime::Runtime;
use tracing::debug;

use super::domain::{AnalysisInput, AnalysisResult, EmotionSignal, RiskLevel};
use super::repository::{EntryRecord, EntryRepository, RepositoryError};

const CREATE_ENTRIES: &str = "\
    CREATE TABLE IF NOT EXISTS entries (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp TEXT NOT NULL,
        text TEXT,
        activities TEXT NOT NULL,
        sleep_hours REAL NOT NULL,
        stress_level INTEGER NOT NULL,
        burnout_score REAL NOT NULL,
        risk_level TEXT NOT NULL,
        emotions TEXT NOT NULL,
        recommendations TEXT NOT NULL,
        insights TEXT NOT NULL
    )";

const CREATE_TIMESTAMP_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_entries_timestamp ON entries (timestamp DESC)";

const INSERT_ENTRY: &str = "\
    INSERT INTO entries (timestamp, text, activities, sleep_hours, stress_level, \
                         burnout_score, risk_level, emotions, recommendations, insights) \
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

const SELECT_RECENT: &str = "\
    SELECT id, timestamp, text, activities, sleep_hours, stress_level, \
           burnout_score, risk_level, emotions, recommendations, insights \
    FROM entries \
    ORDER BY timestamp DESC, id DESC \
    LIMIT ?1";

/// Entry log persisted in a local SQLite database through libsql.
///
/// Calls block on a private single-threaded runtime, so use the repository from a
/// blocking context (`tokio::task::spawn_blocking` inside an async service).
pub struct SqliteEntryRepository {
    path: PathBuf,
    _database: Database,
    connection: Mutex<Connection>,
    runtime: Option<Runtime>,
}

impl SqliteEntryRepository {
    /// Opens (or creates) the database at `path`, creating parent directories as needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| {
                RepositoryError::Unavailable(format!(
                    "cannot create {}: {err}",
                    parent.display()
                ))
            })?;
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| RepositoryError::Unavailable(format!("store runtime: {err}")))?;

        let (database, connection) = runtime.block_on(async {
            let database = libsql::Builder::new_local(&path)
                .build()
                .await
                .map_err(unavailable)?;
            let connection = database.connect().map_err(unavailable)?;
            connection
                .execute(CREATE_ENTRIES, params![])
                .await
                .map_err(unavailable)?;
            connection
                .execute(CREATE_TIMESTAMP_INDEX, params![])
                .await
                .map_err(unavailable)?;
            Ok::<_, RepositoryError>((database, connection))
        })?;
        debug!(path = %path.display(), "entry store opened");

        Ok(Self {
            path,
            _database: database,
            connection: Mutex::new(connection),
            runtime: Some(runtime),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, RepositoryError> {
        self.connection
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store connection poisoned".to_string()))
    }

    fn block_on<F: Future>(&self, future: F) -> Result<F::Output, RepositoryError> {
        let runtime = self
            .runtime
            .as_ref()
            .ok_or_else(|| RepositoryError::Unavailable("entry store closed".to_string()))?;
        Ok(runtime.block_on(future))
    }
}

impl Drop for SqliteEntryRepository {
    fn drop(&mut self) {
        // The owner may be dropped on an async worker, where a blocking shutdown panics.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

impl EntryRepository for SqliteEntryRepository {
    fn append(
        &self,
        input: &AnalysisInput,
        result: &AnalysisResult,
    ) -> Result<EntryRecord, RepositoryError> {
        let timestamp = Utc::now();
        let values = vec![
            Value::Text(timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)),
            input.text.clone().map_or(Value::Null, Value::Text),
            Value::Text(to_json(&input.activities)?),
            Value::Real(input.sleep_hours),
            Value::Integer(i64::from(input.stress_level)),
            Value::Real(result.burnout_score),
            Value::Text(result.risk_level.to_string()),
            Value::Text(to_json(&result.emotions)?),
            Value::Text(to_json(&result.recommendations)?),
            Value::Text(result.insights.clone()),
        ];

        let connection = self.connection()?;
        let id = self.block_on(async {
            connection
                .execute(INSERT_ENTRY, Params::Positional(values))
                .await
                .map_err(unavailable)?;
            Ok::<_, RepositoryError>(connection.last_insert_rowid())
        })??;

        Ok(EntryRecord {
            id: u64::try_from(id).map_err(|_| RepositoryError::Corrupt {
                id,
                reason: "negative row id".to_string(),
            })?,
            timestamp,
            input: input.clone(),
            result: result.clone(),
        })
    }

    fn recent(&self, limit: usize) -> Result<Vec<EntryRecord>, RepositoryError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let connection = self.connection()?;

        self.block_on(async {
            let mut rows = connection
                .query(SELECT_RECENT, params![limit])
                .await
                .map_err(unavailable)?;

            let mut records = Vec::new();
            while let Some(row) = rows.next().await.map_err(unavailable)? {
                records.push(row_to_record(&row)?);
            }
            Ok::<_, RepositoryError>(records)
        })?
    }
}

fn unavailable(err: libsql::Error) -> RepositoryError {
    RepositoryError::Unavailable(err.to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, RepositoryError> {
    serde_json::to_string(value).map_err(|err| RepositoryError::Unavailable(err.to_string()))
}

/// Column order: id(0), timestamp(1), text(2), activities(3), sleep_hours(4),
/// stress_level(5), burnout_score(6), risk_level(7), emotions(8),
/// recommendations(9), insights(10).
fn row_to_record(row: &libsql::Row) -> Result<EntryRecord, RepositoryError> {
    let id: i64 = row.get(0).map_err(unavailable)?;
    let corrupt = |reason: String| RepositoryError::Corrupt { id, reason };

    let timestamp: String = row.get(1).map_err(unavailable)?;
    let timestamp = DateTime::parse_from_rfc3339(&timestamp)
        .map_err(|err| corrupt(format!("timestamp {timestamp:?}: {err}")))?
        .with_timezone(&Utc);

    let text = match row.get_value(2).map_err(unavailable)? {
        Value::Null => None,
        Value::Text(text) => Some(text),
        other => return Err(corrupt(format!("text column holds {other:?}"))),
    };

    let activities: String = row.get(3).map_err(unavailable)?;
    let activities: Vec<String> = serde_json::from_str(&activities)
        .map_err(|err| corrupt(format!("activities: {err}")))?;

    let stress_level: i64 = row.get(5).map_err(unavailable)?;
    let stress_level = i32::try_from(stress_level)
        .map_err(|_| corrupt(format!("stress level {stress_level} out of range")))?;

    let risk_level: String = row.get(7).map_err(unavailable)?;
    let risk_level = RiskLevel::parse(&risk_level)
        .ok_or_else(|| corrupt(format!("unknown risk level {risk_level:?}")))?;

    let emotions: String = row.get(8).map_err(unavailable)?;
    let emotions: EmotionSignal =
        serde_json::from_str(&emotions).map_err(|err| corrupt(format!("emotions: {err}")))?;

    let recommendations: String = row.get(9).map_err(unavailable)?;
    let recommendations: Vec<String> = serde_json::from_str(&recommendations)
        .map_err(|err| corrupt(format!("recommendations: {err}")))?;

    Ok(EntryRecord {
        id: u64::try_from(id).map_err(|_| corrupt("negative row id".to_string()))?,
        timestamp,
        input: AnalysisInput {
            text,
            activities,
            sleep_hours: row.get(4).map_err(unavailable)?,
            stress_level,
        },
        result: AnalysisResult {
            burnout_score: row.get(6).map_err(unavailable)?,
            risk_level,
            emotions,
            recommendations,
            insights: row.get(10).map_err(unavailable)?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(score: f64) -> AnalysisResult {
        AnalysisResult {
            burnout_score: score,
            risk_level: RiskLevel::Moderate,
            emotions: [("sadness", 62.5), ("neutral", 37.5)].into_iter().collect(),
            recommendations: vec!["Try to set boundaries around work hours.".to_string()],
            insights: format!("Your burnout score is {score:.0}/100 (Moderate risk)."),
        }
    }

    fn input() -> AnalysisInput {
        AnalysisInput::new("Long week.")
            .with_activities(["Commuting", "Reading"])
            .with_sleep_hours(6.5)
            .with_stress_level(6)
    }

    #[test]
    fn appends_and_reads_back_newest_first() {
        let dir = tempfile::tempdir().expect("temp dir");
        let repository =
            SqliteEntryRepository::open(dir.path().join("data/burnout_guard.db")).expect("opens");

        let first = repository.append(&input(), &result(41.0)).expect("first");
        let second = repository.append(&input(), &result(55.5)).expect("second");
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let recent = repository.recent(10).expect("recent");
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, 2);
        assert_eq!(recent[0].input, input());
        assert_eq!(recent[1].result, result(41.0));
        assert_eq!(recent[1].timestamp, first.timestamp);

        assert_eq!(repository.recent(1).expect("limited").len(), 1);
    }

    #[test]
    fn ids_continue_after_reopening() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("burnout_guard.db");
        {
            let repository = SqliteEntryRepository::open(&path).expect("opens");
            repository.append(&input(), &result(30.0)).expect("append");
            repository.append(&input(), &result(31.0)).expect("append");
        }

        let reopened = SqliteEntryRepository::open(&path).expect("reopens");
        let record = reopened.append(&input(), &result(32.0)).expect("append");
        assert_eq!(record.id, 3);
        assert_eq!(reopened.recent(50).expect("recent").len(), 3);
    }

    #[test]
    fn limit_is_applied_by_the_query() {
        let dir = tempfile::tempdir().expect("temp dir");
        let repository =
            SqliteEntryRepository::open(dir.path().join("burnout_guard.db")).expect("opens");
        for score in 0..60 {
            repository
                .append(&input(), &result(f64::from(score)))
                .expect("append");
        }

        let recent = repository.recent(50).expect("recent");
        assert_eq!(recent.len(), 50);
        assert_eq!(recent[0].id, 60);
        assert_eq!(recent[49].id, 11);
    }

    #[test]
    fn empty_text_and_signal_survive_storage() {
        let dir = tempfile::tempdir().expect("temp dir");
        let repository =
            SqliteEntryRepository::open(dir.path().join("burnout_guard.db")).expect("opens");
        let mut blank = result(0.0);
        blank.emotions = EmotionSignal::new();
        blank.recommendations.clear();

        repository
            .append(&AnalysisInput::default(), &blank)
            .expect("append");
        let stored = repository.recent(1).expect("recent");
        assert!(stored[0].result.emotions.is_empty());
        assert!(stored[0].result.recommendations.is_empty());
        assert_eq!(stored[0].input.text, None);
    }

    #[test]
    fn unusable_location_is_reported_as_unavailable() {
        let dir = tempfile::tempdir().expect("temp dir");
        let blocker = dir.path().join("data");
        fs::write(&blocker, "not a directory").expect("write blocker file");

        match SqliteEntryRepository::open(blocker.join("burnout_guard.db")) {
            Err(RepositoryError::Unavailable(reason)) => assert!(reason.contains("cannot create")),
            other => panic!("expected unavailable store, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn unreadable_rows_are_reported_as_corrupt() {
        let dir = tempfile::tempdir().expect("temp dir");
        let repository =
            SqliteEntryRepository::open(dir.path().join("burnout_guard.db")).expect("opens");
        repository.append(&input(), &result(12.0)).expect("append");

        let connection = repository.connection().expect("connection");
        repository
            .block_on(connection.execute(
                "UPDATE entries SET risk_level = 'Severe' WHERE id = 1",
                params![],
            ))
            .expect("runtime available")
            .expect("update applies");
        drop(connection);

        match repository.recent(1) {
            Err(RepositoryError::Corrupt { id, reason }) => {
                assert_eq!(id, 1);
                assert!(reason.contains("Severe"));
            }
            other => panic!("expected corrupt entry error, got {other:?}"),
        }
    }
}

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::AnalysisInput;
use super::emotion::EmotionClassifier;
use super::repository::EntryRepository;
use super::service::{AnalysisServiceError, BurnoutAnalysisService};

/// Router builder exposing the analyze and history endpoints.
pub fn analysis_router<R, C>(service: Arc<BurnoutAnalysisService<R, C>>) -> Router
where
    R: EntryRepository + 'static,
    C: EmotionClassifier + 'static,
{
    Router::new()
        .route("/api/analyze", post(analyze_handler::<R, C>))
        .route("/api/history", get(history_handler::<R, C>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct HistoryQuery {
    pub(crate) limit: Option<usize>,
}

pub(crate) async fn analyze_handler<R, C>(
    State(service): State<Arc<BurnoutAnalysisService<R, C>>>,
    axum::Json(input): axum::Json<AnalysisInput>,
) -> Response
where
    R: EntryRepository + 'static,
    C: EmotionClassifier + 'static,
{
    // Classification and entry writes block; keep them off the async workers.
    let joined = tokio::task::spawn_blocking(move || service.analyze(&input)).await;

    match joined {
        Ok(Ok(outcome)) => (StatusCode::OK, axum::Json(outcome.result)).into_response(),
        Ok(Err(err)) => service_error_response(err),
        Err(join_error) => task_failure_response(join_error),
    }
}

pub(crate) async fn history_handler<R, C>(
    State(service): State<Arc<BurnoutAnalysisService<R, C>>>,
    Query(query): Query<HistoryQuery>,
) -> Response
where
    R: EntryRepository + 'static,
    C: EmotionClassifier + 'static,
{
    let joined = tokio::task::spawn_blocking(move || service.history(query.limit)).await;

    match joined {
        Ok(Ok(view)) => (StatusCode::OK, axum::Json(view)).into_response(),
        Ok(Err(err)) => service_error_response(err),
        Err(join_error) => task_failure_response(join_error),
    }
}

fn service_error_response(err: AnalysisServiceError) -> Response {
    let status = match err {
        AnalysisServiceError::Classifier(_) => StatusCode::SERVICE_UNAVAILABLE,
        AnalysisServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error!(error = %err, %status, "analysis request failed");

    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

fn task_failure_response(join_error: tokio::task::JoinError) -> Response {
    error!(error = %join_error, "analysis task aborted");
    let payload = json!({
        "error": "analysis task aborted",
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}

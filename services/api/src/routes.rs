use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use burnout_guard::analysis::{
    analysis_router, BurnoutAnalysisService, EmotionClassifier, EntryRepository,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_analysis_routes<R, C>(
    service: Arc<BurnoutAnalysisService<R, C>>,
) -> axum::Router
where
    R: EntryRepository + 'static,
    C: EmotionClassifier + 'static,
{
    analysis_router(service)
        .route("/", axum::routing::get(root_endpoint))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn root_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "message": "BurnoutGuard API is running",
    }))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

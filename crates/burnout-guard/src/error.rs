use crate::analysis::{AnalysisServiceError, ClassifierError, RepositoryError, WeightsError};
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Weights(WeightsError),
    Classifier(ClassifierError),
    Repository(RepositoryError),
    Analysis(AnalysisServiceError),
    Task(tokio::task::JoinError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Weights(err) => write!(f, "weights error: {}", err),
            AppError::Classifier(err) => write!(f, "classifier error: {}", err),
            AppError::Repository(err) => write!(f, "repository error: {}", err),
            AppError::Analysis(err) => write!(f, "analysis error: {}", err),
            AppError::Task(err) => write!(f, "background task error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Weights(err) => Some(err),
            AppError::Classifier(err) => Some(err),
            AppError::Repository(err) => Some(err),
            AppError::Analysis(err) => Some(err),
            AppError::Task(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Classifier(_)
            | AppError::Analysis(AnalysisServiceError::Classifier(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Weights(_)
            | AppError::Repository(_)
            | AppError::Analysis(_)
            | AppError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<WeightsError> for AppError {
    fn from(value: WeightsError) -> Self {
        Self::Weights(value)
    }
}

impl From<ClassifierError> for AppError {
    fn from(value: ClassifierError) -> Self {
        Self::Classifier(value)
    }
}

impl From<RepositoryError> for AppError {
    fn from(value: RepositoryError) -> Self {
        Self::Repository(value)
    }
}

impl From<AnalysisServiceError> for AppError {
    fn from(value: AnalysisServiceError) -> Self {
        Self::Analysis(value)
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Task(value)
    }
}

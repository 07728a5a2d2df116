use crate::config::ConfigError;
use crate::leaderboard::{ImportError, LeaderboardServiceError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;
use tracing::error;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Import(ImportError),
    Leaderboard(LeaderboardServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Import(err) => write!(f, "dataset import error: {}", err),
            AppError::Leaderboard(err) => write!(f, "leaderboard error: {}", err),
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
            AppError::Import(err) => Some(err),
            AppError::Leaderboard(err) => Some(err),
        }
    }
}

impl AppError {
    /// HTTP status plus a stable code clients can branch on.
    fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Import(err) if err.is_validation() => {
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid_dataset")
            }
            AppError::Import(_) => (StatusCode::BAD_REQUEST, "unreadable_dataset"),
            AppError::Leaderboard(LeaderboardServiceError::NoDataset) => {
                (StatusCode::CONFLICT, "no_dataset")
            }
            AppError::Leaderboard(LeaderboardServiceError::UnknownEmployee(_)) => {
                (StatusCode::NOT_FOUND, "unknown_employee")
            }
            AppError::Leaderboard(LeaderboardServiceError::Repository(_))
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.classify();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let body = Json(json!({ "error": self.to_string(), "code": code }));
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

impl From<ImportError> for AppError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

impl From<LeaderboardServiceError> for AppError {
    fn from(value: LeaderboardServiceError) -> Self {
        Self::Leaderboard(value)
    }
}

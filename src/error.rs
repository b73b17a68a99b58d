use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

use crate::{dao::storage::StorageError, engine::error::GameError};

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Unauthorized access attempt.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Service unavailable or degraded.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {}", err))
    }
}

impl From<GameError> for AppError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::DuplicateName { .. }
            | GameError::AlreadyOnTeam { .. }
            | GameError::SelfPoach => AppError::Conflict(err.to_string()),
            GameError::NotFound { .. } => AppError::NotFound(err.to_string()),
            GameError::NotOnTeam { .. }
            | GameError::TeamFull { .. }
            | GameError::PoachingDisabled
            | GameError::InvalidConfiguration { .. } => AppError::BadRequest(err.to_string()),
            GameError::Storage(source) => source.into(),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        // Storage faults are logged with their source chain and surfaced as a
        // generic unavailability, never silently swallowed.
        error!(error = %err, "storage layer failure");
        AppError::ServiceUnavailable(err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: GameError) -> StatusCode {
        AppError::from(err).into_response().status()
    }

    #[test]
    fn game_errors_map_to_expected_statuses() {
        assert_eq!(
            status_of(GameError::duplicate_player("Alice")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(GameError::team_not_found("Red")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(GameError::AlreadyOnTeam {
                name: "Alice".into()
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(GameError::NotOnTeam {
                name: "Alice".into()
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(GameError::TeamFull { name: "Red".into() }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(GameError::SelfPoach), StatusCode::CONFLICT);
        assert_eq!(
            status_of(GameError::PoachingDisabled),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(GameError::InvalidConfiguration {
                message: "team size".into()
            }),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn storage_faults_surface_as_service_unavailable() {
        assert_eq!(
            status_of(GameError::Storage(StorageError::Degraded)),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}

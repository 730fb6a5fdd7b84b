//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use playbook_core::error::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A domain or persistence error during startup.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            DomainError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            DomainError::InvalidState(_) => (StatusCode::CONFLICT, "invalid_state"),
            DomainError::TypeMismatch(_) => (StatusCode::BAD_REQUEST, "type_mismatch"),
            DomainError::InvalidValue(_) => (StatusCode::BAD_REQUEST, "invalid_value"),
            DomainError::ChoiceOutOfRange { .. } => {
                (StatusCode::BAD_REQUEST, "choice_out_of_range")
            }
            DomainError::UnknownInject(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "unknown_inject")
            }
            DomainError::UnknownVariable(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "unknown_variable")
            }
            DomainError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
        };

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn status_of(err: DomainError) -> StatusCode {
        ApiError(err).into_response().status()
    }

    #[test]
    fn test_not_found_maps_to_404() {
        assert_eq!(
            status_of(DomainError::NotFound(Uuid::new_v4())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_invalid_state_maps_to_409() {
        assert_eq!(
            status_of(DomainError::InvalidState("not in progress".into())),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_bad_input_maps_to_400() {
        assert_eq!(
            status_of(DomainError::TypeMismatch("text for number".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::InvalidValue("bad operator".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::ChoiceOutOfRange { index: 4, len: 2 }),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_dangling_references_map_to_422() {
        assert_eq!(
            status_of(DomainError::UnknownInject("nowhere".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(DomainError::UnknownVariable("Missing".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_infrastructure_maps_to_500() {
        assert_eq!(
            status_of(DomainError::Infrastructure("db down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

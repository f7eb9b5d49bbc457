//! HTTP error handling and response types.

use std::collections::BTreeMap;

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::db::ScheduleServiceError;
use crate::services::ValidationErrors;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Field path to messages, present on validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            errors: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_errors(mut self, errors: &ValidationErrors) -> Self {
        self.errors = Some(errors.fields().clone());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Malformed path that never reached a handler body
    BadRequest(String),
    /// Field-level validation failures (422)
    Validation(ValidationErrors),
    /// Repository error, mapped by variant
    Repository(RepositoryError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Repository(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            AppError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            AppError::BadRequest(msg) => ApiError::new("BAD_REQUEST", msg),
            AppError::Validation(errors) => {
                ApiError::new("VALIDATION_ERROR", "Request validation failed").with_errors(&errors)
            }
            AppError::Repository(e) if e.is_not_found() => {
                ApiError::new("NOT_FOUND", e.to_string().trim_end())
            }
            AppError::Repository(e) => {
                tracing::error!("Repository error: {}", e);
                ApiError::new("REPOSITORY_ERROR", "Storage operation failed")
                    .with_details(e.to_string().trim_end())
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<ScheduleServiceError> for AppError {
    fn from(err: ScheduleServiceError) -> Self {
        match err {
            ScheduleServiceError::Validation(errors) => AppError::Validation(errors),
            ScheduleServiceError::Repository(e) => AppError::Repository(e),
        }
    }
}

/// Unparseable JSON bodies are reported as a validation failure on `body`.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(ValidationErrors::single("body", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::from(RepositoryError::not_found("Doctor 1 not found")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(RepositoryError::transaction("rolled back")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(ValidationErrors::single("frequency", "is required")).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::BadRequest("bad id".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_service_error_conversion_keeps_kind() {
        let err: AppError =
            ScheduleServiceError::from(RepositoryError::not_found("gone")).into();
        assert!(matches!(err, AppError::Repository(_)));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_body_lists_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("schedules.0.end_time", "must be after start_time");
        let body = ApiError::new("VALIDATION_ERROR", "x").with_errors(&errors);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["errors"]["schedules.0.end_time"][0], "must be after start_time");
        assert!(json.get("details").is_none());
    }
}

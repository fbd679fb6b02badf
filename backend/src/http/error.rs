//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::db::repository::RepositoryError;

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
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (validation error)
    BadRequest(String),
    /// Operation disabled in this environment
    Forbidden(String),
    /// Repository error
    Repository(RepositoryError),
}

impl AppError {
    /// Status code and body for a store failure.
    fn from_repository(err: RepositoryError) -> (StatusCode, ApiError) {
        let context = err.context().to_string();
        match err {
            RepositoryError::ValidationError { message, .. } => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", message))
            }
            RepositoryError::ConflictError { message, .. } => {
                (StatusCode::CONFLICT, ApiError::new("CONFLICT", message))
            }
            RepositoryError::NotFound { message, .. } => {
                (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", message))
            }
            RepositoryError::ConnectionError { ref message, .. }
            | RepositoryError::TimeoutError { ref message, .. } => {
                error!(error = %err, "Message store unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ApiError::new("STORE_UNAVAILABLE", message.clone()).with_details(context),
                )
            }
            other => {
                error!(error = %other, "Message store failure");
                let status = if other.is_retryable() {
                    StatusCode::SERVICE_UNAVAILABLE
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (
                    status,
                    ApiError::new("REPOSITORY_ERROR", other.message()).with_details(context),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, ApiError::new("FORBIDDEN", msg)),
            AppError::Repository(e) => Self::from_repository(e),
        };

        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::ErrorContext;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_repository_status_mapping() {
        assert_eq!(
            status_of(RepositoryError::validation("bad").into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(
                RepositoryError::conflict_with_context("taken", ErrorContext::new("create"))
                    .into()
            ),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(RepositoryError::connection("down").into()),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(RepositoryError::timeout("slow").into()),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(RepositoryError::query("rejected").into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(
                RepositoryError::query_with_context("busy", ErrorContext::new("list").retryable())
                    .into()
            ),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_app_error_status_mapping() {
        assert_eq!(status_of(AppError::Forbidden("no".into())), StatusCode::FORBIDDEN);
        assert_eq!(
            status_of(AppError::BadRequest("bad json".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(RepositoryError::not_found("gone").into()),
            StatusCode::NOT_FOUND
        );
    }
}

//! Error handling for the application

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Postgres code raised when a write trips an `EXCLUDE` constraint
const EXCLUSION_VIOLATION: &str = "23P01";

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{message}")]
    Conflict {
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("Missing or invalid administrator token")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error_type: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    /// True when a write was refused by one of the range exclusion constraints.
    pub fn is_exclusion_violation(&self) -> bool {
        match self {
            AppError::Database(db) => db
                .as_database_error()
                .and_then(|e| e.code())
                .is_some_and(|code| code == EXCLUSION_VIOLATION),
            _ => false,
        }
    }

    fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Conflict { .. } => (StatusCode::CONFLICT, "conflict"),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::Database(_) | AppError::Migration(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_type();

        let (message, details) = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                ("Database error".to_string(), None)
            }
            AppError::Migration(e) => {
                tracing::error!("Migration error: {}", e);
                ("Database error".to_string(), None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("Internal error".to_string(), None)
            }
            AppError::Conflict { message, details } => (message, details),
            other => (other.to_string(), None),
        };

        let body = ErrorResponse {
            error_type,
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

// Extractor rejections share the JSON error body.

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::BadRequest("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Conflict {
                message: "taken".into(),
                details: None
            }
            .into_response()
            .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Internal("boom".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_exclusion_violation_detection() {
        use super::test_support::db_error;

        assert!(AppError::Database(db_error("23P01")).is_exclusion_violation());
        // unique_violation is a different constraint family
        assert!(!AppError::Database(db_error("23505")).is_exclusion_violation());
        assert!(!AppError::Database(sqlx::Error::RowNotFound).is_exclusion_violation());
        assert!(!AppError::BadRequest("x".into()).is_exclusion_violation());
    }

    #[test]
    fn test_display_uses_message() {
        let err = AppError::BadRequest("Season not found".to_string());
        assert_eq!(err.to_string(), "Season not found");
    }
}

//! Centralized error types for the Retronova API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

/// Storage-specific errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Referenced record is missing or still in use: {0}")]
    ForeignKeyViolation(String),

    #[error("Check constraint violated: {0}")]
    CheckViolation(String),

    #[error("Numeric value out of range: {0}")]
    OutOfRange(String),

    #[error("Migration failed: {0}")]
    Migration(String),
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

// SQLSTATE codes raised by PostgreSQL constraint checks
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => return StorageError::UniqueViolation(constraint),
                Some(FOREIGN_KEY_VIOLATION) => return StorageError::ForeignKeyViolation(constraint),
                Some(CHECK_VIOLATION) => return StorageError::CheckViolation(constraint),
                Some(NUMERIC_VALUE_OUT_OF_RANGE) => {
                    return StorageError::OutOfRange(db_err.message().to_string())
                }
                _ => {}
            }
        }
        StorageError::Database(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for StorageError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StorageError::Migration(err.to_string())
    }
}

/// Error returned by request handlers and services
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type alias for service operations
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(format!("{what} not found"))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Storage(StorageError::UniqueViolation(_)) => StatusCode::CONFLICT,
            ApiError::Storage(StorageError::ForeignKeyViolation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Storage(StorageError::CheckViolation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Storage(StorageError::OutOfRange(_)) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to clients; storage failures never leak their cause
    fn detail(&self) -> String {
        match self {
            ApiError::Storage(StorageError::UniqueViolation(constraint)) => {
                format!("Conflicting record ({constraint})")
            }
            ApiError::Storage(StorageError::ForeignKeyViolation(constraint)) => {
                format!("Record is referenced by or references another record ({constraint})")
            }
            ApiError::Storage(StorageError::CheckViolation(constraint)) => {
                format!("Record violates a constraint ({constraint})")
            }
            ApiError::Storage(StorageError::OutOfRange(_)) => {
                "Numeric value out of range".to_string()
            }
            ApiError::Storage(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status.as_u16(), self);
        }

        let body = Json(json!({
            "detail": self.detail(),
            "code": status.as_u16(),
        }));
        (status, body).into_response()
    }
}

//! HTTP error type shared by all handlers.
//!
//! Handlers return `ApiResult<T>` and use `?`; each variant maps to a status
//! code and a JSON body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bot::commands::CommandError;
use crate::services::calendar_sync::SyncError;
use crate::services::google::GoogleError;
use crate::services::notifier::NotifyError;

/// API error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// No `DATABASE_URL` configured
    #[error("Database is not configured")]
    DatabaseUnavailable,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    /// Google or Telegram call failed
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        ApiError::NotFound(resource.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }
}

impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::NoToken(_) => ApiError::bad_request("Trainer has no Google token"),
            SyncError::MissingRefreshToken(_) => ApiError::bad_request(err.to_string()),
            SyncError::Google(e) => e.into(),
            SyncError::Notify(e) => e.into(),
            SyncError::Database(e) => ApiError::Database(e),
        }
    }
}

impl From<GoogleError> for ApiError {
    fn from(err: GoogleError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl From<NotifyError> for ApiError {
    fn from(err: NotifyError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl From<CommandError> for ApiError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Database(e) => ApiError::Database(e),
            CommandError::Notify(e) => e.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match &self {
            ApiError::DatabaseUnavailable => {
                tracing::error!("DATABASE_URL is not configured; rejecting request");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Database is not configured".to_string(),
                    None,
                )
            }
            ApiError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database operation failed".to_string(),
                    None,
                )
            }
            ApiError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                format!("{} not found", resource),
                None,
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            ApiError::Upstream(msg) => {
                tracing::error!("Upstream error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "Upstream service failed".to_string(),
                    Some(msg.clone()),
                )
            }
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    Some(e.to_string()),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
            details,
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

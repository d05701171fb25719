//! API error types with IntoResponse
//!
//! Every error is rendered as `{"error": "<message>"}`. Server-side failures
//! are logged and answered with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::auth::AuthError;
use crate::db::DbError;
use crate::models::{ErrorBody, ValidationError};
use crate::storage::StorageError;

/// Message for every unexpected 500
pub const INTERNAL_ERROR: &str = "Internal server error";

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Request rejected for a reason other than a field rule (400)
    BadRequest { message: String },

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Uniqueness or referential conflict (409)
    Conflict { message: String },

    /// Missing or rejected credentials (401)
    Unauthorized { message: &'static str },

    /// Database error (500, logged)
    Database(DbError),

    /// External provider failed (500, logged, fixed public message)
    Upstream { message: &'static str, detail: String },

    /// Internal error (500)
    Internal { message: String },
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Database(_) | Self::Upstream { .. } | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::Validation(e) => e.to_string(),
            Self::BadRequest { message } | Self::Conflict { message } => message,
            Self::NotFound { resource, id } => {
                tracing::debug!(resource, %id, "Not found");
                format!("{} not found", capitalize(resource))
            }
            Self::Unauthorized { message } => message.to_string(),
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                INTERNAL_ERROR.to_string()
            }
            Self::Upstream { message, detail } => {
                tracing::error!("{}: {}", message, detail);
                message.to_string()
            }
            Self::Internal { message } => {
                tracing::error!("Internal error: {}", message);
                INTERNAL_ERROR.to_string()
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::Conflict { message } | DbError::InUse { message } => Self::Conflict {
                message: message.to_string(),
            },
            DbError::Sqlx(_) => Self::Database(e),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        if e.is_client_error() {
            return Self::BadRequest {
                message: e.to_string(),
            };
        }
        match e {
            StorageError::Upstream { .. } | StorageError::Http(_) => Self::Upstream {
                message: "Failed to upload file",
                detail: e.to_string(),
            },
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingToken => Self::Unauthorized {
                message: "Not authenticated",
            },
            AuthError::InvalidToken => Self::Unauthorized {
                message: "Invalid token",
            },
            other => Self::internal(other.to_string()),
        }
    }
}

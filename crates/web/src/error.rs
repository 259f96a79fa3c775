use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use storage::error::StorageError;
use storage::models::PerformanceError;
use thiserror::Error;
use validator::ValidationErrors;

use crate::scoring::ScoringError;

/// Everything a handler can fail with, rendered as `{"error": ...}` JSON.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),
}

impl From<PerformanceError> for WebError {
    fn from(error: PerformanceError) -> Self {
        Self::BadRequest(error.to_string())
    }
}

fn field_messages(errors: &ValidationErrors) -> Vec<String> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{}: {}", field, message)
            })
        })
        .collect()
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Storage(StorageError::NotFound) => (
                StatusCode::NOT_FOUND,
                json!({ "error": "Resource not found" }),
            ),
            Self::Storage(StorageError::ConstraintViolation(message)) => {
                (StatusCode::CONFLICT, json!({ "error": message }))
            }
            Self::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "An internal error occurred" }),
                )
            }
            Self::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Validation failed",
                    "details": field_messages(&errors)
                }),
            ),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
            Self::Scoring(e) => {
                tracing::error!("Scoring service error: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    json!({ "error": "Scoring service unavailable" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type WebResult<T> = Result<T, WebError>;

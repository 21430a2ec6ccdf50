//! REST API endpoints.
//!
//! Axum-based HTTP API for account management, sleep record CRUD,
//! summary statistics, and tip generation.

pub mod routes;
pub mod state;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::auth::Session;
use crate::clock::FormatError;
use crate::models::InvalidQuality;
use crate::storage::StorageError;
use state::AppState;

/// Message shown for transient failures the client should retry.
pub const RETRYABLE_MESSAGE: &str = "something went wrong on our side, please try again later";

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::DuplicateEmail(email) => {
                ApiError::Conflict(format!("email already registered: {}", email))
            }
            other => {
                tracing::error!("Storage failure: {}", other);
                ApiError::Internal(RETRYABLE_MESSAGE.to_string())
            }
        }
    }
}

impl From<FormatError> for ApiError {
    fn from(e: FormatError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<InvalidQuality> for ApiError {
    fn from(e: InvalidQuality) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

/// Extract the authenticated session from the `Authorization: Bearer`
/// header. Missing, tampered, and expired tokens all map to 401.
#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

        state
            .signer
            .verify(token)
            .map_err(|e| ApiError::Unauthorized(e.to_string()))
    }
}

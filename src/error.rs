//! Error types for the store layer and the HTTP surface.
//!
//! [`StoreError`] covers everything a [`crate::store::DocumentStore`] backend
//! can fail with. [`AppError`] is the small closed taxonomy every route
//! reports through; each kind maps to one response status.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failures raised by a document store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("document encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("store connection lock poisoned")]
    Poisoned,

    #[error("unsupported store url: {0}")]
    UnsupportedUrl(String),

    #[error("malformed stored document: {0}")]
    Corrupt(String),
}

/// Errors surfaced to HTTP callers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    UpstreamUnavailable(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) => "validation",
            AppError::UpstreamUnavailable(_) => "upstream_unavailable",
            AppError::Internal(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        error!(error = %err, "Store operation failed");
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }));

        (self.status(), body).into_response()
    }
}

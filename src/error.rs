//! Error types for the cache layer
//!
//! Provides unified error handling using thiserror.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Errors surfaced by the maintenance API.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Unknown cache, key or route parameter
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CacheError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            CacheError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CacheError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the maintenance API.
pub type Result<T> = std::result::Result<T, CacheError>;

// == Fetch Error ==
/// Outcome of a failed upstream fetch.
///
/// Cloneable so that every caller sharing one in-flight request observes the
/// same failure.
#[derive(Error, Debug, Clone)]
pub enum FetchError {
    /// The upstream collaborator reported an error
    #[error("Upstream request failed: {0}")]
    Upstream(Arc<anyhow::Error>),

    /// The upstream response did not have the expected shape
    #[error("Malformed upstream response: {0}")]
    Decode(String),

    /// The fetch task ended without producing a result
    #[error("Fetch aborted: {0}")]
    Aborted(String),
}

impl FetchError {
    /// Wraps an upstream error.
    pub fn upstream(err: impl Into<anyhow::Error>) -> Self {
        FetchError::Upstream(Arc::new(err.into()))
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Result of a (possibly shared) upstream fetch.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// == Storage Error ==
/// Failure of the persistent key-value store behind the media caches.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The store could not be read or written
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The store returned data that could not be decoded
    #[error("Storage corrupt: {0}")]
    Corrupt(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Unavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_clone_keeps_message() {
        let err = FetchError::upstream(anyhow::anyhow!("rate limit reached"));
        let cloned = err.clone();

        assert_eq!(err.to_string(), cloned.to_string());
        assert!(cloned.to_string().contains("rate limit reached"));
    }

    #[test]
    fn test_json_error_maps_to_decode() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: FetchError = parse.unwrap_err().into();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn test_io_error_maps_to_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: StorageError = io.into();
        assert!(matches!(err, StorageError::Unavailable(_)));
    }

    #[test]
    fn test_not_found_status() {
        let response = CacheError::NotFound("posters".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

//! Error types for the sharded cache
//!
//! Provides unified error handling using thiserror. The host-only variants
//! and the HTTP mapping exist with the `server` feature.

#[cfg(feature = "server")]
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
#[cfg(feature = "server")]
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Error type for the cache library and its HTTP host.
///
/// A cache miss is never an error; lookups return `Option`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Non-positive shard count or capacity at construction time
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Key not found (HTTP host only)
    #[cfg(feature = "server")]
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data (HTTP host only)
    #[cfg(feature = "server")]
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
#[cfg(feature = "server")]
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::InvalidConfiguration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CacheError::InvalidConfiguration("capacity must be greater than zero".into());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: capacity must be greater than zero"
        );
    }

    #[cfg(not(feature = "server"))]
    #[test]
    fn test_core_build_has_only_configuration_errors() {
        let err = CacheError::InvalidConfiguration("zero".into());
        // No wildcard arm: host variants must not exist without the feature
        match err {
            CacheError::InvalidConfiguration(msg) => assert_eq!(msg, "zero"),
        }
    }

    #[cfg(feature = "server")]
    #[test]
    fn test_error_status_codes() {
        let test_cases = vec![
            (CacheError::NotFound("key".to_string()), StatusCode::NOT_FOUND),
            (
                CacheError::InvalidRequest("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                CacheError::InvalidConfiguration("zero".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(response.status(), expected_status);
        }
    }
}

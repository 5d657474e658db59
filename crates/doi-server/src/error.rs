//! API error types with JSON responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use doi_resolver::ResolveError;
use serde::Serialize;

/// API error that can be returned from handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// DOI failed the syntax check (400).
    #[error("{0}")]
    InvalidDoi(String),

    /// Another lookup for the DOI is running (429).
    #[error("{0}")]
    AlreadyInProgress(String),

    /// Registry has no record for the DOI (404).
    #[error("{0}")]
    NotFoundUpstream(String),

    /// Registry unreachable or failing (502).
    #[error("{0}")]
    UpstreamUnavailable(String),

    /// Registry answered with an unusable document (502).
    #[error("{0}")]
    MetadataUnparsable(String),

    /// Not enough metadata to find or create a journal (422).
    #[error("{0}")]
    InsufficientInformation(String),

    /// Internal server error (500).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the error code string for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDoi(_) => "INVALID_DOI",
            Self::AlreadyInProgress(_) => "ALREADY_IN_PROGRESS",
            Self::NotFoundUpstream(_) => "NOT_FOUND_UPSTREAM",
            Self::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            Self::MetadataUnparsable(_) => "METADATA_UNPARSABLE",
            Self::InsufficientInformation(_) => "INSUFFICIENT_INFORMATION",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidDoi(_) => StatusCode::BAD_REQUEST,
            Self::AlreadyInProgress(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::NotFoundUpstream(_) => StatusCode::NOT_FOUND,
            Self::UpstreamUnavailable(_) | Self::MetadataUnparsable(_) => StatusCode::BAD_GATEWAY,
            Self::InsufficientInformation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        let message = err.to_string();
        match err {
            ResolveError::InvalidDoi(_) => Self::InvalidDoi(message),
            ResolveError::AlreadyInProgress(_) => Self::AlreadyInProgress(message),
            ResolveError::NotFoundUpstream(_) => Self::NotFoundUpstream(message),
            ResolveError::UpstreamUnavailable(_) => Self::UpstreamUnavailable(message),
            ResolveError::MetadataUnparsable(_) => Self::MetadataUnparsable(message),
            ResolveError::InvariantViolation(_) | ResolveError::Store(_) => {
                tracing::error!(error = %message, "Journal lookup failed");
                Self::Internal(message)
            }
        }
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error details.
    pub error: ErrorDetails,
}

/// Error details within the response.
#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    /// Error code (e.g., "INVALID_DOI", "NOT_FOUND_UPSTREAM").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorDetails {
                code: self.code().to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use doi_core::{DoiError, JournalId};
    use doi_resolver::UnparsableMetadata;
    use doi_store::StoreError;

    #[test]
    fn resolve_errors_map_to_statuses() {
        let cases = [
            (
                ResolveError::InvalidDoi(DoiError::Missing),
                StatusCode::BAD_REQUEST,
                "INVALID_DOI",
            ),
            (
                ResolveError::AlreadyInProgress("10.1/x".into()),
                StatusCode::TOO_MANY_REQUESTS,
                "ALREADY_IN_PROGRESS",
            ),
            (
                ResolveError::NotFoundUpstream("10.1/x".into()),
                StatusCode::NOT_FOUND,
                "NOT_FOUND_UPSTREAM",
            ),
            (
                ResolveError::UpstreamUnavailable("timeout".into()),
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_UNAVAILABLE",
            ),
            (
                ResolveError::MetadataUnparsable(UnparsableMetadata("eof".into())),
                StatusCode::BAD_GATEWAY,
                "METADATA_UNPARSABLE",
            ),
            (
                ResolveError::InvariantViolation(JournalId::new("x")),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
            (
                ResolveError::Store(StoreError::LockPoisoned),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];

        for (err, status, code) in cases {
            let api = ApiError::from(err);
            assert_eq!(api.status_code(), status);
            assert_eq!(api.code(), code);
        }
    }

    #[test]
    fn insufficient_information_is_unprocessable() {
        let err = ApiError::InsufficientInformation("no title".into());
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), "INSUFFICIENT_INFORMATION");
    }
}

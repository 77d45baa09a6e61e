//! Typed API error for HTTP handlers.
//!
//! Converts domain errors into HTTP responses with a JSON body
//! `{"error": "message", "retryable": bool}`.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tubeshelf_api::ApiError as FetchError;
use tubeshelf_storage::StorageError;

/// API error with HTTP status code and human-readable message.
///
/// `Internal` logs the real error server-side and returns a static
/// message to the client.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request: invalid input from caller.
    BadRequest(String),
    /// 404 Not Found: requested resource doesn't exist.
    NotFound(String),
    /// 502 Bad Gateway: the video platform failed or answered garbage.
    BadGateway(String),
    /// 503 Service Unavailable: no usable credentials; `retryable` when
    /// quotas may reset.
    ServiceUnavailable { message: String, retryable: bool },
    /// 500 Internal Server Error: unexpected failure. Details logged, not exposed.
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, retryable) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, false),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg, false),
            Self::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg, false),
            Self::ServiceUnavailable { message, retryable } => {
                (StatusCode::SERVICE_UNAVAILABLE, message, retryable)
            },
            Self::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned(), false)
            },
        };
        let body = serde_json::json!({"error": message, "retryable": retryable});
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::PoolExhausted => Self::ServiceUnavailable {
                message: "no video API keys are configured".to_owned(),
                retryable: false,
            },
            FetchError::AllCredentialsExhausted { .. } => Self::ServiceUnavailable {
                message: "video API quota exhausted, please try again later".to_owned(),
                retryable: true,
            },
            FetchError::FetchFailed(failure) => {
                tracing::warn!(error = %failure, "upstream fetch failed");
                Self::BadGateway("failed to load videos from the platform".to_owned())
            },
            FetchError::InvalidInput(msg) => Self::BadRequest(msg),
            FetchError::ClientInit(msg) => Self::Internal(anyhow::anyhow!(msg)),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self::Internal(err.into())
    }
}

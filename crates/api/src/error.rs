//! Typed error enums for the API crate.

use thiserror::Error;

/// Errors surfaced by [`crate::RetryingFetcher`] and [`crate::VideoClient`].
///
/// Quota rejections never appear here directly: they drive credential
/// rotation and only become [`ApiError::AllCredentialsExhausted`] once the
/// whole pool was tried.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no API credentials configured")]
    PoolExhausted,
    #[error("all {attempts} API credentials were rejected for quota")]
    AllCredentialsExhausted { attempts: usize },
    #[error("fetch failed: {0}")]
    FetchFailed(#[from] FetchFailure),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("client initialization failed: {0}")]
    ClientInit(String),
}

impl ApiError {
    /// Whether the user can reasonably retry the same operation later.
    ///
    /// Only quota exhaustion qualifies; quotas reset over time.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::AllCredentialsExhausted { .. })
    }

    /// Whether this is a transport, status or parse failure.
    #[must_use]
    pub fn is_fetch_failed(&self) -> bool {
        matches!(self, Self::FetchFailed(_))
    }
}

/// Non-quota failure of a single attempt. Never retried on another credential.
#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("HTTP request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("JSON parse error in {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("response has no items collection")]
    MissingItems,
}

impl From<reqwest::Error> for FetchFailure {
    /// Strips the URL: it carries the credential as a query parameter.
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }
}

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tubeshelf_core::Credential;
use tubeshelf_core::constants::CREDENTIAL_QUERY_PARAM;

use crate::error::{ApiError, FetchFailure};
use crate::key_pool::KeyPool;
use crate::request::RequestTemplate;

/// Maximum body length kept in error messages.
const MAX_ERROR_BODY_LEN: usize = 300;

/// Outcome of a single attempt with one credential.
enum Attempt<T> {
    Succeeded(Vec<T>),
    QuotaRejected,
}

/// Executes request templates against the platform API, rotating
/// credentials on quota rejection (HTTP 403).
///
/// A call makes at most `pool.size()` attempts. Any other failure ends
/// the call after the attempt that produced it.
pub struct RetryingFetcher {
    client: reqwest::Client,
    base_url: String,
    pool: Arc<KeyPool>,
}

impl std::fmt::Debug for RetryingFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryingFetcher")
            .field("base_url", &self.base_url)
            .field("credentials", &self.pool.size())
            .finish()
    }
}

impl RetryingFetcher {
    /// Creates a fetcher with its own HTTP client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(pool: Arc<KeyPool>, base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::ClientInit(e.to_string()))?;
        Ok(Self::with_client(client, pool, base_url))
    }

    #[must_use]
    pub fn with_client(client: reqwest::Client, pool: Arc<KeyPool>, base_url: &str) -> Self {
        Self { client, base_url: base_url.trim_end_matches('/').to_owned(), pool }
    }

    #[must_use]
    pub fn pool(&self) -> &Arc<KeyPool> {
        &self.pool
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Runs one logical request to completion and returns its `items`.
    ///
    /// # Errors
    /// - [`ApiError::PoolExhausted`] if no credentials are configured.
    /// - [`ApiError::AllCredentialsExhausted`] after every credential was
    ///   rejected for quota.
    /// - [`ApiError::FetchFailed`] on the first transport, status or parse
    ///   failure.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: &RequestTemplate,
    ) -> Result<Vec<T>, ApiError> {
        let mut credential = self.pool.lease()?;
        let max_attempts = self.pool.size();
        let mut attempt = 1;

        loop {
            match self.attempt(request, &credential).await? {
                Attempt::Succeeded(items) => return Ok(items),
                Attempt::QuotaRejected => {
                    tracing::warn!(
                        endpoint = %request.endpoint(),
                        key = %credential.fingerprint(),
                        attempt,
                        max_attempts,
                        "credential rejected for quota"
                    );
                    if attempt >= max_attempts {
                        return Err(ApiError::AllCredentialsExhausted { attempts: attempt });
                    }
                    attempt += 1;
                    credential = self.pool.lease()?;
                },
            }
        }
    }

    async fn attempt<T: DeserializeOwned>(
        &self,
        request: &RequestTemplate,
        credential: &Credential,
    ) -> Result<Attempt<T>, ApiError> {
        tracing::debug!(
            endpoint = %request.endpoint(),
            key = %credential.fingerprint(),
            "sending API request"
        );

        let response = self
            .client
            .get(request.url(&self.base_url))
            .query(request.query())
            .query(&[(CREDENTIAL_QUERY_PARAM, credential.expose())])
            .send()
            .await
            .map_err(FetchFailure::from)?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            return Ok(Attempt::QuotaRejected);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_owned());
            return Err(FetchFailure::HttpStatus {
                code: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY_LEN).to_owned(),
            }
            .into());
        }

        let body = response.text().await.map_err(FetchFailure::from)?;
        let items = parse_items(&body, request)?;
        Ok(Attempt::Succeeded(items))
    }
}

/// Extracts and deserializes the `items` array of a success body.
fn parse_items<T: DeserializeOwned>(
    body: &str,
    request: &RequestTemplate,
) -> Result<Vec<T>, FetchFailure> {
    let context = || format!("{} response (body: {})", request.endpoint(), truncate(body, 200));

    let mut value: serde_json::Value = serde_json::from_str(body)
        .map_err(|source| FetchFailure::JsonParse { context: context(), source })?;

    let items = match value.get_mut("items").map(serde_json::Value::take) {
        Some(items @ serde_json::Value::Array(_)) => items,
        _ => return Err(FetchFailure::MissingItems),
    };

    serde_json::from_value(items).map_err(|source| FetchFailure::JsonParse { context: context(), source })
}

/// Truncates a string to the given maximum length at a char boundary.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        s.get(..end).unwrap_or("")
    }
}

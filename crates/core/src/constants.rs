//! Shared constants for tubeshelf.

/// Maximum number of entries kept in watch history.
pub const HISTORY_LIMIT: usize = 50;

/// Storage key for the anonymous (local) watch history document.
pub const HISTORY_STORAGE_KEY: &str = "watchHistory";

/// Default base URL of the video platform data API.
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Default region for trending listings.
pub const DEFAULT_REGION: &str = "US";

/// Number of items requested per listing or search page.
pub const DEFAULT_MAX_RESULTS: u32 = 24;

/// Per-attempt HTTP timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Query parameter that carries the API credential.
pub const CREDENTIAL_QUERY_PARAM: &str = "key";

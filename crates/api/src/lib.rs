//! Video platform API client for tubeshelf.
//!
//! Requests go through [`RetryingFetcher`], which leases credentials from a
//! shared [`KeyPool`] and moves to the next one whenever the platform
//! rejects a key for quota.

mod api_types;
mod client;
mod error;
mod fetcher;
mod key_pool;
mod request;


pub use api_types::{ChannelInfo, VideoStatistics, VideoSummary};
pub use client::VideoClient;
pub use error::{ApiError, FetchFailure};
pub use fetcher::{RetryingFetcher, truncate};
pub use key_pool::KeyPool;
pub use request::{Endpoint, RequestTemplate};

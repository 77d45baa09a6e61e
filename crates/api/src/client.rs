use futures_util::future::join_all;
use tubeshelf_core::constants::DEFAULT_MAX_RESULTS;

use crate::api_types::{ChannelInfo, ChannelItem, VideoItem, VideoStatistics, VideoSummary};
use crate::error::ApiError;
use crate::fetcher::RetryingFetcher;
use crate::request::RequestTemplate;

/// Typed operations of the video platform, all routed through one
/// [`RetryingFetcher`].
#[derive(Debug)]
pub struct VideoClient {
    fetcher: RetryingFetcher,
    max_results: u32,
}

impl VideoClient {
    #[must_use]
    pub fn new(fetcher: RetryingFetcher) -> Self {
        Self { fetcher, max_results: DEFAULT_MAX_RESULTS }
    }

    /// Sets the page size for listings and searches.
    #[must_use]
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    #[must_use]
    pub const fn fetcher(&self) -> &RetryingFetcher {
        &self.fetcher
    }

    /// Most popular videos in `region`.
    ///
    /// # Errors
    /// Propagates fetcher errors.
    pub async fn trending(&self, region: &str) -> Result<Vec<VideoSummary>, ApiError> {
        let items: Vec<VideoItem> =
            self.fetcher.execute(&RequestTemplate::trending(region, self.max_results)).await?;
        Ok(items.into_iter().filter_map(VideoSummary::from_item).collect())
    }

    /// Videos matching `query`. Results carry no view counts.
    ///
    /// # Errors
    /// Returns [`ApiError::InvalidInput`] for a blank query, otherwise
    /// propagates fetcher errors.
    pub async fn search(&self, query: &str) -> Result<Vec<VideoSummary>, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ApiError::InvalidInput("search query is empty".to_owned()));
        }
        let items: Vec<VideoItem> =
            self.fetcher.execute(&RequestTemplate::search(query, self.max_results)).await?;
        Ok(items.into_iter().filter_map(VideoSummary::from_item).collect())
    }

    /// A single video's snippet and statistics, `None` if the id is unknown.
    ///
    /// # Errors
    /// Propagates fetcher errors.
    pub async fn video(&self, video_id: &str) -> Result<Option<VideoSummary>, ApiError> {
        let items: Vec<VideoItem> = self.fetcher.execute(&RequestTemplate::video(video_id)).await?;
        Ok(items.into_iter().find_map(VideoSummary::from_item))
    }

    /// # Errors
    /// Propagates fetcher errors.
    pub async fn statistics(&self, video_id: &str) -> Result<Option<VideoStatistics>, ApiError> {
        let items: Vec<VideoItem> =
            self.fetcher.execute(&RequestTemplate::statistics(video_id)).await?;
        Ok(items.into_iter().find_map(|item| item.statistics).map(VideoStatistics::from))
    }

    /// Statistics for several videos, fetched concurrently.
    ///
    /// Each lookup succeeds or fails on its own; results keep input order.
    pub async fn statistics_many(
        &self,
        video_ids: &[String],
    ) -> Vec<(String, Result<Option<VideoStatistics>, ApiError>)> {
        let lookups = video_ids.iter().map(|id| async move { (id.clone(), self.statistics(id).await) });
        join_all(lookups).await
    }

    /// # Errors
    /// Propagates fetcher errors.
    pub async fn channel(&self, channel_id: &str) -> Result<Option<ChannelInfo>, ApiError> {
        let items: Vec<ChannelItem> =
            self.fetcher.execute(&RequestTemplate::channel(channel_id)).await?;
        Ok(items.into_iter().next().map(ChannelInfo::from_item))
    }

    /// Fills missing view counts on `videos` with concurrent statistics lookups.
    ///
    /// Failed lookups leave the count empty and are logged.
    pub async fn attach_view_counts(&self, videos: &mut [VideoSummary]) {
        let missing: Vec<String> =
            videos.iter().filter(|v| v.view_count.is_none()).map(|v| v.id.clone()).collect();
        if missing.is_empty() {
            return;
        }

        for (id, result) in self.statistics_many(&missing).await {
            match result {
                Ok(Some(stats)) => {
                    if let Some(video) = videos.iter_mut().find(|v| v.id == id) {
                        video.view_count = stats.view_count;
                    }
                },
                Ok(None) => {},
                Err(e) => tracing::warn!(video_id = %id, error = %e, "statistics unavailable"),
            }
        }
    }
}

//! Logical request descriptions, independent of the credential used to send them.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Resource collection on the video platform API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Videos,
    Search,
    Channels,
}

impl Endpoint {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Videos => "videos",
            Self::Search => "search",
            Self::Channels => "channels",
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.path())
    }
}

/// An endpoint plus query parameters. The credential is added per attempt,
/// so one template can be re-sent unchanged with different keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTemplate {
    endpoint: Endpoint,
    query: Vec<(String, String)>,
}

impl RequestTemplate {
    #[must_use]
    pub const fn new(endpoint: Endpoint) -> Self {
        Self { endpoint, query: Vec::new() }
    }

    #[must_use]
    pub fn param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query.push((name.to_owned(), value.into()));
        self
    }

    /// Most popular videos for a region, with snippet and statistics.
    #[must_use]
    pub fn trending(region: &str, max_results: u32) -> Self {
        Self::new(Endpoint::Videos)
            .param("part", "snippet,statistics")
            .param("chart", "mostPopular")
            .param("maxResults", max_results.to_string())
            .param("regionCode", region)
    }

    /// Video search by free-text query.
    #[must_use]
    pub fn search(query: &str, max_results: u32) -> Self {
        Self::new(Endpoint::Search)
            .param("part", "snippet")
            .param("maxResults", max_results.to_string())
            .param("q", query)
            .param("type", "video")
    }

    #[must_use]
    pub fn statistics(video_id: &str) -> Self {
        Self::new(Endpoint::Videos).param("part", "statistics").param("id", video_id)
    }

    /// Snippet and statistics of a single video.
    #[must_use]
    pub fn video(video_id: &str) -> Self {
        Self::new(Endpoint::Videos).param("part", "snippet,statistics").param("id", video_id)
    }

    #[must_use]
    pub fn channel(channel_id: &str) -> Self {
        Self::new(Endpoint::Channels).param("part", "snippet").param("id", channel_id)
    }

    #[must_use]
    pub const fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    #[must_use]
    pub fn url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.endpoint.path())
    }
}

//! Wire types of the platform API and the normalized shapes handed to callers.

use serde::{Deserialize, Deserializer, Serialize};

/// `id` is a plain string on `videos` and `channels`, an object on `search`.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum ItemId {
    Plain(String),
    Search {
        #[serde(rename = "videoId")]
        video_id: Option<String>,
    },
}

impl ItemId {
    fn into_video_id(self) -> Option<String> {
        match self {
            Self::Plain(id) => Some(id),
            Self::Search { video_id } => video_id,
        }
    }
}

#[derive(Deserialize, Default)]
pub(crate) struct Thumbnail {
    pub url: Option<String>,
}

#[derive(Deserialize, Default)]
pub(crate) struct Thumbnails {
    #[serde(default)]
    pub default: Option<Thumbnail>,
    #[serde(default)]
    pub medium: Option<Thumbnail>,
    #[serde(default)]
    pub high: Option<Thumbnail>,
}

impl Thumbnails {
    fn medium_url(&self) -> Option<String> {
        [&self.medium, &self.high, &self.default]
            .into_iter()
            .flatten()
            .find_map(|t| t.url.clone())
    }

    fn default_url(&self) -> Option<String> {
        [&self.default, &self.medium, &self.high]
            .into_iter()
            .flatten()
            .find_map(|t| t.url.clone())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Snippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatisticsWire {
    #[serde(default, deserialize_with = "de_count")]
    pub view_count: Option<u64>,
    #[serde(default, deserialize_with = "de_count")]
    pub like_count: Option<u64>,
    #[serde(default, deserialize_with = "de_count")]
    pub comment_count: Option<u64>,
}

#[derive(Deserialize)]
pub(crate) struct VideoItem {
    pub id: Option<ItemId>,
    pub snippet: Option<Snippet>,
    pub statistics: Option<StatisticsWire>,
}

#[derive(Deserialize)]
pub(crate) struct ChannelSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Deserialize)]
pub(crate) struct ChannelItem {
    pub id: String,
    pub snippet: Option<ChannelSnippet>,
}

/// Counts arrive as decimal strings; accept numbers too.
fn de_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Text(String),
        Number(u64),
    }

    Ok(match Option::<Count>::deserialize(deserializer)? {
        Some(Count::Text(s)) => s.parse().ok(),
        Some(Count::Number(n)) => Some(n),
        None => None,
    })
}

/// A listing or search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
    pub id: String,
    pub title: String,
    pub channel_id: String,
    pub channel_title: String,
    pub published_at: Option<String>,
    pub thumbnail_url: Option<String>,
    pub view_count: Option<u64>,
}

impl VideoSummary {
    /// Items without an id or snippet are dropped.
    pub(crate) fn from_item(item: VideoItem) -> Option<Self> {
        let id = item.id?.into_video_id()?;
        let snippet = item.snippet?;
        Some(Self {
            id,
            thumbnail_url: snippet.thumbnails.medium_url(),
            title: snippet.title,
            channel_id: snippet.channel_id,
            channel_title: snippet.channel_title,
            published_at: snippet.published_at,
            view_count: item.statistics.and_then(|s| s.view_count),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    pub comment_count: Option<u64>,
}

impl From<StatisticsWire> for VideoStatistics {
    fn from(wire: StatisticsWire) -> Self {
        Self {
            view_count: wire.view_count,
            like_count: wire.like_count,
            comment_count: wire.comment_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelInfo {
    pub id: String,
    pub title: String,
    pub icon_url: Option<String>,
}

impl ChannelInfo {
    pub(crate) fn from_item(item: ChannelItem) -> Self {
        let (title, icon_url) = match item.snippet {
            Some(snippet) => (snippet.title, snippet.thumbnails.default_url()),
            None => (String::new(), None),
        };
        Self { id: item.id, title, icon_url }
    }
}

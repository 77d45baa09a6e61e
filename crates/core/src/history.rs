use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata supplied by the caller when a watch is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemMetadata {
    pub title: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub owner_label: String,
}

impl ItemMetadata {
    #[must_use]
    pub fn new(title: impl Into<String>, owner_label: impl Into<String>) -> Self {
        Self { title: title.into(), thumbnail_url: None, owner_label: owner_label.into() }
    }

    #[must_use]
    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }
}

/// One watched item in the recently-viewed list.
///
/// `item_id` is the unique key; a store holds at most one entry per id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub item_id: String,
    pub title: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub owner_label: String,
    pub watched_at: DateTime<Utc>,
}

impl HistoryEntry {
    #[must_use]
    pub fn new(item_id: String, metadata: ItemMetadata, watched_at: DateTime<Utc>) -> Self {
        Self {
            item_id,
            title: metadata.title,
            thumbnail_url: metadata.thumbnail_url,
            owner_label: metadata.owner_label,
            watched_at,
        }
    }
}

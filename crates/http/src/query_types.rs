//! Request/query types (Deserialize)

use serde::Deserialize;
use tubeshelf_core::ItemMetadata;
use tubeshelf_core::constants::HISTORY_LIMIT;

const fn default_history_limit() -> usize {
    HISTORY_LIMIT
}

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    pub region: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_limit")]
    pub limit: usize,
}

/// Body of `POST /api/history`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordWatchRequest {
    pub item_id: String,
    #[serde(flatten)]
    pub metadata: ItemMetadata,
}

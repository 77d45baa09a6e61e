use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;

use tubeshelf_api::{ChannelInfo, VideoStatistics, VideoSummary};

use crate::AppState;
use crate::api_error::ApiError;
use crate::query_types::{SearchQuery, TrendingQuery};

pub async fn trending(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TrendingQuery>,
) -> Result<Json<Vec<VideoSummary>>, ApiError> {
    let region = query
        .region
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(state.default_region.as_str());
    let videos = state.client.trending(region).await?;
    Ok(Json(videos))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<VideoSummary>>, ApiError> {
    let mut videos = state.client.search(&query.q).await?;
    state.client.attach_view_counts(&mut videos).await;
    Ok(Json(videos))
}

pub async fn statistics(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<VideoStatistics>, ApiError> {
    state
        .client
        .statistics(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("video '{id}' not found")))
}

pub async fn channel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ChannelInfo>, ApiError> {
    state
        .client
        .channel(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("channel '{id}' not found")))
}

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;

use tubeshelf_core::HistoryEntry;

use crate::AppState;
use crate::api_error::ApiError;
use crate::blocking::with_history;
use crate::query_types::{HistoryQuery, RecordWatchRequest};

pub async fn list_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    let limit = query.limit;
    let entries = with_history(Arc::clone(&state.history), move |store| {
        Ok(store.list().iter().take(limit).cloned().collect())
    })
    .await?;
    Ok(Json(entries))
}

pub async fn record_watch(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RecordWatchRequest>, JsonRejection>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    let Json(req) = payload?;
    let item_id = req.item_id.trim().to_owned();
    if item_id.is_empty() {
        return Err(ApiError::BadRequest("itemId is required".to_owned()));
    }
    let entries = with_history(Arc::clone(&state.history), move |store| {
        store.record(&item_id, req.metadata)?;
        Ok(store.list().to_vec())
    })
    .await?;
    Ok(Json(entries))
}

pub async fn clear_history(State(state): State<Arc<AppState>>) -> Result<StatusCode, ApiError> {
    with_history(Arc::clone(&state.history), |store| store.clear()).await?;
    Ok(StatusCode::NO_CONTENT)
}

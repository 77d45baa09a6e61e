//! Helpers for running blocking history operations in async handlers.
//!
//! History persistence is synchronous file IO, so every access runs on the
//! blocking pool while holding the store's mutex. The mutex keeps a single
//! writer at a time.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::spawn_blocking;
use tubeshelf_storage::{HistoryStore, StorageError};

use crate::api_error::ApiError;

/// Runs `f` against the locked history store on the blocking pool.
///
/// # Example
/// ```ignore
/// let entries = with_history(state.history.clone(), |store| Ok(store.list().to_vec())).await?;
/// ```
pub async fn with_history<T, F>(history: Arc<Mutex<HistoryStore>>, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&mut HistoryStore) -> Result<T, StorageError> + Send + 'static,
    T: Send + 'static,
{
    spawn_blocking(move || {
        let mut store = history.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut store)
    })
    .await
    .map_err(|e| {
        tracing::error!("Join error: {}", e);
        ApiError::Internal(anyhow::anyhow!("history task failed"))
    })?
    .map_err(ApiError::from)
}

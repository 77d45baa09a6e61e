//! Bounded, de-duplicated watch history.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tubeshelf_core::constants::{HISTORY_LIMIT, HISTORY_STORAGE_KEY};
use tubeshelf_core::{HistoryEntry, Identity, ItemMetadata};

use crate::error::StorageError;
use crate::kv::KeyValueStore;

/// Where history is persisted, chosen by sign-in state.
#[derive(Clone)]
pub enum HistoryBackend {
    /// Anonymous user: local key-value store under [`HISTORY_STORAGE_KEY`].
    Local(Arc<dyn KeyValueStore>),
    /// Signed-in user. Remote persistence is not implemented: nothing is
    /// read and writes are dropped.
    Remote { uid: String },
}

impl std::fmt::Debug for HistoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local(_) => f.write_str("Local"),
            Self::Remote { uid } => f.debug_struct("Remote").field("uid", uid).finish(),
        }
    }
}

impl HistoryBackend {
    #[must_use]
    pub fn select(identity: Option<&Identity>, local: Arc<dyn KeyValueStore>) -> Self {
        match identity {
            Some(user) => Self::Remote { uid: user.uid.clone() },
            None => Self::Local(local),
        }
    }

    fn read(&self) -> Result<Option<String>, StorageError> {
        match self {
            Self::Local(store) => store.get(HISTORY_STORAGE_KEY),
            Self::Remote { uid } => {
                tracing::debug!(uid = %uid, "remote history not available, starting empty");
                Ok(None)
            },
        }
    }

    fn write(&self, document: &str) -> Result<(), StorageError> {
        match self {
            Self::Local(store) => store.set(HISTORY_STORAGE_KEY, document),
            Self::Remote { uid } => {
                tracing::debug!(uid = %uid, "remote history not available, write dropped");
                Ok(())
            },
        }
    }

    fn erase(&self) -> Result<(), StorageError> {
        match self {
            Self::Local(store) => store.remove(HISTORY_STORAGE_KEY),
            Self::Remote { uid } => {
                tracing::debug!(uid = %uid, "remote history not available, clear dropped");
                Ok(())
            },
        }
    }
}

/// Most-recent-first list of watched items, at most [`HISTORY_LIMIT`] long,
/// with at most one entry per item id.
///
/// Every mutation updates the persisted document before returning. The
/// in-memory list only changes once that write succeeded.
#[derive(Debug)]
pub struct HistoryStore {
    backend: HistoryBackend,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Loads persisted history. Absent or unparsable data yields an empty
    /// store; a corrupt document is logged and left to be overwritten by the
    /// next mutation.
    ///
    /// # Errors
    /// Returns an error only if the backend cannot be read at all.
    pub fn load(backend: HistoryBackend) -> Result<Self, StorageError> {
        let entries = match backend.read()? {
            Some(document) => parse_entries(&document),
            None => Vec::new(),
        };
        Ok(Self { backend, entries })
    }

    /// Records a watch of `item_id` now.
    ///
    /// # Errors
    /// Returns an error if persisting fails; the list is left unchanged.
    pub fn record(&mut self, item_id: &str, metadata: ItemMetadata) -> Result<(), StorageError> {
        self.record_at(item_id, metadata, Utc::now())
    }

    /// Records a watch with an explicit timestamp.
    ///
    /// # Errors
    /// See [`HistoryStore::record`].
    pub fn record_at(
        &mut self,
        item_id: &str,
        metadata: ItemMetadata,
        watched_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut entries = Vec::with_capacity(HISTORY_LIMIT);
        entries.push(HistoryEntry::new(item_id.to_owned(), metadata, watched_at));
        entries.extend(
            self.entries.iter().filter(|e| e.item_id != item_id).take(HISTORY_LIMIT - 1).cloned(),
        );

        let document = serde_json::to_string(&entries)?;
        self.backend.write(&document)?;
        self.entries = entries;
        Ok(())
    }

    /// Removes every entry and deletes the persisted document.
    ///
    /// # Errors
    /// Returns an error if the document cannot be removed; the list is left
    /// unchanged.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.backend.erase()?;
        self.entries.clear();
        Ok(())
    }

    #[must_use]
    pub fn list(&self) -> &[HistoryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses a persisted list, restoring the store invariants: duplicates after
/// the first occurrence are dropped and the list is cut to the limit.
fn parse_entries(document: &str) -> Vec<HistoryEntry> {
    let parsed: Vec<HistoryEntry> = match serde_json::from_str(document) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "corrupt watch history, starting empty");
            return Vec::new();
        },
    };

    let mut seen = HashSet::new();
    let mut entries: Vec<HistoryEntry> =
        parsed.into_iter().filter(|e| seen.insert(e.item_id.clone())).collect();
    entries.truncate(HISTORY_LIMIT);
    entries
}

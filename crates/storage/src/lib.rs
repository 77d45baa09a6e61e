//! Storage layer for tubeshelf
//!
//! Whole-document key-value stores and the watch history built on them.

mod error;
mod history_store;
mod kv;

pub use error::StorageError;
pub use history_store::{HistoryBackend, HistoryStore};
pub use kv::{FileStore, KeyValueStore, MemoryStore};

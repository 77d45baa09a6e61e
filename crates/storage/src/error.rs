//! Typed error enum for the storage layer.

use thiserror::Error;

/// Storage-layer error.
///
/// Corrupt persisted history is not represented here: it is recovered by
/// starting from an empty list.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage io error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// In-memory data could not be encoded for persistence.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key contains characters that cannot map to a file name.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

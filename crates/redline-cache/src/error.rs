//! Cache error types.

use thiserror::Error;

/// Errors that can occur when using the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The backing directory could not be created or opened.
    #[error("cannot open store: {0}")]
    OpenError(String),

    /// A value did not round-trip through JSON.
    #[error("value is not valid JSON for this type: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// Reading, writing or removing an entry failed.
    #[error("store I/O failed: {0}")]
    StoreError(String),

    /// Key is empty or cannot be mapped to a file name.
    #[error("invalid key: {0:?}")]
    InvalidKey(String),
}

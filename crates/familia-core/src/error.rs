//! Library error types.
//!
//! The store adapter swallows these at its public surface (returning a
//! `bool` or the caller's default), but backends and content operations
//! report them so the caller can log or surface them.

use thiserror::Error;

/// Errors raised by a [`KeyValueStore`](crate::store::KeyValueStore) backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No storage is available in this execution context.
    #[error("storage unavailable")]
    Unavailable,

    /// Writing the value would exceed the backend's byte quota.
    #[error("storage quota exceeded ({used} of {quota} bytes)")]
    QuotaExceeded { used: usize, quota: usize },

    /// The key cannot be represented by this backend.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// An I/O error from a file-backed store.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from content management (categories, CSV import/export).
#[derive(Debug, Error)]
pub enum ContentError {
    /// The CSV text produced no usable rows; nothing was imported.
    #[error("invalid CSV format: no usable rows ({skipped} line(s) skipped)")]
    InvalidCsv { skipped: usize },

    /// The named category does not exist.
    #[error("unknown {kind} category: {name}")]
    UnknownCategory { kind: String, name: String },

    /// Writing the CSV output failed.
    #[error("CSV write error: {0}")]
    CsvWrite(#[from] csv::Error),

    /// The updated content could not be persisted.
    #[error("failed to save {0}")]
    SaveFailed(String),
}

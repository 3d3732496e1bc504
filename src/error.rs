//! Error types for temporary storage.

use thiserror::Error;

/// Result alias used across the crate.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised by storage backends and configuration loading.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Nothing is stored under this name (never saved, removed, or expired).
    #[error("no staged data found for '{name}'")]
    Missing { name: String },

    /// The storage was read before it was saved or given a name.
    #[error("storage has no name yet; save data before reading it")]
    Unnamed,

    /// Names must be plain tokens, usable both as a cache key suffix and a file name.
    #[error("invalid storage name '{0}'")]
    InvalidName(String),

    #[error("unknown storage backend '{0}' (expected one of: tmp_file, cache, memory)")]
    UnknownBackend(String),

    #[error("invalid value for {key}: {reason}")]
    InvalidSetting { key: &'static str, reason: String },

    #[error("staged data is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

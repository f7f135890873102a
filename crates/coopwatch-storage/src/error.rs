/// Errors that can occur within the storage layer.
///
/// # Examples
///
/// ```rust
/// use coopwatch_storage::error::StorageError;
///
/// let err = StorageError::Corrupt {
///     key: "notifications".to_string(),
///     reason: "expected a JSON array".to_string(),
/// };
/// assert!(err.to_string().contains("notifications"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// An underlying SQLite error.
    #[error("Storage: SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// JSON serialization or deserialization failure of the stored log.
    #[error("Storage: JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error while preparing the database location.
    #[error("Storage: I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored value exists but has an unexpected shape.
    #[error("Storage: value under key '{key}' is corrupt: {reason}")]
    Corrupt { key: String, reason: String },
}

/// Convenience `Result` alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

//! Persistence for the alert log.
//!
//! The log is stored as a single JSON array under one key, mirroring the
//! dashboard's local-storage layout. [`sqlite::SqliteNotificationStore`]
//! keeps it in a small SQLite key/value table with WAL enabled;
//! [`MemoryNotificationStore`] keeps it in process memory.

pub mod error;
pub mod sqlite;


pub use error::{Result, StorageError};

use std::sync::{Mutex, MutexGuard};

/// Storage key under which the alert log is persisted.
pub const NOTIFICATIONS_KEY: &str = "notifications";

/// Persisted backing store for the alert log.
///
/// `save` must replace the stored sequence atomically: after a crash the
/// store holds either the previous or the new sequence, never a mix.
pub trait NotificationStore: Send + Sync {
    /// Reads the stored sequence; an empty store yields an empty vector.
    fn load(&self) -> Result<Vec<String>>;

    /// Replaces the stored sequence with `entries`.
    fn save(&self, entries: &[String]) -> Result<()>;
}

/// Process-local store, useful for tests and for running without a disk.
#[derive(Default)]
pub struct MemoryNotificationStore {
    entries: Mutex<Vec<String>>,
}

impl MemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<String>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }

    /// Current stored sequence.
    pub fn snapshot(&self) -> Vec<String> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl NotificationStore for MemoryNotificationStore {
    fn load(&self) -> Result<Vec<String>> {
        Ok(self.lock().clone())
    }

    fn save(&self, entries: &[String]) -> Result<()> {
        *self.lock() = entries.to_vec();
        Ok(())
    }
}

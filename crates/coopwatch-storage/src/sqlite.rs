use crate::error::{Result, StorageError};
use crate::{NotificationStore, NOTIFICATIONS_KEY};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

const KV_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);
";

/// SQLite-backed store holding the alert log as a JSON array under one key.
///
/// The connection is opened lazily on first use. If opening fails the error
/// is returned to the caller and the next call tries again, so a database
/// that becomes available later is picked up without a restart.
pub struct SqliteNotificationStore {
    path: PathBuf,
    conn: Mutex<Option<Connection>>,
}

impl SqliteNotificationStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            conn: Mutex::new(None),
        }
    }

    /// Opens the database immediately, failing if it cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let store = Self::new(path);
        store.with_conn(|_| Ok(()))?;
        Ok(store)
    }

    /// Lock the connection slot, recovering from a poisoned Mutex if necessary.
    fn lock_conn(&self) -> MutexGuard<'_, Option<Connection>> {
        self.conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let mut slot = self.lock_conn();
        let conn = match slot.take() {
            Some(conn) => conn,
            None => self.connect()?,
        };
        let result = f(&conn);
        *slot = Some(conn);
        result
    }

    fn connect(&self) -> Result<Connection> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(&self.path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(KV_SCHEMA)?;
        tracing::info!(path = %self.path.display(), "Notification store opened");
        Ok(conn)
    }
}

impl NotificationStore for SqliteNotificationStore {
    fn load(&self) -> Result<Vec<String>> {
        let raw: Option<String> = self.with_conn(|conn| {
            let raw = conn
                .query_row(
                    "SELECT value FROM kv_store WHERE key = ?1",
                    [NOTIFICATIONS_KEY],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(raw)
        })?;

        match raw {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|e| StorageError::Corrupt {
                key: NOTIFICATIONS_KEY.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn save(&self, entries: &[String]) -> Result<()> {
        let value = serde_json::to_string(entries)?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                rusqlite::params![NOTIFICATIONS_KEY, value, Utc::now().timestamp_millis()],
            )?;
            Ok(())
        })?;
        tracing::debug!(key = NOTIFICATIONS_KEY, count = entries.len(), "Notifications saved");
        Ok(())
    }
}

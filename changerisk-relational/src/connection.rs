//! `DatabaseManager` — single write connection, WAL mode, migrations run on
//! open. Pattern reference: drift-storage's write-serialized connection
//! manager, simplified to a single mutex-guarded connection since this core
//! has no NAPI-bound batch-writer thread to keep off the caller's path.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::Connection;
use tracing::info;

use crate::errors::{StorageError, StorageResult};
use crate::migrations;

pub struct DatabaseManager {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl DatabaseManager {
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn, Some(path.to_path_buf()))
    }

    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> StorageResult<Self> {
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.pragma_update(None, "busy_timeout", 5000)?;

        migrations::run_all(&conn).map_err(|e| StorageError::MigrationFailed {
            version: migrations::LATEST_VERSION,
            message: e.to_string(),
        })?;

        info!(
            path = ?path,
            schema_version = migrations::LATEST_VERSION,
            "relational store opened"
        );

        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read access. Named distinctly from `with_writer` even though both
    /// currently share one connection — keeps the call sites honest about
    /// intent and gives a seam for a real reader pool later.
    pub fn with_reader<F, T>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&Connection) -> StorageResult<T>,
    {
        let guard = self.conn.lock().expect("db mutex poisoned");
        f(&guard)
    }

    pub fn with_writer<F, T>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&Connection) -> StorageResult<T>,
    {
        let guard = self.conn.lock().expect("db mutex poisoned");
        f(&guard)
    }

    pub fn checkpoint(&self) -> StorageResult<()> {
        self.with_writer(|c| {
            c.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
            Ok(())
        })
    }
}

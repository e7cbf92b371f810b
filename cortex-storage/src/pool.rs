//! One writer connection behind a mutex, a handful of read-only
//! connections behind their own mutexes chosen round-robin, WAL mode, and
//! a `busy_timeout` of 5s (spec §5 "Database open uses a 5s busy
//! timeout"). Writes retry once on `SQLITE_BUSY` with a short backoff
//! before surfacing `STORAGE_ERROR` (spec §7).

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use rusqlite::Connection;

use cortex_core::errors::{CortexError, CortexResult};

const BUSY_TIMEOUT_MS: u64 = 5_000;
const RETRY_BACKOFF_MS: u64 = 25;
const READER_COUNT: usize = 4;

pub struct ConnectionPool {
    pub writer: Mutex<Connection>,
    readers: Vec<Mutex<Connection>>,
    next_reader: AtomicUsize,
}

impl ConnectionPool {
    pub fn open(path: &Path) -> CortexResult<Self> {
        let writer = open_conn(path.to_string_lossy().as_ref(), false)?;
        let mut readers = Vec::with_capacity(READER_COUNT);
        for _ in 0..READER_COUNT {
            readers.push(Mutex::new(open_conn(
                path.to_string_lossy().as_ref(),
                true,
            )?));
        }
        Ok(Self {
            writer: Mutex::new(writer),
            readers,
            next_reader: AtomicUsize::new(0),
        })
    }

    /// Shared-cache in-memory database so multiple connections (writer +
    /// readers) observe the same data. Used by tests and `open_in_memory`.
    pub fn open_in_memory() -> CortexResult<Self> {
        let uri = "file:cortex-mem?mode=memory&cache=shared";
        let writer = open_conn(uri, false)?;
        let mut readers = Vec::with_capacity(READER_COUNT);
        for _ in 0..READER_COUNT {
            readers.push(Mutex::new(open_conn(uri, true)?));
        }
        Ok(Self {
            writer: Mutex::new(writer),
            readers,
            next_reader: AtomicUsize::new(0),
        })
    }

    /// Run `f` against the writer connection, retrying once on
    /// `SQLITE_BUSY` (spec §5/§7).
    pub fn with_writer<F, T>(&self, f: F) -> CortexResult<T>
    where
        F: Fn(&Connection) -> CortexResult<T>,
    {
        let conn = self
            .writer
            .lock()
            .map_err(|_| CortexError::StorageError("writer mutex poisoned".into()))?;
        match f(&conn) {
            Ok(v) => Ok(v),
            Err(CortexError::StorageBusy) => {
                std::thread::sleep(Duration::from_millis(RETRY_BACKOFF_MS));
                f(&conn).map_err(|e| match e {
                    CortexError::StorageBusy => {
                        CortexError::StorageError("storage busy after retry".into())
                    }
                    other => other,
                })
            }
            Err(other) => Err(other),
        }
    }

    /// Run `f` against a reader connection chosen round-robin.
    pub fn with_reader<F, T>(&self, f: F) -> CortexResult<T>
    where
        F: FnOnce(&Connection) -> CortexResult<T>,
    {
        let idx = self.next_reader.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        let conn = self.readers[idx]
            .lock()
            .map_err(|_| CortexError::StorageError("reader mutex poisoned".into()))?;
        f(&conn)
    }
}

fn open_conn(path: &str, read_only: bool) -> CortexResult<Connection> {
    let conn = if read_only {
        Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
    } else {
        Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
    }
    .map_err(|e| CortexError::StorageError(e.to_string()))?;

    conn.busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS))
        .map_err(|e| CortexError::StorageError(e.to_string()))?;
    conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;")
        .map_err(|e| CortexError::StorageError(e.to_string()))?;
    Ok(conn)
}

/// Map a `rusqlite::Error` into the spec's error taxonomy, classifying
/// `SQLITE_BUSY` specially so `with_writer` can retry it.
pub fn map_err(e: rusqlite::Error) -> CortexError {
    if let rusqlite::Error::SqliteFailure(err, _) = &e {
        if err.code == rusqlite::ErrorCode::DatabaseBusy {
            return CortexError::StorageBusy;
        }
    }
    CortexError::StorageError(e.to_string())
}

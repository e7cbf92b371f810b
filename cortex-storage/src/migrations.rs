//! Versioned schema migrations, applied idempotently at open time. The
//! table/column set and index list here are contractual per spec §6.

use rusqlite::Connection;

use cortex_core::errors::{CortexError, CortexResult};

const MIGRATIONS: &[(&str, &str)] = &[
    (
        "0001_memories",
        "CREATE TABLE IF NOT EXISTS memories (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            type            TEXT NOT NULL,
            category        TEXT NOT NULL,
            title           TEXT NOT NULL,
            content         TEXT NOT NULL,
            project         TEXT,
            tags            TEXT NOT NULL DEFAULT '[]',
            salience        REAL NOT NULL,
            decayed_score   REAL NOT NULL,
            access_count    INTEGER NOT NULL DEFAULT 0,
            metadata        TEXT NOT NULL DEFAULT '{}',
            created_at      TEXT NOT NULL,
            last_accessed   TEXT NOT NULL,
            embedding       BLOB
        );",
    ),
    (
        "0002_memory_links",
        "CREATE TABLE IF NOT EXISTS memory_links (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            source_id       INTEGER NOT NULL REFERENCES memories(id) ON DELETE CASCADE,
            target_id       INTEGER NOT NULL REFERENCES memories(id) ON DELETE CASCADE,
            relationship    TEXT NOT NULL,
            strength        REAL NOT NULL,
            created_at      TEXT NOT NULL,
            UNIQUE(source_id, target_id, relationship)
        );",
    ),
    (
        "0003_sessions",
        "CREATE TABLE IF NOT EXISTS sessions (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            project         TEXT,
            started_at      TEXT NOT NULL,
            ended_at        TEXT,
            summary         TEXT
        );",
    ),
    (
        "0004_indices",
        "CREATE INDEX IF NOT EXISTS idx_memories_project ON memories(project);
         CREATE INDEX IF NOT EXISTS idx_memories_type ON memories(type);
         CREATE INDEX IF NOT EXISTS idx_memories_last_accessed ON memories(last_accessed);
         CREATE INDEX IF NOT EXISTS idx_links_source ON memory_links(source_id);
         CREATE INDEX IF NOT EXISTS idx_links_target ON memory_links(target_id);",
    ),
];

pub fn run_migrations(conn: &Connection) -> CortexResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|e| CortexError::StorageError(e.to_string()))?;
    for (name, sql) in MIGRATIONS {
        conn.execute_batch(sql).map_err(|e| {
            CortexError::StorageError(format!("migration {name} failed: {e}"))
        })?;
    }
    Ok(())
}

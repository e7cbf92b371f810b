use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use cortex_core::errors::CortexResult;
use cortex_core::memory::{Memory, NewMemory, Truncation};
use cortex_core::traits::ResolvedDefaults;

use crate::convert::{embedding_to_blob, row_to_memory, to_cortex_result};

const SELECT_COLUMNS: &str = "id, type, category, title, content, project, tags, salience, \
     decayed_score, access_count, metadata, created_at, last_accessed, embedding";

/// Insert a new memory. `resolved` carries the category/type/salience the
/// `Engine` has already computed via `cortex-decay`'s salience analyzer
/// and the `importance` override; this layer only persists (spec §4.1).
pub fn insert(
    conn: &Connection,
    mut input: NewMemory,
    resolved: ResolvedDefaults,
) -> CortexResult<(Memory, Truncation)> {
    input.validate()?;
    let truncation = input.truncate_content();
    let now = Utc::now();
    let tags_json = serde_json::to_string(&input.tags).unwrap_or_else(|_| "[]".into());
    let metadata_json = serde_json::to_string(&input.metadata).unwrap_or_else(|_| "{}".into());
    let embedding_blob = input.embedding.as_ref().map(|e| embedding_to_blob(e));

    to_cortex_result(conn.execute(
        "INSERT INTO memories (type, category, title, content, project, tags, salience, \
         decayed_score, access_count, metadata, created_at, last_accessed, embedding) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7, 0, ?8, ?9, ?9, ?10)",
        params![
            resolved.memory_type.as_str(),
            resolved.category.as_str(),
            input.title,
            input.content,
            input.project,
            tags_json,
            resolved.salience,
            metadata_json,
            now.to_rfc3339(),
            embedding_blob,
        ],
    ))?;
    let id = conn.last_insert_rowid();
    let memory = to_cortex_result(get(conn, id))?.expect("just inserted");
    Ok((memory, truncation))
}

pub fn get(conn: &Connection, id: i64) -> rusqlite::Result<Option<Memory>> {
    conn.query_row(
        &format!("SELECT {SELECT_COLUMNS} FROM memories WHERE id = ?1"),
        params![id],
        row_to_memory,
    )
    .optional()
}

pub fn update(conn: &Connection, memory: &Memory) -> CortexResult<()> {
    let tags_json = serde_json::to_string(&memory.tags).unwrap_or_else(|_| "[]".into());
    let metadata_json = serde_json::to_string(&memory.metadata).unwrap_or_else(|_| "{}".into());
    let embedding_blob = memory.embedding.as_ref().map(|e| embedding_to_blob(e));
    to_cortex_result(conn.execute(
        "UPDATE memories SET type = ?1, category = ?2, title = ?3, content = ?4, project = ?5, \
         tags = ?6, salience = ?7, decayed_score = ?8, access_count = ?9, metadata = ?10, \
         last_accessed = ?11, embedding = ?12 WHERE id = ?13",
        params![
            memory.memory_type.as_str(),
            memory.category.as_str(),
            memory.title,
            memory.content,
            memory.project,
            tags_json,
            memory.salience,
            memory.decayed_score,
            memory.access_count as i64,
            metadata_json,
            memory.last_accessed.to_rfc3339(),
            embedding_blob,
            memory.id,
        ],
    ))?;
    Ok(())
}

/// Reinforce on access: refresh the age-based decay up to now, then
/// multiply by `reinforcement_factor` clamped to 1.0, bump `access_count`,
/// and refresh `last_accessed` (spec §4.1/§4.4). The stored `decayed_score`
/// is otherwise only refreshed by the consolidator, so without recomputing
/// decay here first, a long-idle access would reinforce a stale score.
pub fn access(
    conn: &Connection,
    id: i64,
    reinforcement_factor: f64,
    decay_rate: f64,
) -> CortexResult<Option<Memory>> {
    let Some(mut memory) = to_cortex_result(get(conn, id))? else {
        return Ok(None);
    };
    let now = Utc::now();
    let hours_since_access = (now - memory.last_accessed).num_milliseconds() as f64 / 3_600_000.0;
    let decayed = cortex_decay::decayed(memory.salience, hours_since_access, memory.access_count, decay_rate);
    memory.decayed_score = (decayed * reinforcement_factor).min(1.0);
    memory.access_count += 1;
    memory.last_accessed = now;
    update(conn, &memory)?;
    Ok(Some(memory))
}

pub fn delete(conn: &Connection, id: i64) -> CortexResult<()> {
    to_cortex_result(conn.execute("DELETE FROM memories WHERE id = ?1", params![id]))?;
    Ok(())
}

//! The one place a generic SQLite row becomes a typed `Memory`/`Link`
//! (spec §9: "the store boundary converts a generic row map into a typed
//! value in exactly one place"). Every other layer only ever sees
//! `cortex_core::Memory` / `cortex_core::Link`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rusqlite::Row;

use cortex_core::errors::{CortexError, CortexResult};
use cortex_core::link::{Link, Relationship};
use cortex_core::memory::{Category, Memory, MemoryType};

pub fn embedding_to_blob(embedding: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(embedding.len() * 4);
    for f in embedding {
        bytes.extend_from_slice(&f.to_le_bytes());
    }
    bytes
}

pub fn blob_to_embedding(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes(c.try_into().unwrap()))
        .collect()
}

pub fn row_to_memory(row: &Row) -> rusqlite::Result<Memory> {
    let type_str: String = row.get("type")?;
    let category_str: String = row.get("category")?;
    let tags_json: String = row.get("tags")?;
    let metadata_json: String = row.get("metadata")?;
    let created_at: String = row.get("created_at")?;
    let last_accessed: String = row.get("last_accessed")?;
    let embedding_blob: Option<Vec<u8>> = row.get("embedding")?;

    let memory_type = MemoryType::parse(&type_str).map_err(to_sqlite_err)?;
    let category = Category::parse(&category_str).map_err(to_sqlite_err)?;
    let tags: Vec<String> = serde_json::from_str(&tags_json).unwrap_or_default();
    let metadata: BTreeMap<String, serde_json::Value> =
        serde_json::from_str(&metadata_json).unwrap_or_default();
    let created_at = parse_timestamp(&created_at)?;
    let last_accessed = parse_timestamp(&last_accessed)?;

    Ok(Memory {
        id: row.get("id")?,
        memory_type,
        category,
        title: row.get("title")?,
        content: row.get("content")?,
        project: row.get("project")?,
        tags,
        salience: row.get("salience")?,
        decayed_score: row.get("decayed_score")?,
        access_count: {
            let v: i64 = row.get("access_count")?;
            v as u64
        },
        created_at,
        last_accessed,
        metadata,
        embedding: embedding_blob.map(|b| blob_to_embedding(&b)),
    })
}

pub fn row_to_link(row: &Row) -> rusqlite::Result<Link> {
    let relationship_str: String = row.get("relationship")?;
    let relationship = Relationship::parse(&relationship_str).map_err(to_sqlite_err)?;
    let created_at: String = row.get("created_at")?;
    Ok(Link {
        id: row.get("id")?,
        source_id: row.get("source_id")?,
        target_id: row.get("target_id")?,
        relationship,
        strength: row.get("strength")?,
        created_at: parse_timestamp(&created_at)?,
    })
}

pub fn parse_timestamp(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| to_sqlite_err(CortexError::StorageError(e.to_string())))
}

fn to_sqlite_err(e: CortexError) -> rusqlite::Error {
    rusqlite::Error::InvalidColumnType(
        0,
        e.to_string(),
        rusqlite::types::Type::Text,
    )
}

pub fn to_cortex_result<T>(r: rusqlite::Result<T>) -> CortexResult<T> {
    r.map_err(crate::pool::map_err)
}

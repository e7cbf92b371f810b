use std::collections::HashMap;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use cortex_core::errors::CortexResult;
use cortex_core::link::Link;
use cortex_core::memory::Memory;

use crate::convert::embedding_to_blob;

/// Export every memory in `project` scope plus the links whose endpoints
/// are both within that set (spec §6).
pub fn export(conn: &Connection, project: Option<&str>) -> CortexResult<(Vec<Memory>, Vec<Link>)> {
    let memories = super::memory_query::all(conn, project)?;
    let ids: std::collections::HashSet<i64> = memories.iter().map(|m| m.id).collect();
    let links = super::link_ops::all_links(conn)?
        .into_iter()
        .filter(|l| ids.contains(&l.source_id) && ids.contains(&l.target_id))
        .collect();
    Ok((memories, links))
}

/// Import memories + links inside a single transaction. Memories whose id
/// already exists are renumbered (inserted fresh, new id assigned); links
/// are recreated against the resolved (possibly renumbered) ids. Any
/// failure aborts the whole import (spec §6/§7).
pub fn import(conn: &mut Connection, memories: Vec<Memory>, links: Vec<Link>) -> CortexResult<usize> {
    let tx = conn.transaction().map_err(crate::pool::map_err)?;
    let mut id_map: HashMap<i64, i64> = HashMap::new();

    for memory in &memories {
        let exists: bool = tx
            .query_row(
                "SELECT 1 FROM memories WHERE id = ?1",
                params![memory.id],
                |_| Ok(true),
            )
            .optional()
            .map_err(crate::pool::map_err)?
            .unwrap_or(false);

        let tags_json = serde_json::to_string(&memory.tags).unwrap_or_else(|_| "[]".into());
        let metadata_json =
            serde_json::to_string(&memory.metadata).unwrap_or_else(|_| "{}".into());
        let embedding_blob = memory.embedding.as_ref().map(|e| embedding_to_blob(e));

        if exists {
            // Collision: insert as a new row and remember the remap.
            tx.execute(
                "INSERT INTO memories (type, category, title, content, project, tags, salience, \
                 decayed_score, access_count, metadata, created_at, last_accessed, embedding) \
                 VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13)",
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
                    memory.created_at.to_rfc3339(),
                    memory.last_accessed.to_rfc3339(),
                    embedding_blob,
                ],
            )
            .map_err(crate::pool::map_err)?;
            id_map.insert(memory.id, tx.last_insert_rowid());
        } else {
            tx.execute(
                "INSERT INTO memories (id, type, category, title, content, project, tags, \
                 salience, decayed_score, access_count, metadata, created_at, last_accessed, \
                 embedding) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14)",
                params![
                    memory.id,
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
                    memory.created_at.to_rfc3339(),
                    memory.last_accessed.to_rfc3339(),
                    embedding_blob,
                ],
            )
            .map_err(crate::pool::map_err)?;
            id_map.insert(memory.id, memory.id);
        }
    }

    for link in &links {
        let (Some(&source_id), Some(&target_id)) =
            (id_map.get(&link.source_id), id_map.get(&link.target_id))
        else {
            continue;
        };
        // Ignore uniqueness violations the same way `create_link` does.
        let _ = tx.execute(
            "INSERT INTO memory_links (source_id, target_id, relationship, strength, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                source_id,
                target_id,
                link.relationship.as_str(),
                link.strength,
                Utc::now().to_rfc3339(),
            ],
        );
    }

    let count = memories.len();
    tx.commit().map_err(crate::pool::map_err)?;
    Ok(count)
}

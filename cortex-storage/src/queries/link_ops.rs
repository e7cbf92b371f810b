use chrono::Utc;
use rusqlite::{params, Connection};

use cortex_core::errors::CortexResult;
use cortex_core::link::{Link, Relationship};

use crate::convert::row_to_link;

const SELECT_COLUMNS: &str = "id, source_id, target_id, relationship, strength, created_at";

/// Create a link. Rejects self-links; silently treats a uniqueness
/// violation on `(source_id, target_id, relationship)` as "already
/// exists" rather than an error (spec §4.1).
pub fn create_link(
    conn: &Connection,
    source_id: i64,
    target_id: i64,
    relationship: Relationship,
    strength: f64,
) -> CortexResult<bool> {
    if source_id == target_id {
        return Ok(false);
    }
    let result = conn.execute(
        "INSERT INTO memory_links (source_id, target_id, relationship, strength, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            source_id,
            target_id,
            relationship.as_str(),
            strength,
            Utc::now().to_rfc3339(),
        ],
    );
    match result {
        Ok(_) => Ok(true),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Ok(false)
        }
        Err(e) => Err(crate::pool::map_err(e)),
    }
}

pub fn delete_link(conn: &Connection, id: i64) -> CortexResult<()> {
    conn.execute("DELETE FROM memory_links WHERE id = ?1", params![id])
        .map_err(crate::pool::map_err)?;
    Ok(())
}

pub fn links_from(conn: &Connection, id: i64) -> CortexResult<Vec<Link>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM memory_links WHERE source_id = ?1"
        ))
        .map_err(crate::pool::map_err)?;
    let rows = stmt
        .query_map(params![id], row_to_link)
        .map_err(crate::pool::map_err)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(crate::pool::map_err)
}

pub fn links_to(conn: &Connection, id: i64) -> CortexResult<Vec<Link>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM memory_links WHERE target_id = ?1"
        ))
        .map_err(crate::pool::map_err)?;
    let rows = stmt
        .query_map(params![id], row_to_link)
        .map_err(crate::pool::map_err)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(crate::pool::map_err)
}

pub fn all_links(conn: &Connection) -> CortexResult<Vec<Link>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {SELECT_COLUMNS} FROM memory_links"))
        .map_err(crate::pool::map_err)?;
    let rows = stmt
        .query_map([], row_to_link)
        .map_err(crate::pool::map_err)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(crate::pool::map_err)
}

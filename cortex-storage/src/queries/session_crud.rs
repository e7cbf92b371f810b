use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use cortex_core::errors::CortexResult;
use cortex_core::session::Session;

use crate::convert::{parse_timestamp, to_cortex_result};

fn row_to_session(row: &rusqlite::Row) -> rusqlite::Result<Session> {
    let started_at: String = row.get(2)?;
    let ended_at: Option<String> = row.get(3)?;
    Ok(Session {
        id: row.get(0)?,
        project: row.get(1)?,
        started_at: parse_timestamp(&started_at)?,
        ended_at: ended_at.map(|s| parse_timestamp(&s)).transpose()?,
        summary: row.get(4)?,
    })
}

pub fn start_session(conn: &Connection, project: Option<&str>) -> CortexResult<Session> {
    let now = Utc::now();
    to_cortex_result(conn.execute(
        "INSERT INTO sessions (project, started_at) VALUES (?1, ?2)",
        params![project, now.to_rfc3339()],
    ))?;
    let id = conn.last_insert_rowid();
    Ok(Session {
        id,
        project: project.map(str::to_string),
        started_at: now,
        ended_at: None,
        summary: None,
    })
}

pub fn end_session(conn: &Connection, id: i64, summary: Option<&str>) -> CortexResult<Option<Session>> {
    let now = Utc::now();
    let updated = to_cortex_result(conn.execute(
        "UPDATE sessions SET ended_at = ?1, summary = ?2 WHERE id = ?3",
        params![now.to_rfc3339(), summary, id],
    ))?;
    if updated == 0 {
        return Ok(None);
    }
    get_session(conn, id)
}

pub fn get_session(conn: &Connection, id: i64) -> CortexResult<Option<Session>> {
    to_cortex_result(
        conn.query_row(
            "SELECT id, project, started_at, ended_at, summary FROM sessions WHERE id = ?1",
            params![id],
            row_to_session,
        )
        .optional(),
    )
}

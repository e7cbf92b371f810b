use rusqlite::{params_from_iter, types::Value as SqlValue, Connection};

use cortex_core::errors::CortexResult;
use cortex_core::memory::Memory;
use cortex_core::traits::{MemoryFilter, Stats};

use crate::convert::{row_to_memory, to_cortex_result};

const SELECT_COLUMNS: &str = "id, type, category, title, content, project, tags, salience, \
     decayed_score, access_count, metadata, created_at, last_accessed, embedding";

/// `CASE` expression mapping each category to its deletion threshold
/// (spec §4.7 step 4), used to implement "exclude rows below their
/// category-specific threshold unless `includeDecayed`" (spec §4.5).
const DELETION_THRESHOLD_CASE: &str = "CASE category \
    WHEN 'architecture' THEN 0.15 \
    WHEN 'error' THEN 0.15 \
    WHEN 'pattern' THEN 0.18 \
    WHEN 'preference' THEN 0.20 \
    WHEN 'learning' THEN 0.20 \
    WHEN 'relationship' THEN 0.20 \
    WHEN 'context' THEN 0.22 \
    WHEN 'custom' THEN 0.22 \
    ELSE 0.25 END";

fn build_where(filter: &MemoryFilter, clauses: &mut Vec<String>, args: &mut Vec<SqlValue>) {
    if let Some(project) = &filter.project {
        if project != "*" {
            clauses.push("(project = ? OR project IS NULL)".into());
            args.push(SqlValue::Text(project.clone()));
        }
    }
    if let Some(category) = filter.category {
        clauses.push("category = ?".into());
        args.push(SqlValue::Text(category.as_str().into()));
    }
    if let Some(memory_type) = filter.memory_type {
        clauses.push("type = ?".into());
        args.push(SqlValue::Text(memory_type.as_str().into()));
    }
    if !filter.include_decayed {
        clauses.push(format!("decayed_score >= {DELETION_THRESHOLD_CASE}"));
    }
}

pub fn query(conn: &Connection, filter: &MemoryFilter) -> CortexResult<Vec<Memory>> {
    let mut clauses = Vec::new();
    let mut args = Vec::new();
    build_where(filter, &mut clauses, &mut args);

    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };
    let sql = format!("SELECT {SELECT_COLUMNS} FROM memories {where_sql}");

    let mut stmt = conn.prepare(&sql).map_err(crate::pool::map_err)?;
    let rows = stmt
        .query_map(params_from_iter(args), row_to_memory)
        .map_err(crate::pool::map_err)?;
    let mut memories = Vec::new();
    for row in rows {
        let memory = row.map_err(crate::pool::map_err)?;
        if !filter.tags.is_empty() && !filter.tags.iter().any(|t| memory.tags.contains(t)) {
            continue;
        }
        memories.push(memory);
    }
    if filter.limit > 0 && memories.len() > filter.limit {
        memories.truncate(filter.limit);
    }
    Ok(memories)
}

pub fn recent(conn: &Connection, limit: usize, project: Option<&str>) -> CortexResult<Vec<Memory>> {
    let mut clauses = Vec::new();
    let mut args: Vec<SqlValue> = Vec::new();
    if let Some(p) = project {
        if p != "*" {
            clauses.push("(project = ? OR project IS NULL)".to_string());
            args.push(SqlValue::Text(p.to_string()));
        }
    }
    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };
    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM memories {where_sql} ORDER BY created_at DESC LIMIT {}",
        limit
    );
    let mut stmt = conn.prepare(&sql).map_err(crate::pool::map_err)?;
    let rows = stmt
        .query_map(params_from_iter(args), row_to_memory)
        .map_err(crate::pool::map_err)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(crate::pool::map_err)
}

pub fn high_priority(
    conn: &Connection,
    limit: usize,
    project: Option<&str>,
) -> CortexResult<Vec<Memory>> {
    let mut clauses = Vec::new();
    let mut args: Vec<SqlValue> = Vec::new();
    if let Some(p) = project {
        if p != "*" {
            clauses.push("(project = ? OR project IS NULL)".to_string());
            args.push(SqlValue::Text(p.to_string()));
        }
    }
    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };
    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM memories {where_sql} \
         ORDER BY salience DESC, decayed_score DESC LIMIT {}",
        limit
    );
    let mut stmt = conn.prepare(&sql).map_err(crate::pool::map_err)?;
    let rows = stmt
        .query_map(params_from_iter(args), row_to_memory)
        .map_err(crate::pool::map_err)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(crate::pool::map_err)
}

pub fn all(conn: &Connection, project: Option<&str>) -> CortexResult<Vec<Memory>> {
    let filter = MemoryFilter {
        project: project.map(|p| p.to_string()),
        include_decayed: true,
        ..Default::default()
    };
    query(conn, &filter)
}

pub fn stats(conn: &Connection, project: Option<&str>) -> CortexResult<Stats> {
    let memories = all(conn, project)?;
    let mut stats = Stats::default();
    stats.total = memories.len();
    let mut salience_sum = 0.0;
    for m in &memories {
        match m.memory_type {
            cortex_core::MemoryType::ShortTerm => stats.short_term += 1,
            cortex_core::MemoryType::LongTerm => stats.long_term += 1,
            cortex_core::MemoryType::Episodic => stats.episodic += 1,
        }
        *stats
            .by_category
            .entry(m.category.as_str().to_string())
            .or_insert(0) += 1;
        salience_sum += m.salience;
    }
    stats.average_salience = if stats.total > 0 {
        salience_sum / stats.total as f64
    } else {
        0.0
    };
    Ok(stats)
}

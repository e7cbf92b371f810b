//! The seams the rest of the workspace programs against: [`Embedder`] (C2)
//! and [`MemoryStore`] (C1). Every other crate — decay, graph, retrieval,
//! consolidation, session, worker — depends only on these traits plus the
//! data model, never on `cortex-storage`/`cortex-embeddings` concretes
//! directly, so they can be exercised against in-memory fakes in tests.

use std::collections::BTreeMap;

use crate::errors::CortexResult;
use crate::link::{Link, Relationship};
use crate::memory::{Category, Memory, MemoryType, NewMemory, Truncation};
use crate::session::Session;

/// Resolved defaults an `Engine` computes (category auto-detection via
/// `cortex-decay`'s salience analyzer, type from initial salience,
/// salience from `importance` override or the analyzer) before handing a
/// request to the store — the store itself stays a pure persistence
/// layer with no dependency on the salience/decay crate (spec §4.1/§9).
#[derive(Debug, Clone, Copy)]
pub struct ResolvedDefaults {
    pub category: Category,
    pub memory_type: MemoryType,
    pub salience: f64,
}

/// Deterministic text -> fixed-dim unit vector embedder (spec §4.2).
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> CortexResult<Vec<f32>>;
    fn dims(&self) -> usize;
}

/// Cosine similarity. Returns `0.0` when either vector has zero norm, and
/// `None` when the dimensions differ (spec §4.2).
pub fn cosine(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() {
        return None;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Some(0.0);
    }
    Some(dot / (norm_a * norm_b))
}

/// Filter criteria applied before ranking in `recall` (spec §4.5).
#[derive(Debug, Clone, Default)]
pub struct MemoryFilter {
    /// `None` = no project filter (`*`). `Some(None)` conceptually maps to
    /// "global only"; this store always ORs in `project IS NULL` once a
    /// project is resolved, per spec §4.5, so we model it as a single
    /// optional string: present => `(project = ? OR project IS NULL)`.
    pub project: Option<String>,
    pub category: Option<Category>,
    pub memory_type: Option<MemoryType>,
    pub tags: Vec<String>,
    pub query: Option<String>,
    pub include_decayed: bool,
    pub limit: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecallMode {
    Search,
    Recent,
    Important,
}

#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub total: usize,
    pub short_term: usize,
    pub long_term: usize,
    pub episodic: usize,
    pub by_category: BTreeMap<String, usize>,
    pub average_salience: f64,
}

/// The persistent entity/link CRUD surface (C1). Implemented by
/// `cortex-storage::SqliteStore`; the in-memory fake in `test-fixtures`
/// implements it too for fast unit tests of the layers above.
pub trait MemoryStore: Send + Sync {
    fn add(&self, input: NewMemory, resolved: ResolvedDefaults) -> CortexResult<(Memory, Truncation)>;
    fn get(&self, id: i64) -> CortexResult<Option<Memory>>;
    /// Refresh `last_accessed`, increment `access_count`, reinforce
    /// `decayed_score`, persist, and return the updated memory (spec §4.1).
    fn access(&self, id: i64) -> CortexResult<Option<Memory>>;
    fn update(&self, memory: &Memory) -> CortexResult<()>;
    fn delete(&self, id: i64) -> CortexResult<()>;

    fn query(&self, filter: &MemoryFilter) -> CortexResult<Vec<Memory>>;
    fn recent(&self, limit: usize, project: Option<&str>) -> CortexResult<Vec<Memory>>;
    fn high_priority(&self, limit: usize, project: Option<&str>) -> CortexResult<Vec<Memory>>;
    fn stats(&self, project: Option<&str>) -> CortexResult<Stats>;

    /// All memories in scope, used by the components that need the whole
    /// working set rather than a ranked/limited page (consolidation,
    /// relationship detection, contradiction sweeps).
    fn all(&self, project: Option<&str>) -> CortexResult<Vec<Memory>>;

    fn create_link(
        &self,
        source_id: i64,
        target_id: i64,
        relationship: Relationship,
        strength: f64,
    ) -> CortexResult<bool>;
    fn delete_link(&self, id: i64) -> CortexResult<()>;
    fn links_from(&self, id: i64) -> CortexResult<Vec<Link>>;
    fn links_to(&self, id: i64) -> CortexResult<Vec<Link>>;
    fn all_links(&self) -> CortexResult<Vec<Link>>;

    fn export(&self, project: Option<&str>) -> CortexResult<(Vec<Memory>, Vec<Link>)>;
    /// Import memories + links transactionally, renumbering ids on
    /// collision and re-resolving link endpoints (spec §6).
    fn import(&self, memories: Vec<Memory>, links: Vec<Link>) -> CortexResult<usize>;
}

/// Minimal session CRUD (spec §3 "Session (entity, minimal)"), kept
/// separate from [`MemoryStore`] since sessions are a thin bookkeeping
/// table with no decay/graph/ranking behavior of their own.
pub trait SessionStore: Send + Sync {
    fn start_session(&self, project: Option<&str>) -> CortexResult<Session>;
    fn end_session(&self, id: i64, summary: Option<&str>) -> CortexResult<Option<Session>>;
    fn get_session(&self, id: i64) -> CortexResult<Option<Session>>;
}

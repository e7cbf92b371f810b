//! `SqliteStore`: the concrete `MemoryStore` backed by the connection pool.

use std::path::Path;

use cortex_core::errors::CortexResult;
use cortex_core::link::{Link, Relationship};
use cortex_core::memory::{Memory, NewMemory, Truncation};
use cortex_core::session::Session;
use cortex_core::traits::{MemoryFilter, MemoryStore, ResolvedDefaults, SessionStore, Stats};

use crate::pool::ConnectionPool;
use crate::queries;

pub struct SqliteStore {
    pool: ConnectionPool,
    reinforcement_factor: f64,
    decay_rate: f64,
}

impl SqliteStore {
    pub fn open(path: &Path, reinforcement_factor: f64, decay_rate: f64) -> CortexResult<Self> {
        let pool = ConnectionPool::open(path)?;
        pool.with_writer(|conn| crate::migrations::run_migrations(conn))?;
        Ok(Self {
            pool,
            reinforcement_factor,
            decay_rate,
        })
    }

    pub fn open_in_memory(reinforcement_factor: f64, decay_rate: f64) -> CortexResult<Self> {
        let pool = ConnectionPool::open_in_memory()?;
        pool.with_writer(|conn| crate::migrations::run_migrations(conn))?;
        Ok(Self {
            pool,
            reinforcement_factor,
            decay_rate,
        })
    }
}

impl MemoryStore for SqliteStore {
    fn add(&self, input: NewMemory, resolved: ResolvedDefaults) -> CortexResult<(Memory, Truncation)> {
        self.pool
            .with_writer(|conn| queries::memory_crud::insert(conn, input.clone(), resolved))
    }

    fn get(&self, id: i64) -> CortexResult<Option<Memory>> {
        self.pool
            .with_reader(|conn| crate::convert::to_cortex_result(queries::memory_crud::get(conn, id)))
    }

    fn access(&self, id: i64) -> CortexResult<Option<Memory>> {
        self.pool
            .with_writer(|conn| queries::memory_crud::access(conn, id, self.reinforcement_factor, self.decay_rate))
    }

    fn update(&self, memory: &Memory) -> CortexResult<()> {
        self.pool.with_writer(|conn| queries::memory_crud::update(conn, memory))
    }

    fn delete(&self, id: i64) -> CortexResult<()> {
        self.pool.with_writer(|conn| queries::memory_crud::delete(conn, id))
    }

    fn query(&self, filter: &MemoryFilter) -> CortexResult<Vec<Memory>> {
        self.pool.with_reader(|conn| queries::memory_query::query(conn, filter))
    }

    fn recent(&self, limit: usize, project: Option<&str>) -> CortexResult<Vec<Memory>> {
        self.pool
            .with_reader(|conn| queries::memory_query::recent(conn, limit, project))
    }

    fn high_priority(&self, limit: usize, project: Option<&str>) -> CortexResult<Vec<Memory>> {
        self.pool
            .with_reader(|conn| queries::memory_query::high_priority(conn, limit, project))
    }

    fn stats(&self, project: Option<&str>) -> CortexResult<Stats> {
        self.pool.with_reader(|conn| queries::memory_query::stats(conn, project))
    }

    fn all(&self, project: Option<&str>) -> CortexResult<Vec<Memory>> {
        self.pool.with_reader(|conn| queries::memory_query::all(conn, project))
    }

    fn create_link(
        &self,
        source_id: i64,
        target_id: i64,
        relationship: Relationship,
        strength: f64,
    ) -> CortexResult<bool> {
        self.pool.with_writer(|conn| {
            queries::link_ops::create_link(conn, source_id, target_id, relationship, strength)
        })
    }

    fn delete_link(&self, id: i64) -> CortexResult<()> {
        self.pool.with_writer(|conn| queries::link_ops::delete_link(conn, id))
    }

    fn links_from(&self, id: i64) -> CortexResult<Vec<Link>> {
        self.pool.with_reader(|conn| queries::link_ops::links_from(conn, id))
    }

    fn links_to(&self, id: i64) -> CortexResult<Vec<Link>> {
        self.pool.with_reader(|conn| queries::link_ops::links_to(conn, id))
    }

    fn all_links(&self) -> CortexResult<Vec<Link>> {
        self.pool.with_reader(|conn| queries::link_ops::all_links(conn))
    }

    fn export(&self, project: Option<&str>) -> CortexResult<(Vec<Memory>, Vec<Link>)> {
        self.pool
            .with_reader(|conn| queries::export_import::export(conn, project))
    }

    fn import(&self, memories: Vec<Memory>, links: Vec<Link>) -> CortexResult<usize> {
        let mut guard = self
            .pool
            .writer
            .lock()
            .map_err(|_| cortex_core::errors::CortexError::StorageError("writer mutex poisoned".into()))?;
        queries::export_import::import(&mut guard, memories, links)
    }
}

impl SessionStore for SqliteStore {
    fn start_session(&self, project: Option<&str>) -> CortexResult<Session> {
        self.pool
            .with_writer(|conn| queries::session_crud::start_session(conn, project))
    }

    fn end_session(&self, id: i64, summary: Option<&str>) -> CortexResult<Option<Session>> {
        self.pool
            .with_writer(|conn| queries::session_crud::end_session(conn, id, summary))
    }

    fn get_session(&self, id: i64) -> CortexResult<Option<Session>> {
        self.pool
            .with_reader(|conn| queries::session_crud::get_session(conn, id))
    }
}

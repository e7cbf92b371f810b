//! The explicit, constructed-once facade wiring the store (C1), embedder
//! (C2), decay/salience (C3/C4), retrieval (C5), graph (C6), consolidator
//! (C7), context builder (C8), worker (C9), and project resolver (C10)
//! behind the callable surface of spec section 6.
//!
//! There is no process-wide singleton here by design: callers construct
//! one `Engine` at startup (`Engine::open` / `Engine::open_in_memory` /
//! `Engine::new`) and pass it into whatever transport binds the tool
//! names (`remember`, `recall`, ...) to its methods. See `DESIGN.md` for
//! why this departs from the teacher's `OnceLock`-backed runtime.

pub mod context;
pub mod dto;
pub mod export_import;
pub mod recall;
pub mod remember;
pub mod session;

use std::path::Path;
use std::sync::Arc;

use cortex_core::clock::{Clock, SystemClock};
use cortex_core::errors::{CortexError, CortexResult};
use cortex_core::traits::{Embedder, MemoryStore, SessionStore};
use cortex_core::CortexConfig;
use cortex_embeddings::cache::CachedEmbedder;
use cortex_embeddings::HashingEmbedder;
use cortex_observability::{DegradationTracker, HealthReport, HealthSnapshot, MetricsCollector};
use cortex_session::ProjectResolver;
use cortex_storage::SqliteStore;

const EMBEDDER_CACHE_CAPACITY: u64 = 10_000;

/// Everything a tool handler needs, constructed once per process.
pub struct Engine {
    store: Arc<dyn MemoryStore>,
    sessions: Arc<dyn SessionStore>,
    embedder: Arc<dyn Embedder>,
    config: CortexConfig,
    clock: Arc<dyn Clock>,
    projects: ProjectResolver,
    pub metrics: MetricsCollector,
    degradation: DegradationTracker,
}

impl Engine {
    /// Wire arbitrary store/embedder/clock implementations together —
    /// the seam tests use to swap in `test-fixtures::InMemoryStore`.
    pub fn new(
        store: Arc<dyn MemoryStore>,
        sessions: Arc<dyn SessionStore>,
        embedder: Arc<dyn Embedder>,
        config: CortexConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            sessions,
            embedder,
            config,
            clock,
            projects: ProjectResolver::new(),
            metrics: MetricsCollector::new(),
            degradation: DegradationTracker::new(),
        }
    }

    /// Open (or create) the on-disk store at `path` with the default
    /// hashing embedder, moka-cached (spec section 6 "on-disk layout").
    pub fn open(path: &Path, config: CortexConfig) -> CortexResult<Self> {
        let store = Arc::new(SqliteStore::open(path, config.reinforcement_factor, config.decay_rate)?);
        let mem_store: Arc<dyn MemoryStore> = store.clone();
        let session_store: Arc<dyn SessionStore> = store;
        let embedder: Arc<dyn Embedder> =
            Arc::new(CachedEmbedder::new(HashingEmbedder::new(), EMBEDDER_CACHE_CAPACITY));
        Ok(Self::new(
            mem_store,
            session_store,
            embedder,
            config,
            Arc::new(SystemClock),
        ))
    }

    /// In-memory store variant, used by tests and ephemeral sessions.
    pub fn open_in_memory(config: CortexConfig) -> CortexResult<Self> {
        let store = Arc::new(SqliteStore::open_in_memory(config.reinforcement_factor, config.decay_rate)?);
        let mem_store: Arc<dyn MemoryStore> = store.clone();
        let session_store: Arc<dyn SessionStore> = store;
        let embedder: Arc<dyn Embedder> =
            Arc::new(CachedEmbedder::new(HashingEmbedder::new(), EMBEDDER_CACHE_CAPACITY));
        Ok(Self::new(
            mem_store,
            session_store,
            embedder,
            config,
            Arc::new(SystemClock),
        ))
    }

    pub fn config(&self) -> &CortexConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn MemoryStore> {
        &self.store
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    /// `resolve(explicit)` (spec section 4.10), reading the process's
    /// current working directory for the CWD-walk fallback.
    pub fn resolve_project(&self, explicit: Option<&str>) -> CortexResult<Option<String>> {
        let cwd = std::env::current_dir().map_err(|e| CortexError::StorageError(e.to_string()))?;
        Ok(self.projects.resolve(explicit, &cwd))
    }

    pub fn set_active_project(&self, project: Option<String>) {
        self.projects.set_active_project(project);
    }

    /// Best-effort embed: truncates per `embeddingTruncateChars`, and on
    /// failure marks the degradation tracker and returns `None` rather
    /// than propagating `EMBEDDER_UNAVAILABLE` to the caller (spec
    /// section 7 — the memory is stored without an embedding, search
    /// falls back to lexical-only, and the condition is logged once).
    fn try_embed(&self, text: &str) -> Option<Vec<f32>> {
        let truncated = cortex_embeddings::truncate_for_embedding(text, self.config.embedding_truncate_chars);
        match self.embedder.embed(truncated) {
            Ok(vector) => {
                self.degradation.mark_embedder_recovered();
                Some(vector)
            }
            Err(_) => {
                self.degradation.mark_embedder_unavailable();
                None
            }
        }
    }

    /// Aggregate health snapshot (ambient stack, spec section 1 scopes the
    /// dashboard surface out but not the underlying signal).
    pub fn health(&self, project: Option<&str>) -> CortexResult<HealthReport> {
        let stats = self.store.stats(project)?;
        Ok(HealthReport::build(&HealthSnapshot {
            total: stats.total,
            short_term: stats.short_term,
            max_short_term: self.config.max_short_term_memories,
            max_long_term: self.config.max_long_term_memories,
            embedder_degraded: self.degradation.is_embedder_degraded(),
        }))
    }

    /// `consolidate(force?) -> {consolidated, decayed, deleted}` (spec
    /// section 6). `force` has no gating effect: the predictive-
    /// consolidation policy (section 4.9) only governs whether the
    /// worker's light tick *decides* to run consolidation on its own;
    /// an explicit call always runs it immediately regardless of
    /// pressure, so there is nothing left for `force` to override. See
    /// `DESIGN.md`.
    pub fn consolidate(
        &self,
        project: Option<&str>,
        _force: bool,
    ) -> CortexResult<cortex_consolidation::ConsolidationResult> {
        let resolved = self.resolve_project(project)?;
        let result = cortex_consolidation::consolidate(
            self.store.as_ref(),
            &self.config,
            self.clock.now(),
            resolved.as_deref(),
        )?;
        self.metrics.record_consolidation();
        Ok(result)
    }

    pub fn stats(&self, project: Option<&str>) -> CortexResult<dto::StatsDto> {
        let resolved = self.resolve_project(project)?;
        Ok(self.store.stats(resolved.as_deref())?.into())
    }

    /// Spawn the background worker against this engine's store/config.
    /// Owned separately from `Engine` itself (see `cortex_worker::Worker`)
    /// so a caller that never wants a background task never pays for one.
    pub fn spawn_worker(&self, project: Option<&str>) -> CortexResult<cortex_worker::Worker> {
        let resolved = self.resolve_project(project)?;
        Ok(cortex_worker::Worker::spawn(
            self.store.clone(),
            Arc::new(self.config.clone()),
            resolved,
        ))
    }
}

//! `recall` (spec section 6 / 4.5): filter, rank, reinforce.

use cortex_core::memory::{Category, Memory, MemoryType};
use cortex_core::traits::{MemoryFilter, MemoryStore, RecallMode};
use cortex_core::CortexResult;

use crate::dto::{MemoryDto, RecallResponse};
use crate::Engine;

/// Input to [`Engine::recall`]; mirrors the `recall` tool's input table
/// (spec section 6).
#[derive(Debug, Clone)]
pub struct RecallRequest {
    pub query: Option<String>,
    pub category: Option<Category>,
    pub memory_type: Option<MemoryType>,
    pub project: Option<String>,
    pub tags: Vec<String>,
    pub limit: Option<usize>,
    pub include_decayed: bool,
    pub mode: RecallMode,
}

impl Default for RecallRequest {
    fn default() -> Self {
        Self {
            query: None,
            category: None,
            memory_type: None,
            project: None,
            tags: Vec::new(),
            limit: None,
            include_decayed: false,
            mode: RecallMode::Search,
        }
    }
}

impl Engine {
    pub fn recall(&self, request: RecallRequest) -> CortexResult<RecallResponse> {
        let project = self.resolve_project(request.project.as_deref())?;
        let config = self.config();
        // `limit = 0` is a VALIDATION error (spec section 8); anything
        // else is clamped into [1, maxRecallLimit].
        if request.limit == Some(0) {
            return Err(cortex_core::errors::CortexError::Validation(
                "limit must be at least 1".into(),
            ));
        }
        let limit = request
            .limit
            .unwrap_or(config.default_recall_limit)
            .clamp(1, config.max_recall_limit);

        let memories = match request.mode {
            RecallMode::Recent => self.store().recent(limit, project.as_deref())?,
            RecallMode::Important => self.store().high_priority(limit, project.as_deref())?,
            RecallMode::Search => self.search(&request, project.as_deref(), limit)?,
        };

        // "Every returned memory is then passed through access exactly
        // once (reinforcement on recall)" (spec section 4.5).
        let mut reinforced = Vec::with_capacity(memories.len());
        for memory in &memories {
            match self.store().access(memory.id)? {
                Some(updated) => reinforced.push(updated),
                None => reinforced.push(memory.clone()),
            }
        }

        self.metrics.record_recall();
        let dtos: Vec<MemoryDto> = reinforced.iter().map(MemoryDto::from).collect();
        Ok(RecallResponse {
            count: dtos.len(),
            memories: dtos,
        })
    }

    fn search(&self, request: &RecallRequest, project: Option<&str>, limit: usize) -> CortexResult<Vec<Memory>> {
        let config = self.config();
        let query_embedding = request
            .query
            .as_deref()
            .filter(|q| !q.trim().is_empty())
            .and_then(|q| self.try_embed(q));

        let filter = MemoryFilter {
            project: project.map(str::to_string),
            category: request.category,
            memory_type: request.memory_type,
            tags: request.tags.clone(),
            query: request.query.clone(),
            include_decayed: request.include_decayed,
            // Over-fetch so ranking has a real working set to sort within;
            // the store's own filter already applies the category/type/
            // tag/project/decay constraints, so this is not an unbounded
            // scan.
            limit: config.max_recall_limit.max(limit) * 4,
        };
        let candidates = self.store().query(&filter)?;

        let ranked = cortex_retrieval::rank(
            request.query.as_deref(),
            query_embedding.as_deref(),
            candidates,
            chrono::Utc::now(),
            config,
        );
        Ok(ranked.into_iter().take(limit).map(|r| r.memory).collect())
    }
}

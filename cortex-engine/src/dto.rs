//! JSON-facing DTOs for the callable surface of spec section 6.
//!
//! `cortex_core::Memory`/`Link` stay idiomatic Rust (snake_case) for every
//! internal caller; the export/import/recall/remember tool boundary is
//! the one place that needs the spec's camelCase JSON field names
//! ("Export format... camelCase field names from section 3"), so the
//! conversion lives here rather than polluting the core data model with
//! `#[serde(rename_all)]` that nothing else wants.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use cortex_core::errors::{CortexError, CortexResult};
use cortex_core::link::{Link, Relationship};
use cortex_core::memory::{Category, Memory, MemoryType};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryDto {
    pub id: i64,
    #[serde(rename = "type")]
    pub memory_type: String,
    pub category: String,
    pub title: String,
    pub content: String,
    pub project: Option<String>,
    pub tags: Vec<String>,
    pub salience: f64,
    pub decayed_score: f64,
    pub access_count: u64,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    pub metadata: BTreeMap<String, Value>,
    pub embedding: Option<Vec<f32>>,
}

impl From<&Memory> for MemoryDto {
    fn from(m: &Memory) -> Self {
        Self {
            id: m.id,
            memory_type: m.memory_type.as_str().to_string(),
            category: m.category.as_str().to_string(),
            title: m.title.clone(),
            content: m.content.clone(),
            project: m.project.clone(),
            tags: m.tags.clone(),
            salience: m.salience,
            decayed_score: m.decayed_score,
            access_count: m.access_count,
            created_at: m.created_at,
            last_accessed: m.last_accessed,
            metadata: m.metadata.clone(),
            embedding: m.embedding.clone(),
        }
    }
}

impl TryFrom<MemoryDto> for Memory {
    type Error = CortexError;

    fn try_from(dto: MemoryDto) -> CortexResult<Self> {
        Ok(Memory {
            id: dto.id,
            memory_type: MemoryType::parse(&dto.memory_type)?,
            category: Category::parse(&dto.category)?,
            title: dto.title,
            content: dto.content,
            project: dto.project,
            tags: dto.tags,
            salience: dto.salience,
            decayed_score: dto.decayed_score,
            access_count: dto.access_count,
            created_at: dto.created_at,
            last_accessed: dto.last_accessed,
            metadata: dto.metadata,
            embedding: dto.embedding,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDto {
    pub id: i64,
    pub source_id: i64,
    pub target_id: i64,
    pub relationship: String,
    pub strength: f64,
    pub created_at: DateTime<Utc>,
}

impl From<&Link> for LinkDto {
    fn from(l: &Link) -> Self {
        Self {
            id: l.id,
            source_id: l.source_id,
            target_id: l.target_id,
            relationship: l.relationship.as_str().to_string(),
            strength: l.strength,
            created_at: l.created_at,
        }
    }
}

impl TryFrom<LinkDto> for Link {
    type Error = CortexError;

    fn try_from(dto: LinkDto) -> CortexResult<Self> {
        Ok(Link {
            id: dto.id,
            source_id: dto.source_id,
            target_id: dto.target_id,
            relationship: Relationship::parse(&dto.relationship)?,
            strength: dto.strength,
            created_at: dto.created_at,
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TruncationDto {
    pub was_truncated: bool,
    pub original_length: usize,
    pub truncated_length: usize,
}

impl From<cortex_core::memory::Truncation> for TruncationDto {
    fn from(t: cortex_core::memory::Truncation) -> Self {
        Self {
            was_truncated: t.was_truncated,
            original_length: t.original_length,
            truncated_length: t.truncated_length,
        }
    }
}

/// `remember` response (spec section 6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RememberResponse {
    pub id: i64,
    pub title: String,
    pub salience: f64,
    #[serde(rename = "type")]
    pub memory_type: String,
    pub category: String,
    pub reason: String,
    pub links_created: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated: Option<TruncationDto>,
}

/// `recall` response (spec section 6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecallResponse {
    pub memories: Vec<MemoryDto>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContextSummaryDto {
    pub recent_memories: Vec<MemoryDto>,
    pub key_decisions: Vec<MemoryDto>,
    pub active_patterns: Vec<MemoryDto>,
    pub pending_items: Vec<MemoryDto>,
}

impl From<&cortex_session::ContextSummary> for ContextSummaryDto {
    fn from(s: &cortex_session::ContextSummary) -> Self {
        Self {
            recent_memories: s.recent_memories.iter().map(MemoryDto::from).collect(),
            key_decisions: s.key_decisions.iter().map(MemoryDto::from).collect(),
            active_patterns: s.active_patterns.iter().map(MemoryDto::from).collect(),
            pending_items: s.pending_items.iter().map(MemoryDto::from).collect(),
        }
    }
}

/// `get_context` response (spec section 6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextResponse {
    pub context: String,
    pub summary: ContextSummaryDto,
    pub relevant_memories: Vec<MemoryDto>,
}

/// `stats` response (spec section 4.1/6).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StatsDto {
    pub total: usize,
    pub short_term: usize,
    pub long_term: usize,
    pub episodic: usize,
    pub by_category: BTreeMap<String, usize>,
    pub average_salience: f64,
}

impl From<cortex_core::traits::Stats> for StatsDto {
    fn from(s: cortex_core::traits::Stats) -> Self {
        Self {
            total: s.total,
            short_term: s.short_term,
            long_term: s.long_term,
            episodic: s.episodic,
            by_category: s.by_category,
            average_salience: s.average_salience,
        }
    }
}

/// `end_session` response (spec section 6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndSessionResponse {
    pub consolidation_result: cortex_consolidation::ConsolidationResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub memories: Vec<MemoryDto>,
    pub links: Vec<LinkDto>,
}

/// `export` response (spec section 6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub data: ExportData,
    pub count: usize,
}

/// `import` response (spec section 6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub imported: usize,
}

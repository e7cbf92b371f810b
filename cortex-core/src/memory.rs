//! The `Memory` entity and its supporting enums (spec §3).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{CortexError, CortexResult};

/// Maximum content size on disk: 10 KiB.
pub const MAX_CONTENT_BYTES: usize = 10 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryType {
    ShortTerm,
    LongTerm,
    Episodic,
}

impl MemoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShortTerm => "short_term",
            Self::LongTerm => "long_term",
            Self::Episodic => "episodic",
        }
    }

    pub fn parse(s: &str) -> CortexResult<Self> {
        match s {
            "short_term" => Ok(Self::ShortTerm),
            "long_term" => Ok(Self::LongTerm),
            "episodic" => Ok(Self::Episodic),
            other => Err(CortexError::Validation(format!("unknown memory type: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Architecture,
    Pattern,
    Preference,
    Error,
    Context,
    Learning,
    Todo,
    Note,
    Relationship,
    Custom,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Architecture => "architecture",
            Self::Pattern => "pattern",
            Self::Preference => "preference",
            Self::Error => "error",
            Self::Context => "context",
            Self::Learning => "learning",
            Self::Todo => "todo",
            Self::Note => "note",
            Self::Relationship => "relationship",
            Self::Custom => "custom",
        }
    }

    pub fn parse(s: &str) -> CortexResult<Self> {
        match s {
            "architecture" => Ok(Self::Architecture),
            "pattern" => Ok(Self::Pattern),
            "preference" => Ok(Self::Preference),
            "error" => Ok(Self::Error),
            "context" => Ok(Self::Context),
            "learning" => Ok(Self::Learning),
            "todo" => Ok(Self::Todo),
            "note" => Ok(Self::Note),
            "relationship" => Ok(Self::Relationship),
            "custom" => Ok(Self::Custom),
            other => Err(CortexError::Validation(format!("unknown category: {other}"))),
        }
    }

    /// Per-category deletion threshold (spec §4.7 step 4).
    pub fn deletion_threshold(&self) -> f64 {
        match self {
            Self::Architecture => 0.15,
            Self::Error => 0.15,
            Self::Pattern => 0.18,
            Self::Preference => 0.20,
            Self::Learning => 0.20,
            Self::Relationship => 0.20,
            Self::Context => 0.22,
            Self::Custom => 0.22,
            Self::Note => 0.25,
            Self::Todo => 0.25,
        }
    }
}

/// `importance` input on `remember`; overrides the derived salience with a
/// fixed value (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Low,
    Normal,
    High,
    Critical,
}

impl Importance {
    pub fn salience(&self) -> f64 {
        match self {
            Self::Low => 0.3,
            Self::Normal => 0.5,
            Self::High => 0.8,
            Self::Critical => 1.0,
        }
    }

    pub fn parse(s: &str) -> CortexResult<Self> {
        match s {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(CortexError::Validation(format!("unknown importance: {other}"))),
        }
    }
}

/// Informational result of the content-truncation step on insert.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Truncation {
    pub was_truncated: bool,
    pub original_length: usize,
    pub truncated_length: usize,
}

/// The caller-supplied shape of a new memory, before the store assigns
/// defaults, truncates content, and embeds it.
#[derive(Debug, Clone)]
pub struct NewMemory {
    pub title: String,
    pub content: String,
    pub category: Option<Category>,
    pub memory_type: Option<MemoryType>,
    pub project: Option<String>,
    pub tags: Vec<String>,
    pub importance: Option<Importance>,
    pub metadata: BTreeMap<String, Value>,
    /// Precomputed by the caller (the `Engine`, via the pluggable
    /// `Embedder`) before the memory reaches the store — see
    /// `SPEC_FULL.md` §2 for why embedding is not computed inside the
    /// storage crate itself.
    pub embedding: Option<Vec<f32>>,
}

impl NewMemory {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category: None,
            memory_type: None,
            project: None,
            tags: Vec::new(),
            importance: None,
            metadata: BTreeMap::new(),
            embedding: None,
        }
    }

    /// Validate the non-derived fields. Category/type validity is checked
    /// by the enum parse step upstream of this; this only covers what the
    /// store itself is responsible for per spec §4.1.
    pub fn validate(&self) -> CortexResult<()> {
        if self.title.trim().is_empty() {
            return Err(CortexError::Validation("title must not be empty".into()));
        }
        if let Some(project) = &self.project {
            if project != "*"
                && !project
                    .chars()
                    .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '/'))
            {
                return Err(CortexError::Validation(format!(
                    "invalid project tag: {project}"
                )));
            }
        }
        Ok(())
    }

    /// Truncate `content` to at most [`MAX_CONTENT_BYTES`], returning the
    /// truncation report (spec §3, §8 boundary behavior).
    pub fn truncate_content(&mut self) -> Truncation {
        let original_length = self.content.len();
        if original_length <= MAX_CONTENT_BYTES {
            return Truncation {
                was_truncated: false,
                original_length,
                truncated_length: original_length,
            };
        }
        let mut end = MAX_CONTENT_BYTES;
        while !self.content.is_char_boundary(end) {
            end -= 1;
        }
        self.content.truncate(end);
        Truncation {
            was_truncated: true,
            original_length,
            truncated_length: self.content.len(),
        }
    }
}

/// The universal memory entity (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    pub id: i64,
    pub memory_type: MemoryType,
    pub category: Category,
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

impl Memory {
    /// Enforce the structural invariants from spec §3/§8 that every
    /// mutation path must preserve.
    pub fn check_invariants(&self) -> CortexResult<()> {
        if !(0.0..=1.0).contains(&self.salience) {
            return Err(CortexError::Validation(format!(
                "salience out of range: {}",
                self.salience
            )));
        }
        if !(0.0..=1.0).contains(&self.decayed_score) {
            return Err(CortexError::Validation(format!(
                "decayed_score out of range: {}",
                self.decayed_score
            )));
        }
        if self.last_accessed < self.created_at {
            return Err(CortexError::Validation(
                "last_accessed precedes created_at".into(),
            ));
        }
        Ok(())
    }
}

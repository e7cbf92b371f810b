//! Runtime configuration. A single `CortexConfig` is constructed once at
//! startup and threaded into every component (spec §4.9 "explicit `Engine`
//! value... no hidden global mutation"). Defaults match the values named
//! throughout spec §4.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CortexConfig {
    /// Directory holding `memories.db` and `logs/`. Default `$HOME/.claude-cortex`.
    pub data_dir: Option<String>,

    // --- Decay (C4) ---
    /// Multiplicative decay per hour since last access.
    pub decay_rate: f64,
    /// Multiplier applied to `decayed_score` on `access`, clamped to 1.0.
    pub reinforcement_factor: f64,

    // --- Consolidation (C7) ---
    pub consolidation_threshold: f64,
    pub salience_threshold: f64,
    pub max_short_term_memories: usize,
    pub max_long_term_memories: usize,

    // --- Recall ranking (C5) ---
    pub semantic_weight: f64,
    pub lexical_weight: f64,
    pub recency_weight: f64,
    pub default_recall_limit: usize,
    pub max_recall_limit: usize,
    pub embedding_truncate_chars: usize,

    // --- Graph (C6) ---
    pub relationship_similarity_threshold: f64,
    pub refines_similarity_threshold: f64,
    pub relationship_top_k: usize,
    pub hub_min_links: usize,
    pub hub_bonus_cap: f64,
    pub hub_bonus_coeff: f64,
    pub contradiction_penalty: f64,
    pub contradiction_salience_floor: f64,

    // --- Worker (C9) ---
    pub light_tick_interval_secs: u64,
    pub light_tick_initial_delay_secs: u64,
    pub medium_tick_interval_secs: u64,
    pub max_links_per_cycle: usize,
    pub contradiction_scan_limit: usize,
    pub contradiction_min_score: f64,

    // --- Storage (C1) ---
    pub max_content_bytes: usize,
    pub busy_timeout_ms: u64,
}

impl Default for CortexConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            decay_rate: 0.995,
            reinforcement_factor: 1.2,
            consolidation_threshold: 0.6,
            salience_threshold: 0.2,
            max_short_term_memories: 100,
            max_long_term_memories: 1000,
            semantic_weight: 0.6,
            lexical_weight: 0.3,
            recency_weight: 0.1,
            default_recall_limit: 10,
            max_recall_limit: 50,
            embedding_truncate_chars: 2000,
            relationship_similarity_threshold: 0.55,
            refines_similarity_threshold: 0.85,
            relationship_top_k: 10,
            hub_min_links: 2,
            hub_bonus_cap: 0.1,
            hub_bonus_coeff: 0.03,
            contradiction_penalty: 0.02,
            contradiction_salience_floor: 0.3,
            light_tick_interval_secs: 300,
            light_tick_initial_delay_secs: 10,
            medium_tick_interval_secs: 1800,
            max_links_per_cycle: 20,
            contradiction_scan_limit: 50,
            contradiction_min_score: 0.5,
            max_content_bytes: crate::memory::MAX_CONTENT_BYTES,
            busy_timeout_ms: 5_000,
        }
    }
}

impl CortexConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load from a TOML file on disk, falling back to [`Default`] if the
    /// file does not exist (spec §4.9 "explicit `Engine` value constructed
    /// once at startup" — config loading is best-effort, never fatal).
    pub fn from_file(path: &std::path::Path) -> crate::errors::CortexResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents)
                .map_err(|e| crate::errors::CortexError::StorageError(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(crate::errors::CortexError::StorageError(e.to_string())),
        }
    }
}

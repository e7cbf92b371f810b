//! `relevance = 0.6*semantic + 0.3*lexical + 0.1*recency_boost` (spec §4.5).
//!
//! Resolves the spec's open question on empty queries: an absent/empty
//! `query` skips semantic and lexical scoring entirely and ranks purely by
//! `recency_boost` (the live decayed score).

use chrono::{DateTime, Utc};

use cortex_core::memory::Memory;
use cortex_core::traits::cosine;
use cortex_core::CortexConfig;

#[derive(Debug, Clone)]
pub struct RankedMemory {
    pub memory: Memory,
    pub relevance: f64,
}

fn hours_since(last_accessed: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - last_accessed).num_seconds().max(0) as f64 / 3600.0
}

/// Rank `memories` against `query`/`query_embedding`. `now` drives the
/// live decay recomputation for the recency term (spec §4.4 "decay is
/// lazy"). Returns memories sorted by non-increasing relevance.
pub fn rank(
    query: Option<&str>,
    query_embedding: Option<&[f32]>,
    memories: Vec<Memory>,
    now: DateTime<Utc>,
    config: &CortexConfig,
) -> Vec<RankedMemory> {
    let query_is_empty = query.map(|q| q.trim().is_empty()).unwrap_or(true);

    let mut ranked: Vec<RankedMemory> = memories
        .into_iter()
        .map(|memory| {
            let hours = hours_since(memory.last_accessed, now);
            let recency_boost = cortex_decay::decayed(
                memory.salience,
                hours,
                memory.access_count,
                config.decay_rate,
            );

            let relevance = if query_is_empty {
                recency_boost
            } else {
                let semantic = match (query_embedding, &memory.embedding) {
                    (Some(q), Some(m)) => cosine(q, m).unwrap_or(0.0),
                    _ => 0.0,
                };
                let lexical = crate::lexical::jaccard_overlap(
                    query.unwrap_or(""),
                    &memory.title,
                    &memory.content,
                );
                config.semantic_weight * semantic
                    + config.lexical_weight * lexical
                    + config.recency_weight * recency_boost
            };

            RankedMemory { memory, relevance }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.relevance
            .partial_cmp(&a.relevance)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.memory.id.cmp(&b.memory.id))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use cortex_core::{Category, MemoryType};
    use std::collections::BTreeMap;

    fn memory(id: i64, title: &str, content: &str, salience: f64, now: DateTime<Utc>) -> Memory {
        Memory {
            id,
            memory_type: MemoryType::ShortTerm,
            category: Category::Note,
            title: title.to_string(),
            content: content.to_string(),
            project: None,
            tags: Vec::new(),
            salience,
            decayed_score: salience,
            access_count: 0,
            created_at: now,
            last_accessed: now,
            metadata: BTreeMap::new(),
            embedding: None,
        }
    }

    #[test]
    fn empty_query_ranks_by_recency_boost_only() {
        let now = Utc::now();
        let config = CortexConfig::default();
        let fresh = memory(1, "a", "a", 0.9, now);
        let stale = memory(2, "b", "b", 0.9, now - Duration::hours(1000));
        let ranked = rank(None, None, vec![stale, fresh], now, &config);
        assert_eq!(ranked[0].memory.id, 1);
    }

    #[test]
    fn results_sorted_non_increasing() {
        let now = Utc::now();
        let config = CortexConfig::default();
        let a = memory(1, "rest api design", "use rest", 0.5, now);
        let b = memory(2, "unrelated", "nothing matches", 0.5, now);
        let ranked = rank(Some("rest api"), None, vec![b, a], now, &config);
        for w in ranked.windows(2) {
            assert!(w[0].relevance >= w[1].relevance);
        }
    }
}

//! Hub-salience feedback and contradiction penalization (spec §4.6),
//! plus the dedicated contradiction-pair scan used by the worker's
//! medium tick.

use cortex_core::errors::CortexResult;
use cortex_core::traits::{cosine, MemoryStore};
use cortex_core::{CortexConfig, Relationship};

use crate::detect::Candidate;

/// For every memory whose link degree (outgoing + incoming) is >=
/// `config.hub_min_links`, bump `salience` by
/// `min(hubBonusCap, hubBonusCoeff * log2(linkCount))`, clamped to 1.0.
/// Returns the number of memories touched.
pub fn apply_hub_bonus(store: &dyn MemoryStore, config: &CortexConfig, project: Option<&str>) -> CortexResult<usize> {
    let memories = store.all(project)?;
    let mut touched = 0;
    for mut memory in memories {
        let out_degree = store.links_from(memory.id)?.len();
        let in_degree = store.links_to(memory.id)?.len();
        let link_count = out_degree + in_degree;
        if link_count < config.hub_min_links {
            continue;
        }
        let bonus = (config.hub_bonus_coeff * (link_count as f64).log2()).min(config.hub_bonus_cap);
        let new_salience = (memory.salience + bonus).min(1.0);
        if new_salience > memory.salience {
            memory.salience = new_salience;
            store.update(&memory)?;
            touched += 1;
        }
    }
    Ok(touched)
}

/// For every `contradicts` link whose endpoints both have `salience >
/// contradictionSalienceFloor`, subtract `contradictionPenalty` from
/// both, clamped to 0. Single pass: a memory touched by two contradicting
/// links is penalized twice, once per link row. Returns the number of
/// memories touched (counting duplicates).
pub fn apply_contradiction_penalty(store: &dyn MemoryStore, config: &CortexConfig) -> CortexResult<usize> {
    let links: Vec<_> = store
        .all_links()?
        .into_iter()
        .filter(|l| l.relationship == Relationship::Contradicts)
        .collect();

    let mut touched = 0;
    for link in links {
        for id in [link.source_id, link.target_id] {
            let Some(mut memory) = store.get(id)? else {
                continue;
            };
            if memory.salience > config.contradiction_salience_floor {
                memory.salience = (memory.salience - config.contradiction_penalty).max(0.0);
                store.update(&memory)?;
                touched += 1;
            }
        }
    }
    Ok(touched)
}

/// Find candidate contradiction pairs among `candidates` (already capped
/// to `scanLimit` by the caller), requiring `similarity >= minScore`.
/// Used by the worker's medium tick (spec §4.9) before calling
/// `create_link(.., Relationship::Contradicts, similarity)`.
pub fn contradiction_pairs(candidates: &[Candidate], min_similarity: f64) -> Vec<(i64, i64, f64)> {
    let mut pairs = Vec::new();
    for i in 0..candidates.len() {
        for j in (i + 1)..candidates.len() {
            let a = &candidates[i];
            let b = &candidates[j];
            let (Some(ea), Some(eb)) = (&a.embedding, &b.embedding) else {
                continue;
            };
            let Some(sim) = cosine(ea, eb) else { continue };
            if sim < min_similarity {
                continue;
            }
            let a_text = format!("{} {}", a.title, a.content);
            let b_text = format!("{} {}", b.title, b.content);
            if crate::negation::opposes(&a_text, &b_text) {
                pairs.push((a.id, b.id, sim));
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: i64, title: &str, content: &str, emb: Vec<f32>) -> Candidate {
        Candidate {
            id,
            title: title.to_string(),
            content: content.to_string(),
            category: cortex_core::memory::Category::Pattern,
            tags: Vec::new(),
            embedding: Some(emb),
        }
    }

    #[test]
    fn finds_opposing_pair_above_threshold() {
        let a = candidate(1, "a", "Always use REST", vec![1.0, 0.0]);
        let b = candidate(2, "b", "Never use REST, it doesn't scale", vec![0.95, 0.1]);
        let pairs = contradiction_pairs(&[a, b], 0.5);
        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].0, pairs[0].1), (1, 2));
    }

    #[test]
    fn skips_pairs_below_threshold() {
        let a = candidate(1, "a", "Always use REST", vec![1.0, 0.0]);
        let b = candidate(2, "b", "Never use REST", vec![0.0, 1.0]);
        let pairs = contradiction_pairs(&[a, b], 0.5);
        assert!(pairs.is_empty());
    }
}

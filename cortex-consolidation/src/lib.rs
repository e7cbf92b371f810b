//! C7: promote short-term memories into long-term, delete low-value
//! items, enforce tier caps, and apply the hub-salience feedback pass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cortex_core::errors::CortexResult;
use cortex_core::memory::MemoryType;
use cortex_core::traits::MemoryStore;
use cortex_core::CortexConfig;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidationResult {
    pub consolidated: usize,
    pub decayed: usize,
    pub deleted: usize,
}

fn hours_since(last_accessed: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - last_accessed).num_seconds().max(0) as f64 / 3600.0
}

/// `consolidate() -> {consolidated, decayed, deleted}` (spec §4.7).
///
/// Steps 1-5 run against `store` directly; step 6 (hub bonus) delegates to
/// [`cortex_graph::apply_hub_bonus`]. Each individual store call is atomic;
/// see `DESIGN.md` for the note on cross-call atomicity.
pub fn consolidate(
    store: &dyn MemoryStore,
    config: &CortexConfig,
    now: DateTime<Utc>,
    project: Option<&str>,
) -> CortexResult<ConsolidationResult> {
    let mut result = ConsolidationResult::default();

    // 1. Refresh decayed_score for every memory in scope.
    let mut memories = store.all(project)?;
    for memory in memories.iter_mut() {
        let hours = hours_since(memory.last_accessed, now);
        memory.decayed_score = cortex_decay::decayed(
            memory.salience,
            hours,
            memory.access_count,
            config.decay_rate,
        );
        store.update(memory)?;
    }

    // 2. Promote: short_term with decayed_score >= consolidationThreshold.
    for memory in memories.iter_mut() {
        if memory.memory_type == MemoryType::ShortTerm
            && memory.decayed_score >= config.consolidation_threshold
        {
            memory.memory_type = MemoryType::LongTerm;
            store.update(memory)?;
            result.consolidated += 1;
        }
    }

    // 3/4. Decay-count and delete, per category deletion threshold.
    let mut to_delete = Vec::new();
    for memory in &memories {
        let threshold = memory.category.deletion_threshold();
        if memory.decayed_score < threshold {
            to_delete.push(memory.id);
        } else if memory.decayed_score < config.salience_threshold {
            result.decayed += 1;
        }
    }
    for id in &to_delete {
        store.delete(*id)?;
    }
    result.deleted += to_delete.len();
    let deleted_set: std::collections::HashSet<i64> = to_delete.into_iter().collect();
    memories.retain(|m| !deleted_set.contains(&m.id));

    // 5. Enforce tier caps by pruning the lowest-scoring rows over cap.
    result.deleted += enforce_cap(
        store,
        &mut memories,
        MemoryType::ShortTerm,
        config.max_short_term_memories,
    )?;
    result.deleted += enforce_cap(
        store,
        &mut memories,
        MemoryType::LongTerm,
        config.max_long_term_memories,
    )?;

    // 6. Hub-salience pass.
    cortex_graph::apply_hub_bonus(store, config, project)?;

    Ok(result)
}

fn enforce_cap(
    store: &dyn MemoryStore,
    memories: &mut Vec<cortex_core::memory::Memory>,
    tier: MemoryType,
    cap: usize,
) -> CortexResult<usize> {
    let mut tier_rows: Vec<_> = memories.iter().filter(|m| m.memory_type == tier).collect();
    if tier_rows.len() <= cap {
        return Ok(0);
    }
    tier_rows.sort_by(|a, b| {
        a.decayed_score
            .partial_cmp(&b.decayed_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let excess = tier_rows.len() - cap;
    let prune_ids: Vec<i64> = tier_rows.iter().take(excess).map(|m| m.id).collect();
    for id in &prune_ids {
        store.delete(*id)?;
    }
    let prune_set: std::collections::HashSet<i64> = prune_ids.iter().copied().collect();
    memories.retain(|m| !prune_set.contains(&m.id));
    Ok(prune_ids.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::memory::{Category, NewMemory};
    use cortex_core::traits::ResolvedDefaults;
    use test_fixtures::InMemoryStore;

    fn add(store: &InMemoryStore, title: &str, category: Category, mtype: MemoryType, salience: f64) -> i64 {
        let (m, _) = store
            .add(
                NewMemory::new(title, "content"),
                ResolvedDefaults {
                    category,
                    memory_type: mtype,
                    salience,
                },
            )
            .unwrap();
        m.id
    }

    #[test]
    fn promotes_short_term_above_threshold() {
        let store = InMemoryStore::new();
        let id = add(&store, "a", Category::Architecture, MemoryType::ShortTerm, 0.9);
        let config = CortexConfig::default();
        let now = Utc::now();
        consolidate(&store, &config, now, None).unwrap();
        let memory = store.get(id).unwrap().unwrap();
        assert_eq!(memory.memory_type, MemoryType::LongTerm);
    }

    #[test]
    fn deletes_below_category_threshold() {
        let store = InMemoryStore::new();
        let id = add(&store, "a", Category::Architecture, MemoryType::ShortTerm, 0.01);
        let config = CortexConfig::default();
        let result = consolidate(&store, &config, Utc::now(), None).unwrap();
        assert_eq!(result.deleted, 1);
        assert!(store.get(id).unwrap().is_none());
    }

    #[test]
    fn enforces_short_term_cap() {
        let store = InMemoryStore::new();
        let mut config = CortexConfig::default();
        config.max_short_term_memories = 2;
        for i in 0..5 {
            add(
                &store,
                &format!("m{i}"),
                Category::Note,
                MemoryType::ShortTerm,
                0.5 + (i as f64) * 0.01,
            );
        }
        let result = consolidate(&store, &config, Utc::now(), None).unwrap();
        assert_eq!(result.deleted, 3);
        let remaining = store.all(None).unwrap();
        assert_eq!(remaining.iter().filter(|m| m.memory_type == MemoryType::ShortTerm).count(), 2);
    }
}

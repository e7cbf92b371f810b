//! Light and medium tick bodies (spec §4.9). These are plain functions,
//! not tasks — [`crate::scheduler`] is what wraps them in timers.

use chrono::{DateTime, Duration, Utc};

use cortex_core::errors::CortexResult;
use cortex_core::link::Relationship;
use cortex_core::memory::{Category, Memory, MemoryType};
use cortex_core::traits::MemoryStore;
use cortex_core::CortexConfig;
use cortex_consolidation::ConsolidationResult;
use cortex_graph::Candidate;

use crate::activation_cache::ActivationCache;
use crate::predictive::{should_trigger_predictive_consolidation, PressureStats};

fn to_candidate(m: &Memory) -> Candidate {
    Candidate {
        id: m.id,
        title: m.title.clone(),
        content: m.content.clone(),
        category: m.category,
        tags: m.tags.clone(),
        embedding: m.embedding.clone(),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LightTickReport {
    pub cache_entries_pruned: usize,
    pub predictive_consolidation: Option<ConsolidationResult>,
}

/// Prune expired activation-cache entries; compute pressure; run C7 if
/// `shouldTriggerPredictiveConsolidation` says so.
pub fn light_tick(
    store: &dyn MemoryStore,
    cache: &ActivationCache,
    config: &CortexConfig,
    now: DateTime<Utc>,
    project: Option<&str>,
) -> CortexResult<LightTickReport> {
    let cache_entries_pruned = cache.prune(now);

    let all = store.all(project)?;
    let short_term: Vec<&Memory> = all.iter().filter(|m| m.memory_type == MemoryType::ShortTerm).collect();
    let stats = PressureStats {
        short_term: short_term.len(),
        total: all.len(),
        recent_creates: short_term
            .iter()
            .filter(|m| now - m.created_at <= Duration::minutes(30))
            .count(),
        stm_low_decay: short_term.iter().filter(|m| m.decayed_score < 0.25).count(),
    };

    let decision = should_trigger_predictive_consolidation(stats, config);
    let predictive_consolidation = if decision.should_run {
        tracing::info!(urgency = ?decision.urgency, "predictive consolidation triggered");
        Some(cortex_consolidation::consolidate(store, config, now, project)?)
    } else {
        None
    };

    Ok(LightTickReport {
        cache_entries_pruned,
        predictive_consolidation,
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MediumTickReport {
    pub links_created: usize,
    pub contradictions_linked: usize,
    pub memories_penalized: usize,
    pub hub_bonus_applied: usize,
}

/// Discover relationships for unlinked memories, scan for contradictions,
/// apply the contradiction penalty, then run the hub-salience pass (spec
/// §4.6 "applied by the worker's medium tick via a salience-evolution
/// pass").
pub fn medium_tick(
    store: &dyn MemoryStore,
    config: &CortexConfig,
    project: Option<&str>,
) -> CortexResult<MediumTickReport> {
    let all = store.all(project)?;
    let candidates: Vec<Candidate> = all.iter().map(to_candidate).collect();

    let mut unlinked = Vec::new();
    for memory in &all {
        if store.links_from(memory.id)?.is_empty() {
            unlinked.push(memory.clone());
        }
    }
    unlinked.sort_by(|a, b| {
        b.salience
            .partial_cmp(&a.salience)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.last_accessed.cmp(&a.last_accessed))
    });
    unlinked.truncate(config.max_links_per_cycle);

    let mut links_created = 0;
    for memory in &unlinked {
        let source = to_candidate(memory);
        let relationships = cortex_graph::detect_relationships(
            &source,
            &candidates,
            3,
            config.relationship_similarity_threshold,
            config.refines_similarity_threshold,
        );
        for (target_id, relationship, strength) in relationships {
            if store.create_link(memory.id, target_id, relationship, strength)? {
                links_created += 1;
            }
        }
    }

    let scan_candidates: Vec<Candidate> = candidates
        .iter()
        .take(config.contradiction_scan_limit)
        .cloned()
        .collect();
    let pairs = cortex_graph::contradiction_pairs(&scan_candidates, config.contradiction_min_score);
    let mut contradictions_linked = 0;
    for (source_id, target_id, strength) in pairs {
        if store.create_link(source_id, target_id, Relationship::Contradicts, strength)? {
            contradictions_linked += 1;
        }
    }

    let memories_penalized = cortex_graph::apply_contradiction_penalty(store, config)?;

    // Run last so link counts (including the ones just created above)
    // are current before computing hub bonuses.
    let hub_bonus_applied = cortex_graph::apply_hub_bonus(store, config, project)?;

    Ok(MediumTickReport {
        links_created,
        contradictions_linked,
        memories_penalized,
        hub_bonus_applied,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::memory::NewMemory;
    use cortex_core::traits::ResolvedDefaults;
    use test_fixtures::InMemoryStore;

    fn add(store: &InMemoryStore, title: &str, salience: f64, mtype: MemoryType) -> Memory {
        let (m, _) = store
            .add(
                NewMemory::new(title, "content"),
                ResolvedDefaults {
                    category: Category::Note,
                    memory_type: mtype,
                    salience,
                },
            )
            .unwrap();
        m
    }

    #[test]
    fn light_tick_prunes_cache_and_reports_no_trigger_when_under_pressure() {
        let store = InMemoryStore::new();
        add(&store, "a", 0.5, MemoryType::ShortTerm);
        let cache = ActivationCache::new();
        let config = CortexConfig::default();
        let report = light_tick(&store, &cache, &config, Utc::now(), None).unwrap();
        assert!(report.predictive_consolidation.is_none());
    }

    #[test]
    fn medium_tick_applies_hub_bonus_to_a_five_link_hub() {
        let store = InMemoryStore::new();
        let h = add(&store, "hub memory", 0.5, MemoryType::LongTerm);
        for i in 0..5 {
            let spoke = add(&store, &format!("spoke {i}"), 0.4, MemoryType::LongTerm);
            store
                .create_link(h.id, spoke.id, Relationship::Related, 0.9)
                .unwrap();
        }

        let config = CortexConfig::default();
        let report = medium_tick(&store, &config, None).unwrap();
        assert_eq!(report.hub_bonus_applied, 1);

        let updated = store.get(h.id).unwrap().unwrap();
        assert!((updated.salience - 0.5697).abs() < 1e-3, "got {}", updated.salience);
        assert!(updated.salience > 0.5);
    }

    #[test]
    fn medium_tick_links_unlinked_memories() {
        let store = InMemoryStore::new();
        let a = add(&store, "use REST consistently", 0.8, MemoryType::LongTerm);
        let b = add(&store, "use REST for APIs", 0.7, MemoryType::LongTerm);
        // give both embeddings close enough to clear the similarity threshold
        let mut ma = store.get(a.id).unwrap().unwrap();
        ma.embedding = Some(vec![1.0, 0.0, 0.0]);
        store.update(&ma).unwrap();
        let mut mb = store.get(b.id).unwrap().unwrap();
        mb.embedding = Some(vec![0.95, 0.05, 0.0]);
        store.update(&mb).unwrap();

        let config = CortexConfig::default();
        let report = medium_tick(&store, &config, None).unwrap();
        assert!(report.links_created > 0);
    }
}

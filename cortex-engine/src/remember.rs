//! `remember` (spec section 6): derive defaults, truncate, embed,
//! persist, then auto-link against the existing working set.

use cortex_core::memory::{Category, NewMemory};
use cortex_core::traits::{MemoryStore, ResolvedDefaults};
use cortex_core::CortexResult;
use cortex_decay::salience::{self, SalienceFactors};
use cortex_graph::Candidate;

use crate::dto::{RememberResponse, TruncationDto};
use crate::Engine;

/// "category from `note` unless auto-detected" (spec section 4.1) — the
/// first matching cue wins, architecture first since an architectural
/// decision is also very often phrased as a preference or a pattern.
fn auto_category(factors: &SalienceFactors) -> Category {
    if factors.is_architecture_decision {
        Category::Architecture
    } else if factors.is_error_resolution {
        Category::Error
    } else if factors.is_code_pattern {
        Category::Pattern
    } else if factors.is_user_preference {
        Category::Preference
    } else {
        Category::Note
    }
}

fn to_candidate(m: &cortex_core::memory::Memory) -> Candidate {
    Candidate {
        id: m.id,
        title: m.title.clone(),
        content: m.content.clone(),
        category: m.category,
        tags: m.tags.clone(),
        embedding: m.embedding.clone(),
    }
}

impl Engine {
    pub fn remember(&self, mut input: NewMemory) -> CortexResult<RememberResponse> {
        input.validate()?;
        let truncation = input.truncate_content();

        let factors = salience::analyze(&input.title, &input.content);
        let reason = salience::explain(&factors);
        let derived_salience = salience::calculate(&factors);

        let category = input.category.unwrap_or_else(|| auto_category(&factors));
        let salience = input
            .importance
            .map(|i| i.salience())
            .unwrap_or(derived_salience);
        // "type from initial salience" (spec section 4.1): a memory
        // salient enough to be promoted on its own merits at the next
        // consolidation pass is stored directly as long-term.
        let memory_type = input
            .memory_type
            .unwrap_or(if salience >= self.config().consolidation_threshold {
                cortex_core::memory::MemoryType::LongTerm
            } else {
                cortex_core::memory::MemoryType::ShortTerm
            });

        let embed_text = format!("{} {}", input.title, input.content);
        input.embedding = self.try_embed(&embed_text);
        input.project = self.resolve_project(input.project.as_deref())?;

        let resolved = ResolvedDefaults {
            category,
            memory_type,
            salience,
        };
        // `add` truncates again internally (spec section 4.1 makes the
        // store itself responsible for that invariant), but that second
        // pass is a no-op once content is already within bounds — the
        // truncation report callers see is the one computed here, against
        // the original un-truncated length.
        let (memory, _) = self.store().add(input, resolved)?;

        let links_created = self.auto_link(&memory)?;
        self.metrics.record_remember();
        self.metrics.record_links_created(links_created as u64);

        Ok(RememberResponse {
            id: memory.id,
            title: memory.title,
            salience: memory.salience,
            memory_type: memory.memory_type.as_str().to_string(),
            category: memory.category.as_str().to_string(),
            reason,
            links_created,
            truncated: truncation.was_truncated.then(|| TruncationDto::from(truncation)),
        })
    }

    /// Immediately run relationship detection for a freshly-stored
    /// memory against the rest of the project's working set — the
    /// worker's medium tick (section 4.9) re-runs this later for
    /// memories it missed, but `remember`'s `linksCreated` field (section
    /// 6) requires this to happen synchronously on insert.
    fn auto_link(&self, memory: &cortex_core::memory::Memory) -> CortexResult<usize> {
        if memory.embedding.is_none() {
            return Ok(0);
        }
        let config = self.config();
        let all = self.store().all(memory.project.as_deref())?;
        let candidates: Vec<Candidate> = all.iter().map(to_candidate).collect();
        let source = to_candidate(memory);

        let relationships = cortex_graph::detect_relationships(
            &source,
            &candidates,
            config.relationship_top_k,
            config.relationship_similarity_threshold,
            config.refines_similarity_threshold,
        );

        let mut created = 0;
        for (target_id, relationship, strength) in relationships {
            if self.store().create_link(memory.id, target_id, relationship, strength)? {
                created += 1;
            }
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::CortexConfig;

    fn engine() -> Engine {
        Engine::open_in_memory(CortexConfig::default()).unwrap()
    }

    #[test]
    fn remembers_and_returns_reason() {
        let engine = engine();
        let response = engine
            .remember(NewMemory::new("remember that we use REST", "architecture decision"))
            .unwrap();
        assert!(response.id > 0);
        assert!(!response.reason.is_empty());
    }

    #[test]
    fn high_salience_importance_stores_as_long_term() {
        let engine = engine();
        let mut input = NewMemory::new("note", "nothing special");
        input.importance = Some(cortex_core::memory::Importance::Critical);
        let response = engine.remember(input).unwrap();
        assert_eq!(response.memory_type, "long_term");
    }

    #[test]
    fn second_similar_memory_links_to_the_first() {
        let engine = engine();
        engine
            .remember(NewMemory::new("use REST for APIs", "we always use REST for our HTTP APIs"))
            .unwrap();
        let response = engine
            .remember(NewMemory::new(
                "use REST consistently",
                "we always use REST for our HTTP APIs across services",
            ))
            .unwrap();
        assert!(response.links_created > 0);
    }
}

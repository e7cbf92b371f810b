//! `detectRelationships(m, k)` (spec §4.6): top-K cosine neighbors,
//! classified by a fixed priority of rules.

use cortex_core::memory::Category;
use cortex_core::traits::cosine;
use cortex_core::Relationship;

/// The slice of a memory's fields [`detect_relationships`] needs. Kept
/// separate from `cortex_core::Memory` so callers can pass borrowed views
/// without cloning whole rows, and so tests don't need a full `Memory`.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: Category,
    pub tags: Vec<String>,
    pub embedding: Option<Vec<f32>>,
}

/// Classify the relationship between `source` and `candidate`, given their
/// precomputed cosine similarity (spec §4.6, first-match-wins):
///
/// 1. negation/opposition of key terms -> `contradicts`
/// 2. same category and `similarity >= refinesThreshold` -> `refines`
/// 3. `source` cites candidate's id/tag/title token -> `references`
/// 4. otherwise -> `related`
pub fn classify(
    source: &Candidate,
    candidate: &Candidate,
    similarity: f64,
    refines_threshold: f64,
) -> (Relationship, f64) {
    let source_text = format!("{} {}", source.title, source.content);
    let candidate_text = format!("{} {}", candidate.title, candidate.content);

    if crate::negation::opposes(&source_text, &candidate_text) {
        return (Relationship::Contradicts, similarity);
    }
    if source.category == candidate.category && similarity >= refines_threshold {
        return (Relationship::Refines, similarity);
    }
    if cites(source, candidate) {
        return (Relationship::References, 0.9);
    }
    (Relationship::Related, similarity)
}

/// Does `source` cite `candidate`'s id, a tag, or a title token?
fn cites(source: &Candidate, candidate: &Candidate) -> bool {
    let haystack = format!("{} {}", source.title, source.content).to_lowercase();
    if haystack.contains(&format!("#{}", candidate.id)) {
        return true;
    }
    if candidate.tags.iter().any(|t| {
        let t = t.to_lowercase();
        !t.is_empty() && haystack.contains(&t)
    }) {
        return true;
    }
    candidate
        .title
        .split_whitespace()
        .filter(|w| w.len() >= 5)
        .any(|w| haystack.contains(&w.to_lowercase()))
}

/// `detectRelationships(m, k) -> [(targetId, relationship, strength)]`.
/// Pulls the top-`k` neighbors of `source` from `candidates` by cosine
/// similarity (self excluded, threshold enforced), classifies each, and
/// breaks ties by larger strength then smaller target id.
pub fn detect_relationships(
    source: &Candidate,
    candidates: &[Candidate],
    top_k: usize,
    similarity_threshold: f64,
    refines_threshold: f64,
) -> Vec<(i64, Relationship, f64)> {
    let Some(source_embedding) = &source.embedding else {
        return Vec::new();
    };

    let mut scored: Vec<(f64, &Candidate)> = candidates
        .iter()
        .filter(|c| c.id != source.id)
        .filter_map(|c| {
            let emb = c.embedding.as_ref()?;
            let sim = cosine(source_embedding, emb)?;
            (sim >= similarity_threshold).then_some((sim, c))
        })
        .collect();

    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.1.id.cmp(&b.1.id))
    });
    scored.truncate(top_k);

    scored
        .into_iter()
        .map(|(sim, candidate)| {
            let (relationship, strength) = classify(source, candidate, sim, refines_threshold);
            (candidate.id, relationship, strength)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: i64, title: &str, content: &str, category: Category, emb: Vec<f32>) -> Candidate {
        Candidate {
            id,
            title: title.to_string(),
            content: content.to_string(),
            category,
            tags: Vec::new(),
            embedding: Some(emb),
        }
    }

    #[test]
    fn self_excluded_and_threshold_enforced() {
        let source = candidate(1, "a", "use REST", Category::Pattern, vec![1.0, 0.0]);
        let low_sim = candidate(2, "b", "unrelated", Category::Pattern, vec![0.0, 1.0]);
        let out = detect_relationships(&source, &[source.clone(), low_sim], 10, 0.55, 0.85);
        assert!(out.is_empty());
    }

    #[test]
    fn same_category_high_similarity_refines() {
        let source = candidate(1, "a", "use REST for APIs", Category::Pattern, vec![1.0, 0.0, 0.0]);
        let target = candidate(2, "b", "use REST everywhere", Category::Pattern, vec![0.99, 0.1, 0.0]);
        let out = detect_relationships(&source, &[target], 10, 0.55, 0.85);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].1, Relationship::Refines);
    }

    #[test]
    fn opposing_statements_contradict() {
        let source = candidate(1, "a", "Always use REST", Category::Pattern, vec![1.0, 0.0]);
        let target = candidate(2, "b", "Never use REST, it doesn't scale", Category::Pattern, vec![0.9, 0.1]);
        let out = detect_relationships(&source, &[target], 10, 0.55, 0.85);
        assert_eq!(out[0].1, Relationship::Contradicts);
    }

    #[test]
    fn citing_title_token_references() {
        let source = candidate(1, "a", "see AuthMiddleware for details", Category::Note, vec![0.7, 0.7]);
        let target = candidate(2, "AuthMiddleware design", "token handling", Category::Architecture, vec![0.6, 0.6]);
        let out = detect_relationships(&source, &[target], 10, 0.55, 0.85);
        assert_eq!(out[0].1, Relationship::References);
        assert_eq!(out[0].2, 0.9);
    }

    #[test]
    fn defaults_to_related() {
        let source = candidate(1, "a", "notes about caching", Category::Note, vec![1.0, 0.0]);
        let target = candidate(2, "b", "notes about logging", Category::Note, vec![0.9, 0.1]);
        let out = detect_relationships(&source, &[target], 10, 0.55, 0.85);
        assert_eq!(out[0].1, Relationship::Related);
    }
}

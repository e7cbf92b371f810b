//! Lexical scoring: Jaccard overlap of lowercased word sets, plus a
//! substring bonus (spec §4.5).

use std::collections::HashSet;

fn word_set(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

/// Jaccard overlap of `query`'s word set against `haystack`'s, plus 0.2 if
/// the exact lowercased `query` substring appears in `title`. Capped at 1.0.
pub fn jaccard_overlap(query: &str, title: &str, content: &str) -> f64 {
    if query.trim().is_empty() {
        return 0.0;
    }
    let q = word_set(query);
    let haystack = word_set(&format!("{title} {content}"));
    let intersection = q.intersection(&haystack).count();
    let union = q.union(&haystack).count();
    let mut score = if union == 0 { 0.0 } else { intersection as f64 / union as f64 };

    if title.to_lowercase().contains(&query.to_lowercase()) {
        score += 0.2;
    }
    score.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_scores_zero() {
        assert_eq!(jaccard_overlap("", "title", "content"), 0.0);
    }

    #[test]
    fn exact_word_match_scores_positively() {
        let score = jaccard_overlap("rest api", "use REST for the API", "details");
        assert!(score > 0.0);
    }

    #[test]
    fn title_substring_bonus_applied() {
        let with_bonus = jaccard_overlap("auth middleware", "auth middleware design", "x");
        let without_bonus = jaccard_overlap("auth middleware", "something else", "auth middleware appears here");
        assert!(with_bonus > without_bonus);
    }

    #[test]
    fn score_never_exceeds_one() {
        let score = jaccard_overlap("a a a", "a a a", "a a a");
        assert!(score <= 1.0);
    }
}

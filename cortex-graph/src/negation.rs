//! Cheap negation/opposition cues used by rule 1 of [`crate::detect::classify`].
//!
//! Grounded on the teacher's absolute-statement detector: an "always" cue on
//! one side and a "never"/negation cue on the other, about overlapping
//! subject words, reads as a direct conflict.

use std::sync::LazyLock;

use regex::Regex;

static AFFIRM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(always|use|prefer|should|must|do)\b").unwrap()
});

static NEGATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(never|don't|do not|avoid|shouldn't|should not|stop using|no longer|not)\b")
        .unwrap()
});

/// Subject words: anything 4+ chars, lowercased, with stopwords stripped.
fn subject_words(text: &str) -> Vec<String> {
    const STOP: &[&str] = &[
        "always", "never", "use", "uses", "using", "prefer", "should", "must", "don't", "do",
        "not", "avoid", "shouldn't", "stop", "longer", "that", "this", "with", "from", "into",
    ];
    text.split(|c: char| !c.is_alphanumeric())
        .map(|w| w.to_lowercase())
        .filter(|w| w.len() >= 4 && !STOP.contains(&w.as_str()))
        .collect()
}

fn topics_overlap(a: &str, b: &str) -> bool {
    let a_words = subject_words(a);
    let b_words = subject_words(b);
    if a_words.is_empty() || b_words.is_empty() {
        return false;
    }
    let overlap = a_words.iter().filter(|w| b_words.contains(w)).count();
    let min_len = a_words.len().min(b_words.len());
    overlap as f64 / min_len as f64 >= 0.3
}

/// True iff `a` and `b` state opposite positions about an overlapping
/// subject (one affirms, the other negates).
pub fn opposes(a: &str, b: &str) -> bool {
    let a_affirms = AFFIRM_RE.is_match(a) && !NEGATE_RE.is_match(a);
    let b_negates = NEGATE_RE.is_match(b);
    let a_negates = NEGATE_RE.is_match(a);
    let b_affirms = AFFIRM_RE.is_match(b) && !NEGATE_RE.is_match(b);

    if ((a_affirms && b_negates) || (a_negates && b_affirms)) && topics_overlap(a, b) {
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_always_never_on_same_subject() {
        assert!(opposes(
            "Always use REST for the API layer",
            "Never use REST, it doesn't scale"
        ));
    }

    #[test]
    fn unrelated_subjects_do_not_oppose() {
        assert!(!opposes(
            "Always use REST for the API layer",
            "Never commit secrets to git"
        ));
    }

    #[test]
    fn two_affirmations_do_not_oppose() {
        assert!(!opposes("Always use REST", "Always use REST for consistency"));
    }
}

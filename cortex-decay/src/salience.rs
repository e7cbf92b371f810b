//! C3: derive an initial importance score from a memory's title/content
//! (spec §4.3). The keyword bag is exposed as a configuration constant
//! per spec's Open Question ("the exact keyword bag... is not
//! exhaustively enumerated... implementers should expose it as a
//! configuration constant").

use std::sync::LazyLock;

use regex::Regex;

/// Cues for each salience factor. Not exhaustive by design — callers can
/// swap this constant for a domain-tuned bag without touching `calculate`.
pub struct KeywordBag {
    pub explicit_request: &'static [&'static str],
    pub architecture: &'static [&'static str],
    pub error_resolution: &'static [&'static str],
    pub code_pattern: &'static [&'static str],
    pub user_preference: &'static [&'static str],
    /// Keywords counted toward `mentionCount` across all categories.
    pub mentions: &'static [&'static str],
}

pub const DEFAULT_KEYWORDS: KeywordBag = KeywordBag {
    explicit_request: &[
        "remember that",
        "remember this",
        "please remember",
        "make sure to remember",
        "don't forget",
        "keep in mind",
    ],
    architecture: &[
        "architecture",
        "design decision",
        "we decided",
        "decided to use",
        "chose to use",
        "trade-off",
        "tradeoff",
    ],
    error_resolution: &[
        "fixed",
        "bug",
        "root cause",
        "resolved",
        "error was",
        "the issue was",
        "traceback",
    ],
    code_pattern: &[
        "pattern",
        "convention",
        "always use",
        "best practice",
        "idiom",
    ],
    user_preference: &[
        "i prefer",
        "please use",
        "from now on",
        "i like",
        "don't use",
        "avoid using",
    ],
    mentions: &[
        "architecture",
        "bug",
        "error",
        "pattern",
        "prefer",
        "decision",
        "fixed",
        "convention",
        "remember",
        "todo",
        "refactor",
        "test",
        "performance",
        "security",
    ],
};

static CODE_REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?x)
        `[^`]+`                      # inline code
        | \b[A-Za-z_][A-Za-z0-9_]*\([^)]*\)  # function(...)
        | \b[a-z0-9_]+/[a-z0-9_./-]+\b       # path/like/this
        | \.[a-z]{1,5}\b                     # .ext
    ").unwrap()
});

static EMOTIONAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(critical|urgent|important|never|always|must|warning|danger)\b|!").unwrap()
});

#[derive(Debug, Clone, Copy, Default)]
pub struct SalienceFactors {
    pub explicit_request: bool,
    pub is_architecture_decision: bool,
    pub is_error_resolution: bool,
    pub is_code_pattern: bool,
    pub is_user_preference: bool,
    pub mention_count: u32,
    pub has_code_reference: bool,
    pub emotional_markers: bool,
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Analyze title + content against the keyword bag (spec §4.3).
/// `mentionCount` is always >= 1, even when nothing matches.
pub fn analyze(title: &str, content: &str) -> SalienceFactors {
    analyze_with_keywords(title, content, &DEFAULT_KEYWORDS)
}

pub fn analyze_with_keywords(title: &str, content: &str, bag: &KeywordBag) -> SalienceFactors {
    let combined = format!("{} {}", title, content).to_lowercase();

    let mention_count = bag
        .mentions
        .iter()
        .map(|kw| combined.matches(kw).count() as u32)
        .sum::<u32>()
        .max(1);

    SalienceFactors {
        explicit_request: contains_any(&combined, bag.explicit_request),
        is_architecture_decision: contains_any(&combined, bag.architecture),
        is_error_resolution: contains_any(&combined, bag.error_resolution),
        is_code_pattern: contains_any(&combined, bag.code_pattern),
        is_user_preference: contains_any(&combined, bag.user_preference),
        mention_count,
        has_code_reference: CODE_REFERENCE_RE.is_match(&combined),
        emotional_markers: EMOTIONAL_RE.is_match(&combined),
    }
}

/// `calculate(factors) -> salience ∈ [0,1]` exactly per spec §4.3.
pub fn calculate(factors: &SalienceFactors) -> f64 {
    let mut score = 0.25;
    if factors.explicit_request {
        score += 0.3;
    }
    if factors.is_architecture_decision {
        score += 0.2;
    }
    if factors.is_error_resolution {
        score += 0.15;
    }
    if factors.is_code_pattern {
        score += 0.1;
    }
    if factors.is_user_preference {
        score += 0.1;
    }
    score += (0.03 * ((factors.mention_count + 1) as f64).log2()).min(0.15);
    if factors.has_code_reference {
        score += 0.05;
    }
    if factors.emotional_markers {
        score += 0.05;
    }
    score.clamp(0.0, 1.0)
}

/// A one-line human-readable reason, used only in the caller response
/// (spec §4.3 — never consulted by ranking or persistence logic).
pub fn explain(factors: &SalienceFactors) -> String {
    let mut reasons = Vec::new();
    if factors.explicit_request {
        reasons.push("explicit request to remember");
    }
    if factors.is_architecture_decision {
        reasons.push("architecture decision");
    }
    if factors.is_error_resolution {
        reasons.push("error resolution");
    }
    if factors.is_code_pattern {
        reasons.push("code pattern");
    }
    if factors.is_user_preference {
        reasons.push("user preference");
    }
    if factors.has_code_reference {
        reasons.push("references code");
    }
    if factors.emotional_markers {
        reasons.push("emphasized language");
    }
    if reasons.is_empty() {
        "general note".to_string()
    } else {
        reasons.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mention_count_is_at_least_one_with_no_keywords() {
        let f = analyze("hello", "world");
        assert!(f.mention_count >= 1);
    }

    #[test]
    fn explicit_request_detected() {
        let f = analyze("note", "please remember this for later");
        assert!(f.explicit_request);
    }

    #[test]
    fn base_score_is_quarter_point_two_five() {
        let f = SalienceFactors::default();
        // mention_count 0 here (never analyzed) -> treat as log2(1)=0 term.
        let mut f = f;
        f.mention_count = 0;
        assert!((calculate(&f) - (0.25 + 0.0)).abs() < 1e-9);
    }

    #[test]
    fn score_clamped_to_one() {
        let f = SalienceFactors {
            explicit_request: true,
            is_architecture_decision: true,
            is_error_resolution: true,
            is_code_pattern: true,
            is_user_preference: true,
            mention_count: 1000,
            has_code_reference: true,
            emotional_markers: true,
        };
        assert_eq!(calculate(&f), 1.0);
    }

    #[test]
    fn code_reference_detected_in_backticks() {
        let f = analyze("fix", "the bug was in `fetch_user()` all along");
        assert!(f.has_code_reference);
    }
}

//! Tracks embedder availability so the `EMBEDDER_UNAVAILABLE` condition
//! (spec section 7) is logged once per onset rather than once per call —
//! a crashing embedder shouldn't flood the logs for every recall.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::warn;

#[derive(Debug, Default)]
pub struct DegradationTracker {
    embedder_degraded: AtomicBool,
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report an embedder failure. Returns `true` the first time the
    /// tracker transitions from healthy to degraded, so the caller can
    /// decide whether to log.
    pub fn mark_embedder_unavailable(&self) -> bool {
        let was_degraded = self.embedder_degraded.swap(true, Ordering::SeqCst);
        if !was_degraded {
            warn!(target: "cortex_observability::degradation", "embedder unavailable, falling back to lexical-only recall");
        }
        !was_degraded
    }

    /// Report a successful embed call, clearing the degraded flag.
    pub fn mark_embedder_recovered(&self) -> bool {
        let was_degraded = self.embedder_degraded.swap(false, Ordering::SeqCst);
        if was_degraded {
            tracing::info!(target: "cortex_observability::degradation", "embedder recovered");
        }
        was_degraded
    }

    pub fn is_embedder_degraded(&self) -> bool {
        self.embedder_degraded.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_transition_only_once() {
        let tracker = DegradationTracker::new();
        assert!(tracker.mark_embedder_unavailable());
        assert!(!tracker.mark_embedder_unavailable());
        assert!(tracker.is_embedder_degraded());
    }

    #[test]
    fn recovery_clears_flag() {
        let tracker = DegradationTracker::new();
        tracker.mark_embedder_unavailable();
        assert!(tracker.mark_embedder_recovered());
        assert!(!tracker.is_embedder_degraded());
    }
}

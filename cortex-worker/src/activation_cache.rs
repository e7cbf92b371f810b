//! Activation cache: ephemeral `memory_id -> (score, expires_at)` mapping
//! (spec §3 "Derived state"). Never authoritative; dropped entries never
//! cause a correctness problem.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

#[derive(Default)]
pub struct ActivationCache {
    entries: Mutex<HashMap<i64, (f64, DateTime<Utc>)>>,
}

impl ActivationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, memory_id: i64, score: f64, expires_at: DateTime<Utc>) {
        self.entries.lock().unwrap().insert(memory_id, (score, expires_at));
    }

    pub fn get(&self, memory_id: i64) -> Option<f64> {
        self.entries.lock().unwrap().get(&memory_id).map(|(score, _)| *score)
    }

    /// Drop entries whose `expires_at < now`. Returns the count pruned.
    pub fn prune(&self, now: DateTime<Utc>) -> usize {
        let mut guard = self.entries.lock().unwrap();
        let before = guard.len();
        guard.retain(|_, (_, expires_at)| *expires_at >= now);
        before - guard.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn prune_drops_only_expired_entries() {
        let cache = ActivationCache::new();
        let now = Utc::now();
        cache.set(1, 0.5, now - Duration::minutes(1));
        cache.set(2, 0.5, now + Duration::minutes(10));
        let pruned = cache.prune(now);
        assert_eq!(pruned, 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(2).is_some());
    }
}

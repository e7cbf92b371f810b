//! Process-local counters for the operations named in the spec's
//! callable surface (section 6) and worker ticks (section 4.9). Not a
//! Prometheus exporter — just atomics a caller can snapshot into a
//! `HealthReport` or a log line.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct MetricsCollector {
    remembers: AtomicU64,
    recalls: AtomicU64,
    consolidations: AtomicU64,
    worker_ticks: AtomicU64,
    links_created: AtomicU64,
    contradictions_detected: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub remembers: u64,
    pub recalls: u64,
    pub consolidations: u64,
    pub worker_ticks: u64,
    pub links_created: u64,
    pub contradictions_detected: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_remember(&self) {
        self.remembers.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_recall(&self) {
        self.recalls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_consolidation(&self) {
        self.consolidations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_worker_tick(&self) {
        self.worker_ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_links_created(&self, count: u64) {
        self.links_created.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_contradictions_detected(&self, count: u64) {
        self.contradictions_detected.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            remembers: self.remembers.load(Ordering::Relaxed),
            recalls: self.recalls.load(Ordering::Relaxed),
            consolidations: self.consolidations.load(Ordering::Relaxed),
            worker_ticks: self.worker_ticks.load(Ordering::Relaxed),
            links_created: self.links_created.load(Ordering::Relaxed),
            contradictions_detected: self.contradictions_detected.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let metrics = MetricsCollector::new();
        metrics.record_remember();
        metrics.record_remember();
        metrics.record_recall();
        metrics.record_links_created(3);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.remembers, 2);
        assert_eq!(snapshot.recalls, 1);
        assert_eq!(snapshot.links_created, 3);
        assert_eq!(snapshot.consolidations, 0);
    }
}

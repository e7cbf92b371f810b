//! Aggregate health reporting. Not part of the spec's core (section 1
//! scopes "the dashboard HTTP/SSE layer" out), but the ambient stack a
//! long-lived process needs to answer "is the store under pressure"
//! without a caller having to re-derive the predictive-consolidation
//! thresholds themselves.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Everything [`HealthReport::build`] needs, gathered by the caller from
/// a `Stats` read plus the embedder's last-known availability (spec
/// section 7 `EMBEDDER_UNAVAILABLE`).
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthSnapshot {
    pub total: usize,
    pub short_term: usize,
    pub max_short_term: usize,
    pub max_long_term: usize,
    pub embedder_degraded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: HealthStatus,
    pub stm_fullness: f64,
    pub total_fullness: f64,
    pub messages: Vec<String>,
}

impl HealthReport {
    /// Mirrors the fullness thresholds from spec section 4.9's
    /// predictive-consolidation policy (0.85 STM / 0.80 total), since a
    /// store that would trigger an emergency consolidation is by
    /// definition not "healthy".
    pub fn build(snapshot: &HealthSnapshot) -> Self {
        let stm_fullness = if snapshot.max_short_term == 0 {
            0.0
        } else {
            snapshot.short_term as f64 / snapshot.max_short_term as f64
        };
        let total_capacity = snapshot.max_short_term + snapshot.max_long_term;
        let total_fullness = if total_capacity == 0 {
            0.0
        } else {
            snapshot.total as f64 / total_capacity as f64
        };

        let mut messages = Vec::new();
        let mut status = HealthStatus::Healthy;

        if stm_fullness > 0.95 || total_fullness > 0.95 {
            status = HealthStatus::Unhealthy;
            messages.push("store capacity critically full, consolidation is falling behind".into());
        } else if stm_fullness > 0.85 {
            status = HealthStatus::Degraded;
            messages.push("short-term tier above predictive-consolidation threshold".into());
        } else if total_fullness > 0.80 {
            status = HealthStatus::Degraded;
            messages.push("total store above predictive-consolidation threshold".into());
        }

        if snapshot.embedder_degraded {
            if status == HealthStatus::Healthy {
                status = HealthStatus::Degraded;
            }
            messages.push("embedder unavailable, search has fallen back to lexical-only".into());
        }

        Self {
            status,
            stm_fullness,
            total_fullness,
            messages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healthy_when_under_all_thresholds() {
        let snapshot = HealthSnapshot {
            total: 10,
            short_term: 5,
            max_short_term: 100,
            max_long_term: 1000,
            embedder_degraded: false,
        };
        assert_eq!(HealthReport::build(&snapshot).status, HealthStatus::Healthy);
    }

    #[test]
    fn degraded_above_stm_threshold() {
        let snapshot = HealthSnapshot {
            total: 90,
            short_term: 90,
            max_short_term: 100,
            max_long_term: 1000,
            embedder_degraded: false,
        };
        assert_eq!(HealthReport::build(&snapshot).status, HealthStatus::Degraded);
    }

    #[test]
    fn unhealthy_above_critical_threshold() {
        let snapshot = HealthSnapshot {
            total: 99,
            short_term: 99,
            max_short_term: 100,
            max_long_term: 1000,
            embedder_degraded: false,
        };
        assert_eq!(HealthReport::build(&snapshot).status, HealthStatus::Unhealthy);
    }

    #[test]
    fn embedder_degradation_downgrades_healthy_to_degraded() {
        let snapshot = HealthSnapshot {
            total: 10,
            short_term: 5,
            max_short_term: 100,
            max_long_term: 1000,
            embedder_degraded: true,
        };
        assert_eq!(HealthReport::build(&snapshot).status, HealthStatus::Degraded);
    }
}

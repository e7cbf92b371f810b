//! `shouldTriggerPredictiveConsolidation(stats, config)` (spec §4.9).

use cortex_core::CortexConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    None,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictiveDecision {
    pub should_run: bool,
    pub urgency: Urgency,
}

/// Inputs the light tick gathers from a single `store.all(project)` scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct PressureStats {
    pub short_term: usize,
    pub total: usize,
    /// Short-term memories created in the last 30 minutes.
    pub recent_creates: usize,
    /// Short-term rows with `decayed_score < 0.25`.
    pub stm_low_decay: usize,
}

pub fn should_trigger_predictive_consolidation(
    stats: PressureStats,
    config: &CortexConfig,
) -> PredictiveDecision {
    let stm_fullness = stats.short_term as f64 / config.max_short_term_memories as f64;
    let total_fullness =
        stats.total as f64 / (config.max_short_term_memories + config.max_long_term_memories) as f64;

    if stm_fullness > 0.85 {
        return PredictiveDecision {
            should_run: true,
            urgency: Urgency::Critical,
        };
    }
    if total_fullness > 0.80 {
        return PredictiveDecision {
            should_run: true,
            urgency: Urgency::High,
        };
    }
    if stm_fullness > 0.70 && (stats.recent_creates >= 5 || stats.stm_low_decay > 15) {
        return PredictiveDecision {
            should_run: true,
            urgency: Urgency::Medium,
        };
    }
    PredictiveDecision {
        should_run: false,
        urgency: Urgency::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CortexConfig {
        CortexConfig::default()
    }

    #[test]
    fn critical_at_851_percent_stm() {
        let stats = PressureStats {
            short_term: 86,
            total: 86,
            recent_creates: 1,
            stm_low_decay: 0,
        };
        let decision = should_trigger_predictive_consolidation(stats, &config());
        assert_eq!(decision.urgency, Urgency::Critical);
        assert!(decision.should_run);
    }

    #[test]
    fn no_trigger_at_849_percent_pure_capacity() {
        let stats = PressureStats {
            short_term: 84,
            total: 84,
            recent_creates: 0,
            stm_low_decay: 0,
        };
        let decision = should_trigger_predictive_consolidation(stats, &config());
        assert!(!decision.should_run);
    }

    #[test]
    fn medium_when_stm_above_70_with_recent_activity() {
        let stats = PressureStats {
            short_term: 75,
            total: 75,
            recent_creates: 5,
            stm_low_decay: 0,
        };
        let decision = should_trigger_predictive_consolidation(stats, &config());
        assert_eq!(decision.urgency, Urgency::Medium);
    }

    #[test]
    fn high_when_total_fullness_exceeds_80_percent() {
        let stats = PressureStats {
            short_term: 50,
            total: 900,
            recent_creates: 0,
            stm_low_decay: 0,
        };
        let decision = should_trigger_predictive_consolidation(stats, &config());
        assert_eq!(decision.urgency, Urgency::High);
    }
}

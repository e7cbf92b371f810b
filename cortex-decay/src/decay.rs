//! C4: exponential decay with access-count reinforcement (spec §4.4).

use chrono::Duration;

/// `decayed(salience, hoursSinceAccess, accessCount, decayRate) -> [0,1]`.
///
/// `decayed = clamp(salience * decayRate^hours * (1 + log2(1+accessCount)*0.05), 0, 1)`
pub fn decayed(salience: f64, hours_since_access: f64, access_count: u64, decay_rate: f64) -> f64 {
    let age_factor = decay_rate.powf(hours_since_access.max(0.0));
    let reinforcement = 1.0 + ((1 + access_count) as f64).log2() * 0.05;
    (salience * age_factor * reinforcement).clamp(0.0, 1.0)
}

/// Compact human-readable span ("3m", "2h", "4d") for display in context
/// summaries. Uses the largest whole unit that fits.
pub fn format_time_since_access(duration: Duration) -> String {
    let total_minutes = duration.num_minutes();
    if total_minutes < 1 {
        return "just now".to_string();
    }
    if total_minutes < 60 {
        return format!("{}m", total_minutes);
    }
    let total_hours = duration.num_hours();
    if total_hours < 24 {
        return format!("{}h", total_hours);
    }
    let days = duration.num_days();
    format!("{}d", days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decay_then_reinforce_matches_spec_scenario() {
        // salience=0.5, 10h elapsed, access_count=0, decayRate=0.995
        let after_decay = decayed(0.5, 10.0, 0, 0.995);
        assert!((after_decay - 0.4756).abs() < 1e-3, "got {}", after_decay);

        // reinforcement on access multiplies decayedScore by the
        // reinforcement factor (1.2) directly -- see cortex-storage's
        // `access()`, which owns the persisted access_count/last_accessed.
        let reinforced = (after_decay * 1.2_f64).min(1.0);
        assert!((reinforced - 0.5707).abs() < 1e-3, "got {}", reinforced);
    }

    #[test]
    fn zero_hours_elapsed_is_identity_modulo_reinforcement() {
        let d = decayed(0.5, 0.0, 0, 0.995);
        assert!((d - 0.5).abs() < 1e-9);
    }

    #[test]
    fn result_never_exceeds_one() {
        let d = decayed(1.0, 0.0, 1_000_000, 0.995);
        assert!(d <= 1.0);
    }

    #[test]
    fn result_never_negative() {
        let d = decayed(0.0, 1000.0, 0, 0.995);
        assert!(d >= 0.0);
    }

    #[test]
    fn higher_access_count_slows_apparent_decay() {
        let low = decayed(0.5, 100.0, 0, 0.995);
        let high = decayed(0.5, 100.0, 50, 0.995);
        assert!(high > low);
    }

    #[test]
    fn format_time_buckets() {
        assert_eq!(format_time_since_access(Duration::seconds(30)), "just now");
        assert_eq!(format_time_since_access(Duration::minutes(3)), "3m");
        assert_eq!(format_time_since_access(Duration::hours(2)), "2h");
        assert_eq!(format_time_since_access(Duration::days(4)), "4d");
    }
}

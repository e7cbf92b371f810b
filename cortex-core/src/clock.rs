//! Wall-clock seam. Production code uses [`SystemClock`]; tests can inject
//! a fixed or advancing clock to exercise the decay/worker-cadence
//! scenarios from spec §8 ("fast-forward 10h") without sleeping.

use chrono::{DateTime, Utc};

/// A source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

//! Structured logging, health reporting, metrics collection, and
//! degradation tracking — the ambient observability stack carried
//! regardless of spec Non-goals (`SPEC_FULL.md` section 2).

pub mod degradation;
pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use degradation::DegradationTracker;
pub use health::{HealthReport, HealthSnapshot, HealthStatus};
pub use metrics::MetricsCollector;
pub use tracing_setup::init_tracing;

//! C9: the background maintenance worker — light/medium ticks coordinating
//! the store (C1), graph (C6), and consolidator (C7).

pub mod activation_cache;
pub mod predictive;
pub mod scheduler;
pub mod tick;

pub use activation_cache::ActivationCache;
pub use predictive::{should_trigger_predictive_consolidation, PredictiveDecision, PressureStats, Urgency};
pub use scheduler::Worker;
pub use tick::{light_tick, medium_tick, LightTickReport, MediumTickReport};

//! # cortex-core
//!
//! Foundation crate for the Cortex memory system. Defines the data model
//! (§3 of the spec), the error taxonomy (§7), runtime configuration, the
//! wall-clock abstraction, and the store/embedder trait seams every other
//! crate in the workspace programs against.

pub mod clock;
pub mod config;
pub mod errors;
pub mod link;
pub mod memory;
pub mod session;
pub mod traits;

pub use clock::{Clock, SystemClock};
pub use config::CortexConfig;
pub use errors::{CortexError, CortexResult};
pub use link::{Link, Relationship};
pub use memory::{Category, Importance, Memory, MemoryType, NewMemory, Truncation};
pub use session::Session;
pub use traits::{Embedder, MemoryFilter, MemoryStore, RecallMode, ResolvedDefaults, SessionStore, Stats};

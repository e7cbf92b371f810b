//! C8 (context builder) and C10 (project resolver).

pub mod context;
pub mod project;

pub use context::{format_context_summary, generate_context_summary, ContextFormat, ContextSummary};
pub use project::{resolve, ProjectResolver};

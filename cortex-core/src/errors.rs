//! Error taxonomy per spec §7. Internal storage primitives are the only
//! layer allowed to raise; the store classifies and maps them into these
//! variants, which every tool boundary then turns into `{success, error}`
//! envelopes (§6/§9).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CortexError {
    /// Malformed input: empty title, unknown category/type, bad project tag.
    #[error("validation error: {0}")]
    Validation(String),

    /// Entity id not present in the store.
    #[error("not found: {0}")]
    NotFound(i64),

    /// SQLite reported SQLITE_BUSY; caller should retry once.
    #[error("storage busy")]
    StorageBusy,

    /// Storage failed after the single retry, or failed for a non-retryable reason.
    #[error("storage error: {0}")]
    StorageError(String),

    /// The embedder could not produce a vector for this text; the memory
    /// is stored without an embedding and search falls back to lexical-only.
    #[error("embedder unavailable: {0}")]
    EmbedderUnavailable(String),
}

pub type CortexResult<T> = Result<T, CortexError>;

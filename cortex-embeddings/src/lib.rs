//! C2: the pluggable embedder. `spec.md` leaves the vector space
//! unspecified and only contracts dimensionality stability across one
//! database lifetime, so the default provider here is a deterministic,
//! offline, hash-based bag-of-words encoder — no model download, no
//! network access, reproducible across processes. An ONNX-backed MiniLM
//! provider is available behind the `onnx` feature for deployments that
//! want the real sentence encoder; both implement the same [`Embedder`]
//! trait so callers never know which one they got.

pub mod cache;
pub mod hashing;

#[cfg(feature = "onnx")]
pub mod onnx;

pub use cortex_core::traits::{cosine, Embedder};
pub use hashing::{HashingEmbedder, DEFAULT_DIMS};

/// Truncate input text before embedding, per spec §4.2 ("~2000 chars").
pub fn truncate_for_embedding(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

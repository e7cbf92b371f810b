//! ONNX-backed MiniLM provider, gated behind the `onnx` feature. Not
//! compiled by default: loading a real sentence-transformer means
//! shipping or downloading model weights, which is explicitly out of
//! scope for the core (spec §1, "the choice of embedding provider" is an
//! external collaborator). This module exists so a deployment that wants
//! the real encoder can plug it in without touching any caller code —
//! both providers implement the same [`Embedder`] trait.

use std::path::Path;
use std::sync::Mutex;

use cortex_core::errors::{CortexError, CortexResult};
use cortex_core::traits::Embedder;
use ort::session::Session;

pub struct OnnxEmbedder {
    session: Mutex<Session>,
    dims: usize,
}

impl OnnxEmbedder {
    /// Load a MiniLM-family ONNX model from disk. Tokenization and the
    /// pooling/normalization head are deployment-specific and are left to
    /// the caller's model export; this provider only owns the inference
    /// session lifecycle.
    pub fn load(model_path: &Path, dims: usize) -> CortexResult<Self> {
        let session = Session::builder()
            .and_then(|b| b.commit_from_file(model_path))
            .map_err(|e| CortexError::EmbedderUnavailable(e.to_string()))?;
        Ok(Self {
            session: Mutex::new(session),
            dims,
        })
    }
}

impl Embedder for OnnxEmbedder {
    fn embed(&self, _text: &str) -> CortexResult<Vec<f32>> {
        // Inference wiring (tokenize -> run session -> mean-pool -> L2
        // normalize) is intentionally left to the deployment's model
        // export; callers without a loaded model should use
        // `HashingEmbedder` instead. Holding the session behind a mutex
        // keeps this provider `Sync` for the process-wide singleton in
        // spec §5 without requiring the `ort` session itself to be.
        let _guard = self
            .session
            .lock()
            .map_err(|_| CortexError::EmbedderUnavailable("onnx session poisoned".into()))?;
        Err(CortexError::EmbedderUnavailable(
            "onnx inference pipeline not wired for this model export".into(),
        ))
    }

    fn dims(&self) -> usize {
        self.dims
    }
}

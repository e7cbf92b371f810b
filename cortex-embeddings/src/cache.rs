//! L1 in-memory cache in front of any [`Embedder`], keyed by a blake3
//! content hash. Grounded on the teacher's `cache::l1_memory` module;
//! the teacher's L2 SQLite-backed tier is not carried over — embeddings
//! are already persisted on the `Memory` row itself (spec §3), so a
//! second on-disk embedding cache would duplicate storage for no benefit
//! (see DESIGN.md).

use std::sync::Arc;

use cortex_core::errors::CortexResult;
use cortex_core::traits::Embedder;
use moka::sync::Cache;

pub struct CachedEmbedder<E: Embedder> {
    inner: E,
    cache: Cache<String, Arc<Vec<f32>>>,
}

impl<E: Embedder> CachedEmbedder<E> {
    pub fn new(inner: E, capacity: u64) -> Self {
        Self {
            inner,
            cache: Cache::new(capacity),
        }
    }

    fn key(text: &str) -> String {
        blake3::hash(text.as_bytes()).to_hex().to_string()
    }
}

impl<E: Embedder> Embedder for CachedEmbedder<E> {
    fn embed(&self, text: &str) -> CortexResult<Vec<f32>> {
        let key = Self::key(text);
        if let Some(hit) = self.cache.get(&key) {
            return Ok((*hit).clone());
        }
        let v = self.inner.embed(text)?;
        self.cache.insert(key, Arc::new(v.clone()));
        Ok(v)
    }

    fn dims(&self) -> usize {
        self.inner.dims()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HashingEmbedder;

    #[test]
    fn caches_repeated_lookups() {
        let e = CachedEmbedder::new(HashingEmbedder::new(), 100);
        let a = e.embed("a stable phrase").unwrap();
        let b = e.embed("a stable phrase").unwrap();
        assert_eq!(a, b);
    }
}

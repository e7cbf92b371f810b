//! Deterministic offline encoder: a hashed bag-of-words embedding.
//!
//! Each lowercased word token is hashed with blake3; the low bits select a
//! dimension in `[0, D)` and the next bit selects a sign, following the
//! classic "hashing trick" for sparse bag-of-words vectorization. The
//! accumulated vector is L2-normalized, matching the unit-vector contract
//! of spec §4.2. This gives stable cosine similarity for repeated/near-
//! duplicate phrasing without any network dependency or model weights,
//! which is exactly what spec's Open Question asks the embedder seam to
//! allow for an offline encoder.

use cortex_core::errors::CortexResult;
use cortex_core::traits::Embedder;

/// Default embedding dimensionality, matching the MiniLM-family encoder
/// the spec names as the reference default provider.
pub const DEFAULT_DIMS: usize = 384;

pub struct HashingEmbedder {
    dims: usize,
}

impl HashingEmbedder {
    pub fn new() -> Self {
        Self { dims: DEFAULT_DIMS }
    }

    pub fn with_dims(dims: usize) -> Self {
        Self { dims }
    }

    fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(|w| w.to_lowercase())
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl Embedder for HashingEmbedder {
    fn embed(&self, text: &str) -> CortexResult<Vec<f32>> {
        let truncated = crate::truncate_for_embedding(text, 2000);
        let mut v = vec![0f32; self.dims];
        for token in Self::tokenize(truncated) {
            let hash = blake3::hash(token.as_bytes());
            let bytes = hash.as_bytes();
            let idx = u64::from_le_bytes(bytes[0..8].try_into().unwrap()) as usize % self.dims;
            let sign = if bytes[8] & 1 == 0 { 1.0 } else { -1.0 };
            v[idx] += sign;
        }
        let norm = v.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
        if norm > 0.0 {
            for x in v.iter_mut() {
                *x = (*x as f64 / norm) as f32;
            }
        }
        Ok(v)
    }

    fn dims(&self) -> usize {
        self.dims
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_is_unit_length() {
        let e = HashingEmbedder::new();
        let v = e.embed("use dependency injection for the http client").unwrap();
        let norm: f64 = v.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6 || norm == 0.0);
    }

    #[test]
    fn same_text_same_vector() {
        let e = HashingEmbedder::new();
        assert_eq!(
            e.embed("repeat this phrase").unwrap(),
            e.embed("repeat this phrase").unwrap()
        );
    }

    #[test]
    fn empty_text_is_zero_vector() {
        let e = HashingEmbedder::new();
        let v = e.embed("   ").unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn dims_match_default() {
        let e = HashingEmbedder::new();
        assert_eq!(e.dims(), DEFAULT_DIMS);
        assert_eq!(e.embed("x").unwrap().len(), DEFAULT_DIMS);
    }

    #[test]
    fn cosine_similar_for_overlapping_phrasing() {
        let e = HashingEmbedder::new();
        let a = e.embed("retry on storage busy with a short backoff").unwrap();
        let b = e.embed("retry once on storage busy errors").unwrap();
        let c = e.embed("bananas are a good source of potassium").unwrap();
        let sim_ab = cortex_core::traits::cosine(&a, &b).unwrap();
        let sim_ac = cortex_core::traits::cosine(&a, &c).unwrap();
        assert!(sim_ab > sim_ac);
    }
}

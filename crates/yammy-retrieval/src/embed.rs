//! Embedding oracle seam and similarity math.
//!
//! The real embedding model lives in an external service; the core only
//! depends on the [`Embedder`] trait. [`HashedEmbedder`] is a deterministic
//! stand-in for tests and offline runs.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;

/// Opaque text→vector oracle. Deterministic per (text, model version).
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed one text into a fixed-dimension vector.
    ///
    /// # Errors
    ///
    /// Returns an error when the oracle is unreachable or replies
    /// malformed; the caller propagates it, since no ranking is possible
    /// without vectors.
    async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>>;
}

/// Deterministic hash-based embedder.
///
/// Maps equal texts to equal unit vectors without any external model.
/// Not semantically meaningful; used by tests and the offline CLI path.
#[derive(Clone)]
pub struct HashedEmbedder {
    dimension: usize,
}

impl HashedEmbedder {
    /// Create an embedder producing vectors of `dimension`.
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    /// Synchronous encoding used internally and by fixtures.
    #[must_use]
    pub fn encode(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0_f32; self.dimension];
        for (i, value) in embedding.iter_mut().enumerate() {
            let i_u64 = u64::try_from(i).unwrap_or(0);
            let mut hasher = DefaultHasher::new();
            text.hash(&mut hasher);
            i_u64.hash(&mut hasher);
            let hash1 = hasher.finish();

            let mut hasher2 = DefaultHasher::new();
            text.hash(&mut hasher2);
            i_u64.wrapping_mul(31).hash(&mut hasher2);
            let hash2 = hasher2.finish();

            let combined = hash1.wrapping_mul(31).wrapping_add(hash2);
            let bucket = u16::try_from(combined % 1000).unwrap_or(0);
            *value = f32::from(bucket) / 1000.0;
        }
        normalize(&embedding)
    }

    /// Vector dimension this embedder produces.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

#[async_trait]
impl Embedder for HashedEmbedder {
    async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        Ok(self.encode(text))
    }
}

/// Normalize a vector to unit length.
fn normalize(v: &[f32]) -> Vec<f32> {
    let sum: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if sum == 0.0 {
        return v.to_vec();
    }
    v.iter().map(|x| x / sum).collect()
}

/// Cosine similarity between two vectors; 0.0 on length mismatch or zero norm.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_is_deterministic() {
        let embedder = HashedEmbedder::new(64);
        assert_eq!(embedder.encode("김치찌개"), embedder.encode("김치찌개"));
        assert_ne!(embedder.encode("김치찌개"), embedder.encode("된장찌개"));
    }

    #[test]
    fn encoding_is_unit_length() {
        let embedder = HashedEmbedder::new(64);
        let v = embedder.encode("유사도");
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let embedder = HashedEmbedder::new(32);
        let v = embedder.encode("무침");
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn cosine_handles_mismatch_and_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn trait_path_matches_sync_encoding() {
        let embedder = HashedEmbedder::new(16);
        let via_trait = embedder.embed("잡채").await.unwrap();
        assert_eq!(via_trait, embedder.encode("잡채"));
    }
}

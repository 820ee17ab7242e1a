//! Text embedding backends
//!
//! The engine only relies on the [`Embedder`] contract: a fixed output
//! dimension and batched encoding.

use crate::error::{Result, ScoringError};
use ahash::AHashSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use talentx_core::Vector;

/// Default output dimension of [`HashingEmbedder`]
pub const DEFAULT_HASH_DIM: usize = 384;

const WORD_WEIGHT: f32 = 2.0;
const TRIGRAM_WEIGHT: f32 = 1.0;

pub trait Embedder: Send + Sync {
    /// Length of every vector this embedder produces
    fn dim(&self) -> usize;

    /// Encode `texts` in order, one vector per input.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vector>>;

    fn embed(&self, text: &str) -> Result<Vector> {
        self.embed_batch(&[text.to_string()])?
            .pop()
            .ok_or_else(|| ScoringError::Embedding("embedder returned no vector".to_string()))
    }
}

/// Embed `texts` in chunks of `batch_size`, checking count and dimension of every reply.
pub fn embed_all(embedder: &dyn Embedder, texts: &[String], batch_size: usize) -> Result<Vec<Vector>> {
    let mut vectors = Vec::with_capacity(texts.len());
    for chunk in texts.chunks(batch_size.max(1)) {
        let batch = embedder.embed_batch(chunk)?;
        if batch.len() != chunk.len() {
            return Err(ScoringError::Embedding(format!(
                "embedder returned {} vectors for {} texts",
                batch.len(),
                chunk.len()
            )));
        }
        if let Some(bad) = batch.iter().find(|v| v.dim() != embedder.dim()) {
            return Err(ScoringError::EmbeddingDimension {
                expected: embedder.dim(),
                actual: bad.dim(),
            });
        }
        vectors.extend(batch);
    }
    Ok(vectors)
}

/// Deterministic feature-hashing embedder.
///
/// Lower-cased words add 2.0 and distinct character trigrams add 1.0 at
/// their hashed position. All components are non-negative, so any two texts
/// sharing a token have positive cosine similarity.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(ScoringError::invalid("embedding_dim", "must be greater than 0"));
        }
        Ok(Self { dim })
    }

    pub fn embed_text(&self, text: &str) -> Vector {
        let mut data = vec![0.0f32; self.dim];
        let lowered = text.to_lowercase();

        for word in lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            data[self.bucket(word)] += WORD_WEIGHT;
        }
        for trigram in trigrams(&lowered) {
            data[self.bucket(&trigram)] += TRIGRAM_WEIGHT;
        }

        Vector::new(data).normalized()
    }

    fn bucket(&self, feature: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        feature.hash(&mut hasher);
        (hasher.finish() as usize) % self.dim
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self { dim: DEFAULT_HASH_DIM }
    }
}

impl Embedder for HashingEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vector>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

fn trigrams(text: &str) -> AHashSet<String> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return AHashSet::new();
    }
    let padded: Vec<char> = format!("  {}  ", collapsed).chars().collect();
    padded.windows(3).map(|w| w.iter().collect()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cosine(a: &Vector, b: &Vector) -> f32 {
        a.inner_product(b)
    }

    #[test]
    fn test_hashing_is_deterministic_and_unit() {
        let embedder = HashingEmbedder::default();
        let a = embedder.embed_text("Senior Rust engineer");
        let b = embedder.embed_text("senior rust ENGINEER");
        assert_eq!(a.dim(), DEFAULT_HASH_DIM);
        assert_eq!(a, b);
        assert!((a.norm() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_shared_words_are_similar() {
        let embedder = HashingEmbedder::new(256).unwrap();
        let job = embedder.embed_text("python backend engineer");
        let close = embedder.embed_text("python machine learning");
        let far = embedder.embed_text("zz");
        assert!(cosine(&job, &close) > 0.0);
        assert!(cosine(&job, &close) > cosine(&job, &far));
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = HashingEmbedder::new(32).unwrap();
        let v = embedder.embed_text("   ");
        assert!(v.as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_zero_dim_rejected() {
        assert!(matches!(
            HashingEmbedder::new(0),
            Err(ScoringError::InvalidConfig { field, .. }) if field == "embedding_dim"
        ));
    }

    struct ShortEmbedder;

    impl Embedder for ShortEmbedder {
        fn dim(&self) -> usize {
            4
        }

        fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vector>> {
            Ok(texts.iter().skip(1).map(|_| Vector::zeros(4)).collect())
        }
    }

    #[test]
    fn test_embed_all_checks_counts() {
        let texts = vec!["a".to_string(), "b".to_string()];
        assert!(matches!(
            embed_all(&ShortEmbedder, &texts, 8),
            Err(ScoringError::Embedding(_))
        ));
    }

    #[test]
    fn test_embed_all_batches() {
        let embedder = HashingEmbedder::new(16).unwrap();
        let texts: Vec<String> = (0..10).map(|i| format!("text {}", i)).collect();
        let vectors = embed_all(&embedder, &texts, 3).unwrap();
        assert_eq!(vectors.len(), 10);
        assert_eq!(vectors[7], embedder.embed_text("text 7"));
    }
}

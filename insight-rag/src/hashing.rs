//! Deterministic offline embeddings using the hashing trick.
//!
//! [`HashingEmbeddingProvider`] needs no model or API key: each token is
//! hashed into one of `dimensions` buckets and the term-count vector is
//! L2-normalized. Texts sharing vocabulary land close together, which is
//! enough for demos, tests, and small corpora.

use std::hash::Hasher;

use async_trait::async_trait;
use rustc_hash::{FxHashSet, FxHasher};
use unicode_normalization::UnicodeNormalization;

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "were", "will", "with",
];

/// Feature-hashing embedder with a fixed output dimension.
#[derive(Debug, Clone)]
pub struct HashingEmbeddingProvider {
    dimensions: usize,
    stop_words: FxHashSet<&'static str>,
}

impl HashingEmbeddingProvider {
    /// Create a provider producing `dimensions`-length vectors.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `dimensions == 0`.
    pub fn new(dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(RagError::ConfigError("embedding dimensions must be greater than zero".into()));
        }
        Ok(Self { dimensions, stop_words: STOP_WORDS.iter().copied().collect() })
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized = text.nfkc().collect::<String>().to_lowercase();
        normalized
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty() && !self.stop_words.contains(*token))
            .map(str::to_string)
            .collect()
    }

    fn bucket(&self, token: &str) -> usize {
        let mut hasher = FxHasher::default();
        hasher.write(token.as_bytes());
        (hasher.finish() % self.dimensions as u64) as usize
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbeddingProvider {
    fn name(&self) -> &str {
        "hashing"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimensions];
        for token in self.tokenize(text) {
            vector[self.bucket(&token)] += 1.0;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizer_normalizes_and_drops_stop_words() {
        let provider = HashingEmbeddingProvider::new(8).unwrap();
        assert_eq!(provider.tokenize("The GraphQL API, and REST!"), vec!["graphql", "api", "rest"]);
    }

    #[test]
    fn zero_dimensions_rejected() {
        assert!(matches!(HashingEmbeddingProvider::new(0), Err(RagError::ConfigError(_))));
    }

    #[tokio::test]
    async fn embeddings_are_deterministic_and_normalized() {
        let provider = HashingEmbeddingProvider::new(64).unwrap();
        let a = provider.embed("GraphQL subscriptions for dashboards").await.unwrap();
        let b = provider.embed("GraphQL subscriptions for dashboards").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn stop_word_only_text_embeds_to_zero() {
        let provider = HashingEmbeddingProvider::new(16).unwrap();
        let v = provider.embed("the and of").await.unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }
}

//! The retrieval service: query text in, ranked cited documents out.
//!
//! [`RetrievalService`] owns a [`DocumentCorpus`] and the [`VectorStore`]
//! built from it. Both come from the same ordered pass in
//! [`RetrievalService::build`], which is the only constructor, so every
//! ordinal `search` returns is a valid corpus position.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use insight_rag::{DocumentCorpus, HashingEmbeddingProvider, RetrievalConfig, RetrievalService};
//!
//! let corpus = DocumentCorpus::load(&source)?;
//! let embedder = Arc::new(HashingEmbeddingProvider::new(384)?);
//! let service = RetrievalService::build(corpus, embedder, RetrievalConfig::default()).await?;
//! let result = service.retrieve("graphql subscriptions").await?;
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::config::RetrievalConfig;
use crate::corpus::DocumentCorpus;
use crate::document::RetrievalResult;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// Read-only retrieval over a corpus built once at startup.
///
/// The service holds no mutable state, so one instance can be shared as
/// `Arc<RetrievalService>` across concurrent requests.
pub struct RetrievalService {
    corpus: DocumentCorpus,
    store: VectorStore,
    embedder: Arc<dyn EmbeddingProvider>,
    config: RetrievalConfig,
}

impl std::fmt::Debug for RetrievalService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalService")
            .field("documents", &self.corpus.len())
            .field("dimensions", &self.store.dimensions())
            .field("embedder", &self.embedder.name())
            .field("config", &self.config)
            .finish()
    }
}

impl RetrievalService {
    /// Embed every document in corpus order and build the store from the result.
    ///
    /// # Errors
    ///
    /// - [`RagError::EmptyStore`] if the corpus has no documents
    /// - [`RagError::EmbeddingFailure`] / [`RagError::Timeout`] from the embedder,
    ///   or if a vector length differs from `embedder.dimensions()`
    /// - [`RagError::CorpusMismatch`] if the embedder returned the wrong number of vectors
    /// - [`RagError::DimensionMismatch`] / [`RagError::NonFiniteVector`] from the store
    pub async fn build(
        corpus: DocumentCorpus,
        embedder: Arc<dyn EmbeddingProvider>,
        config: RetrievalConfig,
    ) -> Result<Self> {
        if corpus.is_empty() {
            error!("refusing to build retrieval service from an empty corpus");
            return Err(RagError::EmptyStore);
        }

        let texts: Vec<&str> = corpus.iter().map(|d| d.content.as_str()).collect();
        let vectors = with_timeout(
            "embedding",
            config.embedding_timeout,
            embedder.embed_batch(&texts),
        )
        .await
        .map_err(|e| {
            error!(provider = embedder.name(), error = %e, "corpus embedding failed");
            e
        })?;

        if vectors.len() != corpus.len() {
            return Err(RagError::CorpusMismatch {
                documents: corpus.len(),
                vectors: vectors.len(),
            });
        }
        for vector in &vectors {
            check_dimensions(embedder.as_ref(), embedder.dimensions(), vector.len())?;
        }

        let store = VectorStore::build(vectors)?;
        debug_assert_eq!(store.len(), corpus.len());

        info!(
            document_count = corpus.len(),
            dimensions = store.dimensions(),
            provider = embedder.name(),
            "retrieval service ready"
        );
        Ok(Self { corpus, store, embedder, config })
    }

    /// Retrieve the configured default number of documents for `query`.
    pub async fn retrieve(&self, query: &str) -> Result<RetrievalResult> {
        self.retrieve_top_k(query, self.config.top_k).await
    }

    /// Retrieve up to `k` documents nearest to `query`, ascending by distance.
    ///
    /// # Errors
    ///
    /// - [`RagError::EmptyQuery`] if `query` is blank
    /// - [`RagError::InvalidTopK`] if `k == 0`
    /// - [`RagError::EmbeddingFailure`] / [`RagError::Timeout`] from the embedder
    pub async fn retrieve_top_k(&self, query: &str, k: usize) -> Result<RetrievalResult> {
        if query.trim().is_empty() {
            return Err(RagError::EmptyQuery);
        }
        if k == 0 {
            return Err(RagError::InvalidTopK { k });
        }

        debug!(provider = self.embedder.name(), query_len = query.len(), k, "embedding query");
        let embedding =
            with_timeout("embedding", self.config.embedding_timeout, self.embedder.embed(query))
                .await
                .map_err(|e| {
                    error!(provider = self.embedder.name(), error = %e, "query embedding failed");
                    e
                })?;
        check_dimensions(self.embedder.as_ref(), self.store.dimensions(), embedding.len())?;

        let neighbors = self.store.search(&embedding, k)?;
        let mut ranked = Vec::with_capacity(neighbors.len());
        for neighbor in neighbors {
            ranked.push((self.corpus.get(neighbor.ordinal)?.clone(), neighbor.distance));
        }

        info!(result_count = ranked.len(), k, "retrieval completed");
        Ok(RetrievalResult::from_ranked(ranked))
    }

    pub fn corpus(&self) -> &DocumentCorpus {
        &self.corpus
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }
}

/// Await `future`, failing with [`RagError::Timeout`] once `limit` elapses.
pub(crate) async fn with_timeout<T>(
    operation: &'static str,
    limit: Duration,
    future: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(limit, future)
        .await
        .map_err(|_| RagError::Timeout { operation, timeout: limit })?
}

fn check_dimensions(embedder: &dyn EmbeddingProvider, expected: usize, actual: usize) -> Result<()> {
    if actual != expected {
        error!(provider = embedder.name(), expected, actual, "embedding has unexpected length");
        return Err(RagError::EmbeddingFailure {
            provider: embedder.name().to_string(),
            message: format!("expected a {expected}-dimensional vector, got {actual}"),
        });
    }
    Ok(())
}

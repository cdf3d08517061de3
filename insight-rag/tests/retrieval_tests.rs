//! Integration tests for corpus loading and the retrieval service.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use insight_rag::{
    DirectorySource, Document, DocumentCorpus, EmbeddingProvider, ErrorKind, ErrorResponse,
    HashingEmbeddingProvider, InMemorySource, RagError, Result, RetrievalConfig, RetrievalService,
    seed_documents,
};

/// Looks each text up in a fixed table; unknown text is an embedding failure.
struct TableEmbedder {
    table: HashMap<String, Vec<f32>>,
    dimensions: usize,
}

impl TableEmbedder {
    fn new(entries: Vec<(&str, Vec<f32>)>) -> Self {
        let dimensions = entries.first().map(|(_, v)| v.len()).unwrap_or(0);
        let table = entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        Self { table, dimensions }
    }
}

#[async_trait]
impl EmbeddingProvider for TableEmbedder {
    fn name(&self) -> &str {
        "table"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.table.get(text).cloned().ok_or_else(|| RagError::EmbeddingFailure {
            provider: "table".into(),
            message: format!("no vector for '{text}'"),
        })
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Never answers.
struct StalledEmbedder;

#[async_trait]
impl EmbeddingProvider for StalledEmbedder {
    fn name(&self) -> &str {
        "stalled"
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(vec![0.0])
    }

    fn dimensions(&self) -> usize {
        1
    }
}

/// Answers the corpus batch with fixed vectors; query embedding never answers.
struct BatchOnlyEmbedder {
    batch: Vec<Vec<f32>>,
    dimensions: usize,
}

#[async_trait]
impl EmbeddingProvider for BatchOnlyEmbedder {
    fn name(&self) -> &str {
        "batch-only"
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(vec![0.0; self.dimensions])
    }

    async fn embed_batch(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(self.batch.clone())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

fn two_docs() -> DocumentCorpus {
    DocumentCorpus::from_documents(vec![
        Document::new("a", "A", "alpha"),
        Document::new("b", "B", "beta"),
    ])
    .unwrap()
}

fn three_docs() -> DocumentCorpus {
    DocumentCorpus::from_documents(vec![
        Document::new("origin", "Origin", "c0"),
        Document::new("east", "East", "c1"),
        Document::new("far", "Far", "c2"),
    ])
    .unwrap()
}

fn three_doc_embedder() -> Arc<TableEmbedder> {
    Arc::new(TableEmbedder::new(vec![
        ("c0", vec![0.0, 0.0]),
        ("c1", vec![1.0, 0.0]),
        ("c2", vec![5.0, 5.0]),
        ("north", vec![0.0, 1.0]),
        ("cube", vec![0.0, 1.0, 2.0]),
    ]))
}

async fn three_doc_service() -> RetrievalService {
    RetrievalService::build(three_docs(), three_doc_embedder(), RetrievalConfig::default())
        .await
        .unwrap()
}

#[tokio::test]
async fn nearest_two_documents_with_distances() {
    let service = three_doc_service().await;
    let result = service.retrieve_top_k("north", 2).await.unwrap();

    assert_eq!(result.ids(), vec!["origin", "east"]);
    assert_eq!(result.distances(), &[1.0, 2.0]);
}

#[tokio::test]
async fn k_beyond_corpus_returns_everything() {
    let service = three_doc_service().await;
    let result = service.retrieve_top_k("north", 10).await.unwrap();

    assert_eq!(result.ids(), vec!["origin", "east", "far"]);
    assert_eq!(result.distances(), &[1.0, 2.0, 41.0]);
}

#[tokio::test]
async fn default_k_is_three() {
    let embedder = Arc::new(TableEmbedder::new(vec![
        ("a", vec![0.0]),
        ("b", vec![1.0]),
        ("c", vec![2.0]),
        ("d", vec![3.0]),
    ]));
    let corpus = DocumentCorpus::from_documents(
        ["a", "b", "c", "d"].iter().map(|c| Document::new(*c, *c, *c)).collect(),
    )
    .unwrap();
    let service =
        RetrievalService::build(corpus, embedder, RetrievalConfig::default()).await.unwrap();

    assert_eq!(service.retrieve("d").await.unwrap().ids(), vec!["d", "c", "b"]);
}

#[tokio::test]
async fn wrong_length_query_embedding_is_an_embedding_failure() {
    let service = three_doc_service().await;
    let err = service.retrieve("cube").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::EmbeddingFailure);
    assert!(err.to_string().contains("expected a 2-dimensional vector, got 3"));
}

#[tokio::test]
async fn identical_content_ranks_by_ordinal() {
    let corpus = DocumentCorpus::from_documents(vec![
        Document::new("x", "X", "elsewhere"),
        Document::new("first", "Copy 1", "same"),
        Document::new("second", "Copy 2", "same"),
    ])
    .unwrap();
    let embedder = Arc::new(TableEmbedder::new(vec![
        ("elsewhere", vec![9.0, 9.0]),
        ("same", vec![1.0, 1.0]),
    ]));
    let service =
        RetrievalService::build(corpus, embedder, RetrievalConfig::default()).await.unwrap();

    let result = service.retrieve_top_k("same", 2).await.unwrap();
    assert_eq!(result.ids(), vec!["first", "second"]);
    assert_eq!(result.distances(), &[0.0, 0.0]);
}

#[tokio::test]
async fn stored_vectors_correspond_to_document_contents() {
    let service = three_doc_service().await;
    let embedder = three_doc_embedder();

    for (ordinal, document) in service.corpus().iter().enumerate() {
        let expected = embedder.embed(&document.content).await.unwrap();
        assert_eq!(service.store().vector(ordinal).unwrap(), expected.as_slice());
    }
}

#[tokio::test]
async fn bootstrap_then_retrieve_returns_seed_documents() {
    let temp = tempfile::tempdir().unwrap();
    let source = DirectorySource::new(temp.path().join("data"));

    assert!(DocumentCorpus::bootstrap_defaults(&source).unwrap());
    let corpus = DocumentCorpus::load(&source).unwrap();
    assert_eq!(corpus.documents(), seed_documents().as_slice());

    let embedder = Arc::new(HashingEmbeddingProvider::new(384).unwrap());
    let service =
        RetrievalService::build(corpus, embedder, RetrievalConfig::default()).await.unwrap();

    let seed = seed_documents();
    let result = service.retrieve(&seed[6].content).await.unwrap();
    assert_eq!(result.len(), 3);
    assert_eq!(result.documents()[0].id, "doc_07");
    assert!(result.distances()[0].abs() < 1e-6);
    assert!(result.distances().windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn repeated_queries_are_deterministic() {
    let source = InMemorySource::with_documents(seed_documents());
    let corpus = DocumentCorpus::load(&source).unwrap();
    let embedder = Arc::new(HashingEmbeddingProvider::new(128).unwrap());
    let service =
        RetrievalService::build(corpus, embedder, RetrievalConfig::default()).await.unwrap();

    let first = service.retrieve("enterprise graphql performance").await.unwrap();
    let second = service.retrieve("enterprise graphql performance").await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_reads_share_one_service() {
    let service = Arc::new(three_doc_service().await);

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.retrieve_top_k("north", 2).await })
        })
        .collect();

    for handle in handles {
        let result = handle.await.unwrap().unwrap();
        assert_eq!(result.ids(), vec!["origin", "east"]);
    }
}

#[tokio::test]
async fn empty_corpus_fails_at_construction() {
    let corpus = DocumentCorpus::load(&InMemorySource::new()).unwrap();
    let err = RetrievalService::build(corpus, three_doc_embedder(), RetrievalConfig::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::EmptyStoreError);
}

#[tokio::test]
async fn corpus_embedding_failure_propagates() {
    let corpus =
        DocumentCorpus::from_documents(vec![Document::new("u", "Unknown", "not in table")]).unwrap();
    let err = RetrievalService::build(corpus, three_doc_embedder(), RetrievalConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(err, RagError::EmbeddingFailure { ref provider, .. } if provider == "table"));
    assert!(err.is_transient());
}

#[tokio::test(start_paused = true)]
async fn stalled_embedder_times_out() {
    let config =
        RetrievalConfig::builder().embedding_timeout(Duration::from_millis(250)).build().unwrap();
    let err = RetrievalService::build(three_docs(), Arc::new(StalledEmbedder), config)
        .await
        .unwrap_err();

    assert!(matches!(err, RagError::Timeout { operation: "embedding", .. }));
    assert_eq!(ErrorResponse::from(&err).kind, ErrorKind::Timeout);
}

#[tokio::test(start_paused = true)]
async fn stalled_query_embedding_times_out() {
    let embedder =
        Arc::new(BatchOnlyEmbedder { batch: vec![vec![0.0, 0.0], vec![1.0, 0.0]], dimensions: 2 });
    let config =
        RetrievalConfig::builder().embedding_timeout(Duration::from_millis(250)).build().unwrap();
    let service = RetrievalService::build(two_docs(), embedder, config).await.unwrap();

    let err = service.retrieve("anything").await.unwrap_err();
    assert!(matches!(err, RagError::Timeout { operation: "embedding", .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn fewer_vectors_than_documents_is_a_corpus_mismatch() {
    let embedder = Arc::new(BatchOnlyEmbedder { batch: vec![vec![0.0]], dimensions: 1 });
    let err = RetrievalService::build(two_docs(), embedder, RetrievalConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(err, RagError::CorpusMismatch { documents: 2, vectors: 1 }));
    assert_eq!(ErrorResponse::from(&err).kind, ErrorKind::CorpusMismatch);
}

#[tokio::test]
async fn corpus_vector_of_undeclared_length_is_an_embedding_failure() {
    let embedder = Arc::new(BatchOnlyEmbedder {
        batch: vec![vec![0.0, 0.0, 0.0], vec![1.0, 0.0, 0.0]],
        dimensions: 2,
    });
    let err = RetrievalService::build(two_docs(), embedder, RetrievalConfig::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::EmbeddingFailure);
    assert!(err.to_string().contains("expected a 2-dimensional vector, got 3"));
}

#[tokio::test]
async fn blank_query_is_rejected_before_embedding() {
    let service = three_doc_service().await;
    let err = service.retrieve("").await.unwrap_err();
    assert_eq!(ErrorResponse::from(&err).kind, ErrorKind::EmptyQuery);
}

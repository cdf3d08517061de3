//! Error types for the `insight-rag` crate.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while building or querying the retrieval core.
#[derive(Debug, Error)]
pub enum RagError {
    /// The query string was empty or whitespace only.
    #[error("query must not be empty")]
    EmptyQuery,

    /// The requested number of results was zero.
    #[error("k must be at least 1, got {k}")]
    InvalidTopK {
        /// The rejected value.
        k: usize,
    },

    /// A vector did not have the dimension fixed for the store.
    #[error("dimension mismatch{}: expected {expected}, got {actual}", fmt_ordinal(*ordinal))]
    DimensionMismatch {
        /// The dimension the store was built with.
        expected: usize,
        /// The dimension of the offending vector.
        actual: usize,
        /// Ordinal of the offending stored vector, `None` for a query vector.
        ordinal: Option<usize>,
    },

    /// A vector contained a NaN or infinite component.
    #[error("non-finite component at position {position}{}", fmt_ordinal(*ordinal))]
    NonFiniteVector {
        /// Ordinal of the offending stored vector, `None` for a query vector.
        ordinal: Option<usize>,
        /// Index of the offending component.
        position: usize,
    },

    /// A store was built from zero vectors.
    #[error("vector store cannot be built from zero vectors")]
    EmptyStore,

    /// The embedding collaborator failed or returned an unusable vector.
    #[error("embedding failure ({provider}): {message}")]
    EmbeddingFailure {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An ordinal was outside `0..size`.
    #[error("ordinal {ordinal} out of range for corpus of {size} documents")]
    IndexOutOfRange {
        /// The requested ordinal.
        ordinal: usize,
        /// The corpus size.
        size: usize,
    },

    /// The document source was unreadable or held a malformed record.
    #[error("failed to load corpus from {source_name}: {message}")]
    CorpusLoad {
        /// Description of the source (directory, file, or backend name).
        source_name: String,
        /// A description of the failure.
        message: String,
    },

    /// Two documents in the same corpus share an id.
    #[error("duplicate document id '{id}'")]
    DuplicateDocumentId {
        /// The repeated id.
        id: String,
    },

    /// The embedder returned a different number of vectors than documents.
    #[error("corpus has {documents} documents but {vectors} vectors were produced")]
    CorpusMismatch {
        /// Number of documents in the corpus.
        documents: usize,
        /// Number of vectors produced for them.
        vectors: usize,
    },

    /// A collaborator call exceeded its configured limit.
    #[error("{operation} timed out after {}ms", timeout.as_millis())]
    Timeout {
        /// The operation that timed out.
        operation: &'static str,
        /// The configured limit.
        timeout: Duration,
    },

    /// The answer-generation collaborator failed.
    #[error("generation failure ({provider}): {message}")]
    GenerationFailure {
        /// The generator that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

fn fmt_ordinal(ordinal: Option<usize>) -> String {
    ordinal.map(|o| format!(" at ordinal {o}")).unwrap_or_default()
}

/// Caller-facing classification of a [`RagError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// The query was blank.
    EmptyQuery,
    /// `k` was zero.
    InvalidTopK,
    /// A stored or query vector had the wrong length.
    DimensionMismatch,
    /// A stored or query vector had a NaN or infinite component.
    InvalidVector,
    /// A store was built from zero vectors.
    EmptyStoreError,
    /// The embedding collaborator failed.
    EmbeddingFailure,
    /// An ordinal was outside the corpus.
    IndexOutOfRange,
    /// The document source was unreadable or malformed.
    CorpusLoadError,
    /// Document and vector counts differ.
    CorpusMismatch,
    /// A collaborator call exceeded its limit.
    Timeout,
    /// The answer-generation collaborator failed.
    GenerationFailure,
    /// Invalid configuration.
    ConfigError,
}

impl RagError {
    /// Return the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyQuery => ErrorKind::EmptyQuery,
            Self::InvalidTopK { .. } => ErrorKind::InvalidTopK,
            Self::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            Self::NonFiniteVector { .. } => ErrorKind::InvalidVector,
            Self::EmptyStore => ErrorKind::EmptyStoreError,
            Self::EmbeddingFailure { .. } => ErrorKind::EmbeddingFailure,
            Self::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            Self::CorpusLoad { .. } | Self::DuplicateDocumentId { .. } => {
                ErrorKind::CorpusLoadError
            }
            Self::CorpusMismatch { .. } => ErrorKind::CorpusMismatch,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::GenerationFailure { .. } => ErrorKind::GenerationFailure,
            Self::ConfigError(_) => ErrorKind::ConfigError,
        }
    }

    /// Whether the failure came from a collaborator and may succeed on retry.
    ///
    /// The core never retries; this is a hint for the calling layer.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::EmbeddingFailure { .. } | Self::Timeout { .. } | Self::GenerationFailure { .. }
        )
    }

    pub(crate) fn corpus_load(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CorpusLoad { source_name: source_name.into(), message: message.into() }
    }
}

/// Uniform structured failure handed to outer layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    /// Classification of the failure.
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
}

impl From<&RagError> for ErrorResponse {
    fn from(err: &RagError) -> Self {
        Self { kind: err.kind(), message: err.to_string() }
    }
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;

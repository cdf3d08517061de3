//! Exact vector retrieval for the Insight question-answering engine.
//!
//! This crate provides:
//! - An ordered [`DocumentCorpus`] loaded from a [`DocumentSource`], with a
//!   built-in seed set for first runs
//! - [`VectorStore`], an exact flat L2 nearest-neighbor index
//! - [`RetrievalService`], which embeds a query and returns ranked documents
//! - [`InsightEngine`], which turns retrieved documents into a cited [`Answer`]
//!
//! Embedding and answer generation are pluggable through
//! [`EmbeddingProvider`] and [`AnswerGenerator`]. OpenAI-backed
//! implementations live behind the `openai` feature.

pub mod answer;
pub mod config;
pub mod corpus;
pub mod document;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod hashing;
pub mod retrieval;
pub mod seed;
pub mod source;
pub mod vectorstore;

#[cfg(feature = "openai")]
pub mod openai;

pub use answer::{Answer, AnswerGenerator, build_prompt};
pub use config::{RetrievalConfig, RetrievalConfigBuilder};
pub use corpus::DocumentCorpus;
pub use document::{Document, Neighbor, RetrievalResult};
pub use embedding::EmbeddingProvider;
pub use engine::InsightEngine;
pub use error::{ErrorKind, ErrorResponse, RagError, Result};
pub use hashing::HashingEmbeddingProvider;
pub use retrieval::RetrievalService;
pub use seed::seed_documents;
pub use source::{DirectorySource, DocumentSource, InMemorySource};
pub use vectorstore::VectorStore;

#[cfg(feature = "openai")]
pub use openai::{OpenAIAnswerGenerator, OpenAIEmbeddingProvider};

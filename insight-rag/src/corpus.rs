//! The ordered document collection that vector ordinals refer to.

use rustc_hash::FxHashSet;
use tracing::{info, warn};

use crate::document::Document;
use crate::error::{RagError, Result};
use crate::seed::seed_documents;
use crate::source::DocumentSource;

/// An immutable, ordered collection of documents with unique ids.
///
/// Position `i` in the corpus is the ordinal of the vector built from
/// `documents[i].content`.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentCorpus {
    documents: Vec<Document>,
}

impl DocumentCorpus {
    /// Build a corpus from documents in their canonical order.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DuplicateDocumentId`] if two documents share an id.
    pub fn from_documents(documents: Vec<Document>) -> Result<Self> {
        let mut seen = FxHashSet::default();
        for document in &documents {
            if !seen.insert(document.id.as_str()) {
                return Err(RagError::DuplicateDocumentId { id: document.id.clone() });
            }
        }
        Ok(Self { documents })
    }

    /// Read every document from `source`, keeping the source's order.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::CorpusLoad`] if the source is unreadable or holds a
    /// malformed record, and [`RagError::DuplicateDocumentId`] on repeated ids.
    pub fn load(source: &dyn DocumentSource) -> Result<Self> {
        let corpus = Self::from_documents(source.read_documents()?)?;
        info!(source = %source.describe(), document_count = corpus.len(), "loaded corpus");
        Ok(corpus)
    }

    /// Write the built-in seed set into `source` if it holds no documents.
    ///
    /// Returns `true` when the seed set was written.
    pub fn bootstrap_defaults(source: &dyn DocumentSource) -> Result<bool> {
        if !source.is_empty()? {
            return Ok(false);
        }
        let seed = seed_documents();
        warn!(source = %source.describe(), seeded = seed.len(), "storage empty, writing seed documents");
        source.write_documents(&seed)?;
        Ok(true)
    }

    /// Return the document at `ordinal`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::IndexOutOfRange`] unless `ordinal < len()`.
    pub fn get(&self, ordinal: usize) -> Result<&Document> {
        self.documents
            .get(ordinal)
            .ok_or(RagError::IndexOutOfRange { ordinal, size: self.documents.len() })
    }

    /// Ordinal of the document with the given id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.documents.iter().position(|d| d.id == id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }
}

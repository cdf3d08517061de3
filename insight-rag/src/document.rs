//! Data types for documents, neighbors, and retrieval results.

use serde::{Deserialize, Serialize};

/// A corpus document.
///
/// `content` is the text that gets embedded; once a document is part of a
/// built [`RetrievalService`](crate::RetrievalService) it is never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    /// Unique identifier, used for citations.
    pub id: String,
    /// Descriptive label. Not used for scoring.
    pub title: String,
    /// The text that is embedded and may be cited.
    pub content: String,
}

impl Document {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self { id: id.into(), title: title.into(), content: content.into() }
    }
}

/// A stored vector's ordinal paired with its squared Euclidean distance to a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the stored vector, and of its document in the corpus.
    pub ordinal: usize,
    /// Squared Euclidean distance to the query.
    pub distance: f32,
}

/// Ranked documents with their distances, ascending by distance.
///
/// `documents` and `distances` always have the same length and order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RetrievalResult {
    documents: Vec<Document>,
    distances: Vec<f32>,
}

impl RetrievalResult {
    pub(crate) fn from_ranked(ranked: Vec<(Document, f32)>) -> Self {
        let (documents, distances) = ranked.into_iter().unzip();
        Self { documents, distances }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn distances(&self) -> &[f32] {
        &self.distances
    }

    /// Ids of the ranked documents, in rank order.
    pub fn ids(&self) -> Vec<&str> {
        self.documents.iter().map(|d| d.id.as_str()).collect()
    }

    /// Iterate `(document, distance)` pairs in rank order.
    pub fn iter(&self) -> impl Iterator<Item = (&Document, f32)> {
        self.documents.iter().zip(self.distances.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn into_documents(self) -> Vec<Document> {
        self.documents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_parallel_lists() {
        let result = RetrievalResult::from_ranked(vec![
            (Document::new("a", "A", "alpha"), 0.5),
            (Document::new("b", "B", "beta"), 1.5),
        ]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["documents"][1]["id"], "b");
        assert_eq!(json["distances"], serde_json::json!([0.5, 1.5]));
        assert_eq!(result.ids(), vec!["a", "b"]);
    }

    #[test]
    fn document_requires_all_fields() {
        let missing_title = r#"{"id":"x","content":"y"}"#;
        assert!(serde_json::from_str::<Document>(missing_title).is_err());
    }
}

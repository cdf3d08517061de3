//! Answer generation from retrieved documents.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::Result;

/// System instruction for grounded, cited answers.
pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant that provides accurate, \
source-cited answers based only on the given context.";

/// A remote or local text generator that answers a query from passages.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Short generator name used in logs and errors.
    fn name(&self) -> &str;

    /// Compose an answer to `query` using only `documents`.
    async fn generate(&self, query: &str, documents: &[Document]) -> Result<String>;
}

/// A generated answer with the ids of the documents it was grounded on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    /// Document ids in retrieval rank order.
    pub sources: Vec<String>,
}

/// Build the grounding prompt for `query` over `documents`.
pub fn build_prompt(query: &str, documents: &[Document]) -> String {
    let context = documents
        .iter()
        .map(|doc| format!("Document {}: {}", doc.id, doc.content))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Based ONLY on the following documents, provide a structured answer to the query.\n\
         Do not make up any information that is not in the documents.\n\
         Format the response with bullet points and include source citations [Source: doc_id].\n\
         \n\
         Documents:\n\
         {context}\n\
         \n\
         Query: {query}\n\
         \n\
         Answer:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_documents_in_order() {
        let docs = vec![Document::new("d1", "One", "first"), Document::new("d2", "Two", "second")];
        let prompt = build_prompt("what?", &docs);

        let first = prompt.find("Document d1: first").unwrap();
        let second = prompt.find("Document d2: second").unwrap();
        assert!(first < second);
        assert!(prompt.contains("[Source: doc_id]"));
        assert!(prompt.ends_with("Query: what?\n\nAnswer:"));
    }
}

//! Question answering: retrieve, then generate a cited answer.

use std::sync::Arc;

use tracing::{error, info};

use crate::answer::{Answer, AnswerGenerator};
use crate::error::Result;
use crate::retrieval::{RetrievalService, with_timeout};

/// Composes a [`RetrievalService`] with an [`AnswerGenerator`].
///
/// Requests are all-or-nothing: any retrieval or generation failure is
/// returned as-is and no partial answer is produced.
pub struct InsightEngine {
    retrieval: Arc<RetrievalService>,
    generator: Arc<dyn AnswerGenerator>,
}

impl InsightEngine {
    pub fn new(retrieval: Arc<RetrievalService>, generator: Arc<dyn AnswerGenerator>) -> Self {
        Self { retrieval, generator }
    }

    pub fn retrieval(&self) -> &Arc<RetrievalService> {
        &self.retrieval
    }

    /// Answer `query` from the default number of retrieved documents.
    pub async fn ask(&self, query: &str) -> Result<Answer> {
        let result = self.retrieval.retrieve(query).await?;
        let sources: Vec<String> = result.ids().into_iter().map(str::to_string).collect();

        let limit = self.retrieval.config().generation_timeout;
        let generation = self.generator.generate(query, result.documents());
        let answer = with_timeout("generation", limit, generation).await.map_err(|e| {
            error!(generator = self.generator.name(), error = %e, "answer generation failed");
            e
        })?;

        info!(generator = self.generator.name(), source_count = sources.len(), "answered query");
        Ok(Answer { answer, sources })
    }
}

//! Read path: question -> embedding -> nearest chunks -> model answer

use std::sync::Arc;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, LlmProvider};
use crate::retrieval::VectorIndex;

use super::prompt::PromptBuilder;

/// Answer returned without calling the model when nothing was retrieved
pub const NOT_FOUND_ANSWER: &str = "Not found in document";

/// Orchestrates retrieval and generation for a single question
#[derive(Clone)]
pub struct Answerer {
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    index: Arc<VectorIndex>,
    top_k: usize,
}

impl Answerer {
    /// Create a new answerer
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        index: Arc<VectorIndex>,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            llm,
            index,
            top_k,
        }
    }

    /// Retrieve the chunks nearest to `question`, nearest first
    pub async fn retrieve(&self, question: &str) -> Result<Vec<String>> {
        let query = self.embedder.embed(question).await?;
        if query.len() != self.index.dimensions() {
            return Err(Error::remote(format!(
                "{} returned a {}-dimensional question embedding, index expects {}",
                self.embedder.name(),
                query.len(),
                self.index.dimensions()
            )));
        }

        // The scan is O(n*d); keep it off the async workers
        let index = Arc::clone(&self.index);
        let top_k = self.top_k;
        tokio::task::spawn_blocking(move || index.search(&query, top_k))
            .await
            .map_err(|e| Error::Internal(format!("Task join error: {}", e)))?
    }

    /// Answer a question from the indexed chunks
    pub async fn answer(&self, question: &str) -> Result<String> {
        let start = Instant::now();

        tracing::info!("Question: \"{}\"", question);

        let chunks = self.retrieve(question).await?;
        if chunks.is_empty() {
            tracing::info!("Index is empty, skipping generation");
            return Ok(NOT_FOUND_ANSWER.to_string());
        }

        let context = PromptBuilder::build_context(&chunks);
        let prompt = PromptBuilder::build_qa_prompt(&context, question);

        let answer = self.llm.generate(&prompt).await?;

        tracing::info!(
            "Answered with {} chunks via {} ({}) in {}ms",
            chunks.len(),
            self.llm.name(),
            self.llm.model(),
            start.elapsed().as_millis()
        );

        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingEmbedder, FailingLlm, StubEmbedder, StubLlm};

    fn seeded_index() -> Arc<VectorIndex> {
        let index = Arc::new(VectorIndex::new(StubEmbedder::DIMENSIONS));
        index
            .insert(
                vec![
                    StubEmbedder::axis(0),
                    StubEmbedder::axis(1),
                    StubEmbedder::axis(2),
                    StubEmbedder::axis(3),
                ],
                vec![
                    "alpha chunk".to_string(),
                    "beta chunk".to_string(),
                    "gamma chunk".to_string(),
                    "delta chunk".to_string(),
                ],
            )
            .unwrap();
        index
    }

    #[tokio::test]
    async fn test_answer_uses_nearest_chunks() {
        let embedder = StubEmbedder::new().with_vector("what about beta?", {
            let mut v = StubEmbedder::axis(1);
            v[2] = 0.5;
            v[0] = 0.25;
            v
        });
        let llm = Arc::new(StubLlm::new("beta it is"));
        let answerer = Answerer::new(Arc::new(embedder), llm.clone(), seeded_index(), 2);

        let answer = answerer.answer("what about beta?").await.unwrap();

        assert_eq!(answer, "beta it is");
        let prompt = llm.last_prompt().unwrap();
        assert!(prompt.contains("Context:\nbeta chunk\ngamma chunk\n"));
        assert!(prompt.contains("Question:\nwhat about beta?"));
        assert!(!prompt.contains("delta chunk"));
    }

    #[tokio::test]
    async fn test_retrieve_defaults_to_top_three() {
        let embedder = StubEmbedder::new().with_vector("q", StubEmbedder::axis(3));
        let answerer = Answerer::new(
            Arc::new(embedder),
            Arc::new(StubLlm::new("unused")),
            seeded_index(),
            crate::config::RetrievalConfig::default().top_k,
        );

        let chunks = answerer.retrieve("q").await.unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], "delta chunk");
    }

    #[tokio::test]
    async fn test_empty_index_skips_model() {
        let llm = Arc::new(FailingLlm::remote());
        let answerer = Answerer::new(
            Arc::new(StubEmbedder::new()),
            llm,
            Arc::new(VectorIndex::new(StubEmbedder::DIMENSIONS)),
            3,
        );

        let answer = answerer.answer("anything?").await.unwrap();
        assert_eq!(answer, NOT_FOUND_ANSWER);
    }

    #[tokio::test]
    async fn test_embedding_quota_propagates() {
        let answerer = Answerer::new(
            Arc::new(FailingEmbedder::quota()),
            Arc::new(StubLlm::new("unused")),
            seeded_index(),
            3,
        );

        let err = answerer.answer("q").await.unwrap_err();
        assert!(err.is_quota_exceeded());
    }

    #[tokio::test]
    async fn test_generation_failure_propagates() {
        let answerer = Answerer::new(
            Arc::new(StubEmbedder::new()),
            Arc::new(FailingLlm::remote()),
            seeded_index(),
            3,
        );

        let err = answerer.answer("q").await.unwrap_err();
        assert!(matches!(err, Error::RemoteService(_)));
    }

    #[tokio::test]
    async fn test_mismatched_question_embedding_is_remote_error() {
        let embedder = StubEmbedder::new().with_vector("hi", vec![1.0; 6]);
        let llm = Arc::new(StubLlm::new("unused"));
        let answerer = Answerer::new(Arc::new(embedder), llm.clone(), seeded_index(), 3);

        let err = answerer.answer("hi").await.unwrap_err();

        assert!(matches!(err, Error::RemoteService(_)));
        assert!(llm.last_prompt().is_none());
    }
}

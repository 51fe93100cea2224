//! Application state for the RAG server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::generation::Answerer;
use crate::ingestion::{IngestPipeline, PdfExtractor, TextChunker, TextExtractor};
use crate::providers::openai::OpenAiClient;
use crate::providers::{EmbeddingProvider, LlmProvider, OpenAiEmbedder, OpenAiLlm};
use crate::retrieval::VectorIndex;
use crate::storage::UploadStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// In-memory vector index (lost on restart)
    index: Arc<VectorIndex>,
    /// Write path
    pipeline: IngestPipeline,
    /// Read path
    answerer: Answerer,
    /// Upload persistence
    uploads: UploadStore,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create application state backed by the OpenAI-compatible API
    pub fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing RAG application state...");

        let client = Arc::new(OpenAiClient::new(&config.llm)?);
        let embedder = Arc::new(OpenAiEmbedder::new(Arc::clone(&client), &config.embeddings));
        let llm = Arc::new(OpenAiLlm::new(client, &config.llm));
        tracing::info!(
            "OpenAI client initialized ({} for embeddings, {} for answers)",
            config.embeddings.model,
            config.llm.generate_model
        );

        Ok(Self::with_providers(
            config,
            Arc::new(PdfExtractor),
            embedder,
            llm,
        ))
    }

    /// Create application state from explicit providers
    pub fn with_providers(
        config: RagConfig,
        extractor: Arc<dyn TextExtractor>,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        let index = Arc::new(VectorIndex::new(embedder.dimensions()));
        tracing::info!("Vector index initialized ({} dimensions)", index.dimensions());

        let chunker = TextChunker::new(config.chunking.chunk_size, config.chunking.chunk_overlap);
        let pipeline = IngestPipeline::new(
            extractor,
            chunker,
            Arc::clone(&embedder),
            Arc::clone(&index),
        );
        let answerer = Answerer::new(embedder, llm, Arc::clone(&index), config.retrieval.top_k);
        let uploads = UploadStore::new(config.uploads.upload_dir.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                index,
                pipeline,
                answerer,
                uploads,
                ready: RwLock::new(true),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get vector index
    pub fn index(&self) -> &VectorIndex {
        &self.inner.index
    }

    /// Get ingestion pipeline
    pub fn pipeline(&self) -> &IngestPipeline {
        &self.inner.pipeline
    }

    /// Get answerer
    pub fn answerer(&self) -> &Answerer {
        &self.inner.answerer
    }

    /// Get upload store
    pub fn uploads(&self) -> &UploadStore {
        &self.inner.uploads
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}

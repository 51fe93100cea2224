//! Ingestion pipeline orchestration

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::retrieval::VectorIndex;

use super::chunker::TextChunker;
use super::parser::TextExtractor;

/// Upper bound for a single text extraction
const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(60);

/// Write path: document bytes -> text -> chunks -> embeddings -> index
#[derive(Clone)]
pub struct IngestPipeline {
    extractor: Arc<dyn TextExtractor>,
    chunker: TextChunker,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<VectorIndex>,
}

impl IngestPipeline {
    /// Create a new ingestion pipeline
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        chunker: TextChunker,
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<VectorIndex>,
    ) -> Self {
        Self {
            extractor,
            chunker,
            embedder,
            index,
        }
    }

    /// Extract and chunk text on the blocking pool, bounded by a timeout.
    /// Returns the extracted character count and the chunks.
    pub async fn extract_chunks(&self, data: Vec<u8>) -> Result<(usize, Vec<String>)> {
        let extractor = Arc::clone(&self.extractor);
        let chunker = self.chunker.clone();
        let task = tokio::task::spawn_blocking(move || {
            let text = extractor.extract(&data)?;
            Ok::<_, Error>((text.chars().count(), chunker.chunk(&text)))
        });

        match tokio::time::timeout(EXTRACTION_TIMEOUT, task).await {
            Ok(joined) => {
                joined.map_err(|e| Error::Extraction(format!("extraction task failed: {}", e)))?
            }
            Err(_) => Err(Error::Extraction(format!(
                "text extraction timed out after {}s",
                EXTRACTION_TIMEOUT.as_secs()
            ))),
        }
    }

    /// Full ingestion. Returns the number of chunks indexed.
    ///
    /// Chunks are inserted only after every embedding succeeded, so a failed
    /// call never leaves a partial document in the index.
    pub async fn ingest(&self, data: Vec<u8>) -> Result<usize> {
        let start = Instant::now();

        let (char_count, chunks) = self.extract_chunks(data).await?;

        tracing::info!(
            "Extracted {} characters into {} chunks with {}",
            char_count,
            chunks.len(),
            self.extractor.name()
        );

        if chunks.is_empty() {
            return Ok(0);
        }

        let embeddings = self.embedder.embed_batch(&chunks).await?;
        let chunk_count = chunks.len();
        self.index.insert(embeddings, chunks)?;

        tracing::info!(
            "Indexed {} chunks in {}ms ({} total)",
            chunk_count,
            start.elapsed().as_millis(),
            self.index.count()
        );

        Ok(chunk_count)
    }
}

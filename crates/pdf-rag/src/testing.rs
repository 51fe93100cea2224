//! Stub providers shared by unit tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Error, Result};
use crate::ingestion::TextExtractor;
use crate::providers::{EmbeddingProvider, LlmProvider};

/// Extractor that ignores its input and returns fixed text
pub struct StaticExtractor {
    text: String,
}

impl StaticExtractor {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl TextExtractor for StaticExtractor {
    fn extract(&self, _data: &[u8]) -> Result<String> {
        Ok(self.text.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Deterministic embedder: fixed vectors for known texts, a letter
/// histogram for everything else
#[derive(Default)]
pub struct StubEmbedder {
    fixed: HashMap<String, Vec<f32>>,
    calls: AtomicUsize,
}

impl StubEmbedder {
    pub const DIMENSIONS: usize = 8;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vector(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.fixed.insert(text.to_string(), vector);
        self
    }

    /// Unit vector along `axis`
    pub fn axis(axis: usize) -> Vec<f32> {
        let mut v = vec![0.0; Self::DIMENSIONS];
        v[axis] = 1.0;
        v
    }

    /// Number of `embed_batch` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn histogram(text: &str) -> Vec<f32> {
        let mut v = vec![0.0; Self::DIMENSIONS];
        for c in text.chars().filter(|c| c.is_alphanumeric()) {
            v[(c as usize) % Self::DIMENSIONS] += 1.0;
        }
        v
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|t| {
                self.fixed
                    .get(t)
                    .cloned()
                    .unwrap_or_else(|| Self::histogram(t))
            })
            .collect())
    }

    fn dimensions(&self) -> usize {
        Self::DIMENSIONS
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Embedder that always fails
pub struct FailingEmbedder {
    quota: bool,
}

impl FailingEmbedder {
    pub fn quota() -> Self {
        Self { quota: true }
    }

    pub fn remote() -> Self {
        Self { quota: false }
    }
}

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if self.quota {
            Err(Error::quota("You exceeded your current quota"))
        } else {
            Err(Error::remote("HTTP 503 Service Unavailable - overloaded"))
        }
    }

    fn dimensions(&self) -> usize {
        StubEmbedder::DIMENSIONS
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// LLM that returns a canned answer and remembers the last prompt
pub struct StubLlm {
    answer: String,
    last_prompt: Mutex<Option<String>>,
}

impl StubLlm {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().clone()
    }
}

#[async_trait]
impl LlmProvider for StubLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        *self.last_prompt.lock() = Some(prompt.to_string());
        Ok(self.answer.clone())
    }

    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}

/// LLM that always fails
pub struct FailingLlm {
    quota: bool,
}

impl FailingLlm {
    pub fn quota() -> Self {
        Self { quota: true }
    }

    pub fn remote() -> Self {
        Self { quota: false }
    }
}

#[async_trait]
impl LlmProvider for FailingLlm {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        if self.quota {
            Err(Error::quota("You exceeded your current quota"))
        } else {
            Err(Error::remote("HTTP 500 Internal Server Error - boom"))
        }
    }

    fn name(&self) -> &str {
        "failing"
    }

    fn model(&self) -> &str {
        "failing-model"
    }
}

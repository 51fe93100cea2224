//! OpenAI-compatible client for embeddings and chat completions
//!
//! One `reqwest::Client` with a request timeout is shared by the embedder and
//! the LLM provider. Nothing here retries: every failure is classified and
//! handed straight back to the caller.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{EmbeddingConfig, LlmConfig};
use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;
use super::llm::LlmProvider;

/// Thin HTTP client for an OpenAI-compatible API
pub struct OpenAiClient {
    /// HTTP client (carries auth headers and timeout)
    client: Client,
    /// Base URL without trailing slash
    base_url: String,
    /// Request timeout, kept for error messages
    timeout: Duration,
}

impl OpenAiClient {
    /// Create a new client from configuration
    pub fn new(config: &LlmConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::Config("missing OpenAI API key".to_string()));
        }

        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", config.api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|e| Error::Config(format!("invalid API key: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// POST a JSON body to `{base_url}/{path}` and decode the JSON response
    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(path, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = classify_failure(status, &body);
            tracing::warn!("Request to /{} failed: {}", path, err);
            return Err(err);
        }

        response
            .json()
            .await
            .map_err(|e| Error::remote(format!("Failed to parse /{} response: {}", path, e)))
    }

    fn transport_error(&self, path: &str, err: reqwest::Error) -> Error {
        let err = if err.is_timeout() {
            Error::remote(format!(
                "/{} request timed out after {}s",
                path,
                self.timeout.as_secs()
            ))
        } else {
            Error::remote(format!("/{} request failed: {}", path, err))
        };
        tracing::warn!("{}", err);
        err
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// Map a failed API response to an error variant.
///
/// HTTP 429 and `insufficient_quota` bodies are quota conditions; everything
/// else is a generic remote failure carrying the API message.
pub fn classify_failure(status: StatusCode, body: &str) -> Error {
    let detail = serde_json::from_str::<ApiErrorBody>(body).ok().map(|b| b.error);

    let insufficient_quota = detail
        .as_ref()
        .map(|d| {
            d.code.as_deref() == Some("insufficient_quota")
                || d.kind.as_deref() == Some("insufficient_quota")
        })
        .unwrap_or_else(|| body.contains("insufficient_quota"));

    let message = match detail {
        Some(d) if !d.message.is_empty() => d.message,
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => status.to_string(),
    };

    if insufficient_quota || status == StatusCode::TOO_MANY_REQUESTS {
        Error::quota(message)
    } else {
        Error::remote(format!("HTTP {} - {}", status, message))
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

/// Embedding provider backed by the `/embeddings` endpoint
pub struct OpenAiEmbedder {
    client: Arc<OpenAiClient>,
    model: String,
    dimensions: usize,
    request_dimensions: bool,
    batch_size: usize,
}

impl OpenAiEmbedder {
    /// Create from a shared client
    pub fn new(client: Arc<OpenAiClient>, config: &EmbeddingConfig) -> Self {
        Self {
            client,
            model: config.model.clone(),
            dimensions: config.dimensions,
            request_dimensions: config.request_dimensions,
            batch_size: config.batch_size.max(1),
        }
    }

    async fn embed_request(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: inputs,
            dimensions: self.request_dimensions.then_some(self.dimensions),
        };

        let mut response: EmbeddingResponse = self.client.post_json("embeddings", &request).await?;
        response.data.sort_by_key(|entry| entry.index);

        if response.data.len() != inputs.len() {
            return Err(Error::remote(format!(
                "embedding service returned {} embeddings for {} inputs",
                response.data.len(),
                inputs.len()
            )));
        }

        if let Some(entry) = response
            .data
            .iter()
            .find(|entry| entry.embedding.len() != self.dimensions)
        {
            return Err(Error::remote(format!(
                "embedding service returned {}-dimensional vectors, configured for {}",
                entry.embedding.len(),
                self.dimensions
            )));
        }

        Ok(response.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            embeddings.extend(self.embed_request(batch).await?);
        }

        tracing::debug!("Embedded {} texts with {}", texts.len(), self.model);
        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}

/// LLM provider backed by the `/chat/completions` endpoint
pub struct OpenAiLlm {
    client: Arc<OpenAiClient>,
    model: String,
    temperature: f32,
}

impl OpenAiLlm {
    /// Create from a shared client
    pub fn new(client: Arc<OpenAiClient>, config: &LlmConfig) -> Self {
        Self {
            client,
            model: config.generate_model.clone(),
            temperature: config.temperature,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        tracing::info!("Generating answer with model: {}", self.model);

        let response: ChatResponse = self.client.post_json("chat/completions", &request).await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| Error::remote("chat completion returned no choices"))
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

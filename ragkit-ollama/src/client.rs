//! The Ollama HTTP client.

use async_trait::async_trait;
use ragkit_core::{ModelProvider, RagError, Result, ScoredChunk};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::prompt::{SYSTEM_PROMPT, build_context_prompt};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "qwen2.5:0.5b";
const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 2048;

const PROVIDER_NAME: &str = "ollama";

/// A [`ModelProvider`] backed by a local Ollama server.
///
/// # Example
///
/// ```rust,ignore
/// use ragkit_ollama::OllamaClient;
///
/// let client = OllamaClient::new("http://localhost:11434")
///     .with_model("llama3.2")
///     .with_temperature(0.2);
/// ```
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    embedding_model: String,
    temperature: f32,
    max_tokens: u32,
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl OllamaClient {
    /// Create a client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: DEFAULT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Set the chat model used for answer generation.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the embedding model.
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    /// Set the sampling temperature for answer generation.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the maximum number of tokens generated per answer.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post_json<Req: Serialize, Resp: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        request: &Req,
    ) -> Result<Resp> {
        let response =
            self.client.post(self.endpoint(path)).json(request).send().await.map_err(|e| {
                error!(path, error = %e, "request to Ollama failed");
                RagError::Provider {
                    provider: PROVIDER_NAME.to_string(),
                    message: format!("request to {path} failed: {e}"),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(path, %status, "Ollama API error");
            return Err(RagError::Provider {
                provider: PROVIDER_NAME.to_string(),
                message: format!("{path} returned {status}: {body}"),
            });
        }

        response.json().await.map_err(|e| RagError::Provider {
            provider: PROVIDER_NAME.to_string(),
            message: format!("failed to parse {path} response: {e}"),
        })
    }
}

// ── Ollama API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct EmbedBatchRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbedBatchResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TaggedModel>,
}

#[derive(Deserialize)]
struct TaggedModel {
    name: String,
}

// ── ModelProvider implementation ───────────────────────────────────

#[async_trait]
impl ModelProvider for OllamaClient {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(model = %self.embedding_model, text_chars = text.len(), "embedding text");
        let request = EmbeddingRequest { model: &self.embedding_model, prompt: text.trim() };
        let response: EmbeddingResponse = self.post_json("/api/embeddings", &request).await?;
        Ok(response.embedding)
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(model = %self.embedding_model, batch_size = texts.len(), "embedding batch");
        let request = EmbedBatchRequest {
            model: &self.embedding_model,
            input: texts.iter().map(|t| t.trim()).collect(),
        };
        let response: EmbedBatchResponse = self.post_json("/api/embed", &request).await?;

        if response.embeddings.len() != texts.len() {
            return Err(RagError::Provider {
                provider: PROVIDER_NAME.to_string(),
                message: format!(
                    "batch embedding returned {} vectors for {} inputs",
                    response.embeddings.len(),
                    texts.len()
                ),
            });
        }
        Ok(response.embeddings)
    }

    async fn generate_answer(&self, query: &str, context: &[ScoredChunk]) -> Result<String> {
        let context_prompt = build_context_prompt(query, context);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: &context_prompt },
            ],
            stream: false,
            options: ChatOptions { temperature: self.temperature, num_predict: self.max_tokens },
        };

        debug!(model = %self.model, sources = context.len(), "generating answer");
        let response: ChatResponse = self.post_json("/api/chat", &request).await?;
        Ok(response.message.content.trim().to_string())
    }

    async fn is_available(&self) -> bool {
        match self.client.get(self.endpoint("/api/tags")).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let response =
            self.client.get(self.endpoint("/api/tags")).send().await.map_err(|e| {
                RagError::Provider {
                    provider: PROVIDER_NAME.to_string(),
                    message: format!("request to /api/tags failed: {e}"),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RagError::Provider {
                provider: PROVIDER_NAME.to_string(),
                message: format!("/api/tags returned {status}"),
            });
        }

        let tags: TagsResponse = response.json().await.map_err(|e| RagError::Provider {
            provider: PROVIDER_NAME.to_string(),
            message: format!("failed to parse /api/tags response: {e}"),
        })?;
        Ok(tags.models.into_iter().map(|model| model.name).collect())
    }
}

//! Model provider trait for embeddings and answer generation.

use async_trait::async_trait;

use crate::document::ScoredChunk;
use crate::error::Result;

/// A backend that produces embeddings and generates answers.
///
/// Implementations wrap a concrete model server (e.g. Ollama) behind a
/// unified async interface. The embedding vector length must be constant
/// across calls for a given deployment and equal the chunk store's
/// configured dimensionality.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// A short backend name used in logs and error messages.
    fn name(&self) -> &str;

    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    ///
    /// The returned vectors correspond 1:1, in order, with the input
    /// texts. The default implementation calls
    /// [`embed`](ModelProvider::embed) sequentially; backends with
    /// native batching should override it.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Generate an answer to `query` grounded in the given context chunks.
    async fn generate_answer(&self, query: &str, context: &[ScoredChunk]) -> Result<String>;

    /// Whether the backend is currently reachable.
    async fn is_available(&self) -> bool;

    /// Names of the models the backend has installed.
    async fn list_models(&self) -> Result<Vec<String>>;
}

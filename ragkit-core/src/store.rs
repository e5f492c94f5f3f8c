//! In-memory chunk store with linear-scan similarity search.
//!
//! Backed by a `HashMap` behind a `tokio::sync::RwLock`: searches and
//! stats take the read guard and observe a consistent snapshot, while
//! mutations (add, remove, clear) are mutually exclusive behind the write
//! guard.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::config::StoreConfig;
use crate::document::{Chunk, ScoredChunk, SourceCount, StoreStats};
use crate::error::{RagError, Result};

/// Source key used in stats when a chunk has neither URL nor title.
const UNKNOWN_SOURCE: &str = "unknown";

/// An in-memory store of embedded chunks keyed by chunk identifier.
///
/// Every stored chunk carries an embedding whose length equals the
/// configured dimensionality; violating either rule is a hard ingestion
/// error, and a failing batch leaves the store untouched.
#[derive(Debug)]
pub struct ChunkStore {
    config: StoreConfig,
    chunks: RwLock<HashMap<String, Chunk>>,
}

impl ChunkStore {
    /// Create an empty store, validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `dimensions` is zero.
    pub fn new(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, chunks: RwLock::new(HashMap::new()) })
    }

    /// The store's configured embedding dimensionality.
    pub fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    /// Add a batch of chunks, upserting by identifier.
    ///
    /// The whole batch is validated before the map is touched, so a
    /// failing call is all-or-nothing: on error, no chunk from the batch
    /// is stored.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::MissingEmbedding`] for a chunk without an
    /// embedding, or [`RagError::DimensionMismatch`] when an embedding
    /// length disagrees with the configured dimensionality.
    pub async fn add_chunks(&self, chunks: Vec<Chunk>) -> Result<()> {
        for chunk in &chunks {
            let embedding = chunk
                .embedding
                .as_ref()
                .ok_or_else(|| RagError::MissingEmbedding(chunk.id.clone()))?;
            if embedding.len() != self.config.dimensions {
                return Err(RagError::DimensionMismatch {
                    context: format!("chunk '{}'", chunk.id),
                    expected: self.config.dimensions,
                    actual: embedding.len(),
                });
            }
        }

        let mut map = self.chunks.write().await;
        for chunk in chunks {
            map.insert(chunk.id.clone(), chunk);
        }
        Ok(())
    }

    /// Search for the chunks most similar to a query embedding.
    ///
    /// Scans every stored chunk under the read guard, scores it with the
    /// configured metric, keeps scores at or above `threshold`, orders
    /// descending by score (ties keep their scan order), and returns at
    /// most `top_k` results. Pure read; safe to run concurrently with
    /// other searches.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DimensionMismatch`] if the query embedding
    /// length disagrees with the configured dimensionality.
    pub async fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
        threshold: f32,
    ) -> Result<Vec<ScoredChunk>> {
        if query_embedding.len() != self.config.dimensions {
            return Err(RagError::DimensionMismatch {
                context: "query embedding".to_string(),
                expected: self.config.dimensions,
                actual: query_embedding.len(),
            });
        }

        let map = self.chunks.read().await;
        let mut scored = Vec::new();
        for chunk in map.values() {
            let Some(embedding) = &chunk.embedding else { continue };
            let score = self.config.metric.score(query_embedding, embedding)?;
            if score >= threshold {
                scored.push(ScoredChunk { chunk: chunk.clone(), score });
            }
        }
        drop(map);

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }

    /// Remove chunks by identifier. Absent identifiers are ignored.
    pub async fn remove_chunks(&self, ids: &[String]) {
        let mut map = self.chunks.write().await;
        for id in ids {
            map.remove(id);
        }
    }

    /// Remove every chunk whose metadata URL or title equals `source`.
    ///
    /// A non-existent source is a no-op.
    pub async fn remove_by_source(&self, source: &str) {
        let mut map = self.chunks.write().await;
        map.retain(|_, chunk| {
            chunk.metadata.url.as_deref() != Some(source)
                && chunk.metadata.title.as_deref() != Some(source)
        });
    }

    /// Chunks whose metadata title exactly matches one of `titles`.
    pub async fn chunks_by_title(&self, titles: &[String]) -> Vec<Chunk> {
        let map = self.chunks.read().await;
        map.values()
            .filter(|chunk| {
                chunk
                    .metadata
                    .title
                    .as_ref()
                    .is_some_and(|title| titles.contains(title))
            })
            .cloned()
            .collect()
    }

    /// Aggregate statistics: total chunk count, per-source counts (keyed
    /// by URL, else title, else `"unknown"`), and dimensionality.
    pub async fn stats(&self) -> StoreStats {
        let map = self.chunks.read().await;
        let mut per_source: HashMap<&str, usize> = HashMap::new();
        for chunk in map.values() {
            let key = chunk
                .metadata
                .url
                .as_deref()
                .or(chunk.metadata.title.as_deref())
                .unwrap_or(UNKNOWN_SOURCE);
            *per_source.entry(key).or_default() += 1;
        }

        let mut sources: Vec<SourceCount> = per_source
            .into_iter()
            .map(|(source, count)| SourceCount { source: source.to_string(), count })
            .collect();
        sources.sort_by(|a, b| a.source.cmp(&b.source));

        StoreStats { total_chunks: map.len(), sources, dimensions: self.config.dimensions }
    }

    /// Empty the store entirely.
    pub async fn clear(&self) {
        self.chunks.write().await.clear();
    }

    /// Number of stored chunks.
    pub async fn len(&self) -> usize {
        self.chunks.read().await.len()
    }

    /// Whether the store holds no chunks.
    pub async fn is_empty(&self) -> bool {
        self.chunks.read().await.is_empty()
    }
}

//! Data types for documents, chunks, queries, and answer responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The origin category of a document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Fetched from the web during an enrichment pass.
    WebSearch,
    /// Ingested from a local file.
    Upload,
    /// Supplied directly by the caller.
    Manual,
}

/// Metadata attached to a [`Document`] and inherited by its chunks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentMetadata {
    /// Origin URL, if the document came from the web.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Human-readable title (page title or file name).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// How the document entered the store.
    pub provenance: Provenance,
    /// When the document was created.
    pub created_at: DateTime<Utc>,
    /// Zero-based position of a chunk within its parent document.
    /// `None` on document-level metadata; filled in by the chunker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<usize>,
    /// Number of sibling chunks produced from the parent document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_chunks: Option<usize>,
}

/// A source document containing text content and metadata.
///
/// Documents are immutable once built; they are consumed by the chunker
/// during ingestion and never stored directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier for the document.
    pub id: String,
    /// The text content of the document.
    pub content: String,
    /// Metadata describing the document's origin.
    pub metadata: DocumentMetadata,
}

impl Document {
    /// Create a document fetched from the web during enrichment.
    pub fn from_web_search(
        id: impl Into<String>,
        content: impl Into<String>,
        url: impl Into<String>,
        title: Option<String>,
        retrieved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: DocumentMetadata {
                url: Some(url.into()),
                title,
                provenance: Provenance::WebSearch,
                created_at: retrieved_at,
                chunk_index: None,
                total_chunks: None,
            },
        }
    }

    /// Create a document ingested from a local file.
    ///
    /// The file name doubles as both title and URL so that
    /// source-based removal and stats keying work for uploads.
    pub fn from_upload(
        id: impl Into<String>,
        content: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        let file_name = file_name.into();
        Self {
            id: id.into(),
            content: content.into(),
            metadata: DocumentMetadata {
                url: Some(file_name.clone()),
                title: Some(file_name),
                provenance: Provenance::Upload,
                created_at: Utc::now(),
                chunk_index: None,
                total_chunks: None,
            },
        }
    }

    /// Create a document supplied directly by the caller.
    pub fn from_manual(
        id: impl Into<String>,
        content: impl Into<String>,
        title: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: DocumentMetadata {
                url: None,
                title,
                provenance: Provenance::Manual,
                created_at: Utc::now(),
                chunk_index: None,
                total_chunks: None,
            },
        }
    }
}

/// A bounded contiguous excerpt of a [`Document`], the unit of storage
/// and retrieval.
///
/// A chunk's embedding is `None` only transiently during ingestion; the
/// store rejects chunks without one. Stored chunks never carry a
/// similarity score — scored results are a separate type,
/// [`ScoredChunk`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier, `{document_id}_{chunk_index}`.
    pub id: String,
    /// The text content of the chunk.
    pub content: String,
    /// The vector embedding for this chunk's text, attached after chunking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    /// Metadata inherited from the parent document plus chunk position fields.
    pub metadata: DocumentMetadata,
}

/// A retrieved [`Chunk`] paired with a relevance score.
///
/// Only ever produced by a search; never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}

/// A retrieval request.
///
/// # Example
///
/// ```rust,ignore
/// use ragkit_core::SearchQuery;
///
/// let query = SearchQuery::new("how do async traits work?")
///     .with_top_k(3)
///     .with_enrichment(true);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// The query text.
    pub query: String,
    /// Override for the configured number of results to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,
    /// Override for the configured minimum similarity score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f32>,
    /// Allow a web enrichment pass when retrieval is insufficient.
    #[serde(default)]
    pub enrich: bool,
    /// Explicit cap on enrichment fetches, overriding the computed budget.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrichment_budget: Option<usize>,
}

impl SearchQuery {
    /// Create a query with default retrieval settings and enrichment disabled.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: None,
            threshold: None,
            enrich: false,
            enrichment_budget: None,
        }
    }

    /// Override the number of results to return.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Override the minimum similarity score.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Enable or disable the web enrichment pass.
    pub fn with_enrichment(mut self, enrich: bool) -> Self {
        self.enrich = enrich;
        self
    }

    /// Set an explicit enrichment fetch budget.
    pub fn with_enrichment_budget(mut self, budget: usize) -> Self {
        self.enrichment_budget = Some(budget);
        self
    }
}

/// One cited source in a [`RagResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceExcerpt {
    /// The chunk text handed to the answer generator.
    pub content: String,
    /// Metadata of the source chunk.
    pub metadata: DocumentMetadata,
    /// Similarity to the query; 1.0 when no score was computed
    /// (file-reference matches).
    pub similarity: f32,
}

/// The answer to a [`SearchQuery`] together with its cited sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagResponse {
    /// The generated answer text.
    pub answer: String,
    /// The chunks the answer was generated from, in retrieval order.
    pub sources: Vec<SourceExcerpt>,
    /// The original query text.
    pub query: String,
    /// When the response was assembled.
    pub timestamp: DateTime<Utc>,
}

/// Chunk count for a single source, as reported by store stats.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceCount {
    /// Source key: URL if present, else title, else `"unknown"`.
    pub source: String,
    /// Number of chunks stored for this source.
    pub count: usize,
}

/// Aggregate statistics over the chunk store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    /// Total number of stored chunks.
    pub total_chunks: usize,
    /// Per-source chunk counts, sorted by source key.
    pub sources: Vec<SourceCount>,
    /// The store's configured embedding dimensionality.
    pub dimensions: usize,
}

/// Outcome counts for a folder ingestion walk.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestReport {
    /// Files successfully chunked, embedded, and stored.
    pub added: usize,
    /// Files skipped (unsupported extension, empty content, not a regular file).
    pub skipped: usize,
    /// Files that failed to read or ingest.
    pub errors: usize,
}

/// Outcome of a web enrichment pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentReport {
    /// Number of documents fetched, extracted, and ingested.
    pub documents_added: usize,
    /// The search queries that were executed against the search provider.
    pub executed_queries: Vec<String>,
}

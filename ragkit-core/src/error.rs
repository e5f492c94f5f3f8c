//! Error types for the `ragkit-core` crate.

use thiserror::Error;

/// Errors that can occur in retrieval pipeline operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An invalid caller-supplied input (empty query, too-short query).
    #[error("Validation error: {0}")]
    Validation(String),

    /// An embedding vector length disagrees with the configured dimensionality.
    #[error("Dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Where the mismatch was detected (chunk id, "query embedding", ...).
        context: String,
        /// The configured dimensionality.
        expected: usize,
        /// The offending vector's length.
        actual: usize,
    },

    /// A chunk reached the store without an embedding attached.
    #[error("Chunk '{0}' has no embedding")]
    MissingEmbedding(String),

    /// The embedding/answer backend returned an error.
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// The model provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The embedding/answer backend is unreachable.
    #[error("Provider '{0}' is not available")]
    ProviderUnavailable(String),

    /// A web search engine query failed.
    #[error("Search error ({engine}): {message}")]
    Search {
        /// The search engine that produced the error.
        engine: String,
        /// A description of the failure.
        message: String,
    },

    /// Fetching or parsing a single page failed.
    #[error("Extraction failed for '{url}': {message}")]
    Extraction {
        /// The URL that could not be extracted.
        url: String,
        /// A description of the failure.
        message: String,
    },

    /// A web enrichment pass produced no usable content at all.
    #[error("Web enrichment found no usable content for query '{query}'")]
    EnrichmentExhausted {
        /// The query that was enriched.
        query: String,
    },

    /// A file or folder could not be ingested.
    #[error("Ingestion failed for '{path}': {message}")]
    Ingestion {
        /// The path that failed.
        path: String,
        /// A description of the failure.
        message: String,
    },
}

/// A convenience result type for retrieval pipeline operations.
pub type Result<T> = std::result::Result<T, RagError>;

//! Configuration for the retrieval pipeline.
//!
//! Configuration is an explicit value constructed once (usually through
//! [`RagConfig::builder()`]) and passed into component constructors; no
//! component reads ambient global state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};
use crate::similarity::SimilarityMetric;

/// Chunking parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters.
    pub max_chunk_size: usize,
    /// Number of overlapping characters between consecutive chunks.
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { max_chunk_size: 500, overlap: 100 }
    }
}

impl ChunkingConfig {
    /// Validate that the parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `max_chunk_size` is zero or
    /// `overlap >= max_chunk_size`.
    pub fn validate(&self) -> Result<()> {
        if self.max_chunk_size == 0 {
            return Err(RagError::Config("max_chunk_size must be greater than zero".to_string()));
        }
        if self.overlap >= self.max_chunk_size {
            return Err(RagError::Config(format!(
                "overlap ({}) must be less than max_chunk_size ({})",
                self.overlap, self.max_chunk_size
            )));
        }
        Ok(())
    }
}

/// Chunk store parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    /// Embedding dimensionality every stored chunk must match.
    pub dimensions: usize,
    /// The similarity scheme used for every search against this store.
    pub metric: SimilarityMetric,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { dimensions: 768, metric: SimilarityMetric::Cosine }
    }
}

impl StoreConfig {
    /// Validate that the parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `dimensions` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.dimensions == 0 {
            return Err(RagError::Config("dimensions must be greater than zero".to_string()));
        }
        Ok(())
    }
}

/// The policy deciding when retrieval results are too thin and a web
/// enrichment pass should run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SufficiencyPolicy {
    /// Insufficient when fewer chunks than the effective top-k were returned.
    #[default]
    BelowTopK,
    /// Insufficient only when no chunks were returned at all.
    EmptyOnly,
}

/// Retrieval parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalConfig {
    /// Number of top results to return from a search.
    pub top_k: usize,
    /// Minimum similarity score for results (results below this are filtered out).
    pub threshold: f32,
    /// When to consider retrieval insufficient and trigger enrichment.
    pub sufficiency: SufficiencyPolicy,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 5, threshold: 0.7, sufficiency: SufficiencyPolicy::default() }
    }
}

impl RetrievalConfig {
    /// Validate that the parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `top_k` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(RagError::Config("top_k must be greater than zero".to_string()));
        }
        Ok(())
    }
}

/// The closed set of supported web search engines.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngineKind {
    /// The default engine; tolerant of scripted access via its HTML endpoint.
    #[default]
    DuckDuckGo,
    Bing,
    Google,
}

impl SearchEngineKind {
    /// The engine name as it appears in configuration and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchEngineKind::DuckDuckGo => "duckduckgo",
            SearchEngineKind::Bing => "bing",
            SearchEngineKind::Google => "google",
        }
    }
}

impl std::fmt::Display for SearchEngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Web search and page extraction parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebSearchConfig {
    /// Which engine to query.
    pub engine: SearchEngineKind,
    /// Default cap on search results considered per query.
    pub max_results: usize,
    /// Per-attempt fetch timeout.
    pub timeout: Duration,
    /// Number of fetch attempts per URL before giving up.
    pub retry_attempts: u32,
    /// Base delay between fetch attempts; the wait grows linearly with
    /// the attempt number.
    pub retry_delay: Duration,
    /// Minimum extracted content length for a page to count as usable.
    pub min_content_length: usize,
    /// Result hosts matching any of these entries are dropped.
    pub exclude_domains: Vec<String>,
    /// When non-empty, result hosts must match one of these entries.
    pub include_domains: Vec<String>,
    /// User-Agent header sent with every fetch.
    pub user_agent: String,
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            engine: SearchEngineKind::default(),
            max_results: 10,
            timeout: Duration::from_secs(15),
            retry_attempts: 2,
            retry_delay: Duration::from_secs(1),
            min_content_length: 200,
            exclude_domains: vec!["youtube.com".to_string()],
            include_domains: Vec::new(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

/// File ingestion parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestionConfig {
    /// File extensions (lowercase, with leading dot) eligible for ingestion.
    pub allowed_extensions: Vec<String>,
    /// Directory names pruned from folder walks.
    pub ignored_dirs: Vec<String>,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: [
                ".txt", ".md", ".json", ".js", ".ts", ".jsx", ".tsx", ".py", ".java", ".c",
                ".cpp", ".h", ".css", ".html", ".xml", ".pdf",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            ignored_dirs: [
                "node_modules",
                ".git",
                "dist",
                "build",
                ".next",
                "coverage",
                ".vscode",
                "target",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Aggregate configuration for the retrieval pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Chunking parameters.
    pub chunking: ChunkingConfig,
    /// Chunk store parameters.
    pub store: StoreConfig,
    /// Retrieval parameters.
    pub retrieval: RetrievalConfig,
    /// Web search and extraction parameters.
    pub web_search: WebSearchConfig,
    /// File ingestion parameters.
    pub ingestion: IngestionConfig,
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }

    /// Validate every section of the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] describing the first inconsistent
    /// parameter found.
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;
        self.store.validate()?;
        self.retrieval.validate()?;
        Ok(())
    }
}

/// Builder for constructing a validated [`RagConfig`].
///
/// # Example
///
/// ```rust,ignore
/// use ragkit_core::{RagConfig, SimilarityMetric};
///
/// let config = RagConfig::builder()
///     .max_chunk_size(500)
///     .overlap(100)
///     .dimensions(768)
///     .metric(SimilarityMetric::Cosine)
///     .top_k(5)
///     .threshold(0.7)
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the maximum chunk size in characters.
    pub fn max_chunk_size(mut self, size: usize) -> Self {
        self.config.chunking.max_chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn overlap(mut self, overlap: usize) -> Self {
        self.config.chunking.overlap = overlap;
        self
    }

    /// Set the store's embedding dimensionality.
    pub fn dimensions(mut self, dimensions: usize) -> Self {
        self.config.store.dimensions = dimensions;
        self
    }

    /// Set the store-wide similarity scheme.
    pub fn metric(mut self, metric: SimilarityMetric) -> Self {
        self.config.store.metric = metric;
        self
    }

    /// Set the number of top results to return from a search.
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.config.retrieval.top_k = top_k;
        self
    }

    /// Set the minimum similarity threshold for filtering results.
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.config.retrieval.threshold = threshold;
        self
    }

    /// Set the policy deciding when retrieval triggers enrichment.
    pub fn sufficiency(mut self, policy: SufficiencyPolicy) -> Self {
        self.config.retrieval.sufficiency = policy;
        self
    }

    /// Replace the web search section wholesale.
    pub fn web_search(mut self, web_search: WebSearchConfig) -> Self {
        self.config.web_search = web_search;
        self
    }

    /// Replace the ingestion section wholesale.
    pub fn ingestion(mut self, ingestion: IngestionConfig) -> Self {
        self.config.ingestion = ingestion;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if any section fails validation.
    pub fn build(self) -> Result<RagConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

//! The retrieval engine: ingestion and multi-pass query answering.
//!
//! [`RagEngine`] coordinates the full workflow by composing a
//! [`ModelProvider`], a [`ChunkStore`], a [`Chunker`], and an optional
//! [`EnrichmentPipeline`]. A query runs through initial retrieval, a
//! sufficiency check, an optional web enrichment pass with a re-search,
//! and answer generation. Enrichment is best-effort: its failures are
//! downgraded and the query proceeds with whatever was already retrieved.
//!
//! # Example
//!
//! ```rust,ignore
//! use ragkit_core::{RagConfig, RagEngine, SearchQuery};
//!
//! let engine = RagEngine::builder()
//!     .config(RagConfig::default())
//!     .provider(Arc::new(ollama))
//!     .store(Arc::new(store))
//!     .chunker(Arc::new(chunker))
//!     .build()?;
//!
//! engine.ingest_folder(Path::new("./docs"), true).await?;
//! let response = engine.answer_query(SearchQuery::new("how do I ...?")).await?;
//! ```

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::chunker::Chunker;
use crate::config::{RagConfig, SufficiencyPolicy};
use crate::document::{
    Chunk, Document, EnrichmentReport, IngestReport, RagResponse, ScoredChunk, SearchQuery,
    SourceExcerpt, StoreStats,
};
use crate::enrichment::EnrichmentPipeline;
use crate::error::{RagError, Result};
use crate::provider::ModelProvider;
use crate::query::{file_references, normalize_text, validate_query};
use crate::store::ChunkStore;

/// The fixed answer returned when no chunks are relevant to a query.
pub const NO_RELEVANT_INFORMATION: &str =
    "I could not find any relevant information to answer your question.";

/// Cap on the number of pages fetched by an implicit enrichment pass.
const ENRICHMENT_BUDGET_CEILING: usize = 3;

/// Outcome of attempting to ingest a single file.
enum FileOutcome {
    Added,
    Skipped,
}

/// The top-level retrieval orchestrator.
///
/// One engine behind an `Arc` serves concurrent queries; the store's
/// reader/writer lock provides the snapshot guarantee between searches
/// and mutations.
pub struct RagEngine {
    config: RagConfig,
    provider: Arc<dyn ModelProvider>,
    store: Arc<ChunkStore>,
    chunker: Arc<dyn Chunker>,
    enrichment: Option<EnrichmentPipeline>,
}

impl RagEngine {
    /// Create a new [`RagEngineBuilder`].
    pub fn builder() -> RagEngineBuilder {
        RagEngineBuilder::default()
    }

    /// The engine configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// The shared chunk store.
    pub fn store(&self) -> &Arc<ChunkStore> {
        &self.store
    }

    /// Probe the model provider and log the available models.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ProviderUnavailable`] if the backend does not
    /// respond; this is fatal at startup.
    pub async fn initialize(&self) -> Result<()> {
        if !self.provider.is_available().await {
            return Err(RagError::ProviderUnavailable(self.provider.name().to_string()));
        }
        match self.provider.list_models().await {
            Ok(models) => {
                info!(provider = self.provider.name(), ?models, "model provider ready");
            }
            Err(e) => warn!(error = %e, "provider is up but listing models failed"),
        }
        Ok(())
    }

    /// Ingest documents: chunk, embed in one batched call, and store.
    ///
    /// Embedding is all-or-nothing per batch: a provider error fails the
    /// whole call and nothing is persisted. Returns the stored chunks.
    ///
    /// # Errors
    ///
    /// Propagates provider errors and store validation errors
    /// ([`RagError::DimensionMismatch`], [`RagError::MissingEmbedding`]).
    pub async fn ingest_documents(&self, documents: &[Document]) -> Result<Vec<Chunk>> {
        let mut chunks = self.chunker.chunk_many(documents);
        if chunks.is_empty() {
            debug!(documents = documents.len(), "nothing to ingest");
            return Ok(chunks);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let embeddings = self.provider.embed_batch(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(RagError::Provider {
                provider: self.provider.name().to_string(),
                message: format!(
                    "embedding batch returned {} vectors for {} chunks",
                    embeddings.len(),
                    chunks.len()
                ),
            });
        }

        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = Some(embedding);
        }

        self.store.add_chunks(chunks.clone()).await?;
        info!(documents = documents.len(), chunks = chunks.len(), "ingested documents");
        Ok(chunks)
    }

    /// Ingest a single file.
    ///
    /// Files that are not regular files, carry an unsupported extension,
    /// or contain only whitespace are skipped without error.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Ingestion`] when the file cannot be read
    /// (missing, permission denied, not valid UTF-8), and propagates
    /// embedding/store failures.
    pub async fn ingest_file(&self, path: &Path) -> Result<()> {
        self.ingest_file_outcome(path).await.map(|_| ())
    }

    async fn ingest_file_outcome(&self, path: &Path) -> Result<FileOutcome> {
        let metadata = tokio::fs::metadata(path).await.map_err(|e| RagError::Ingestion {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if !metadata.is_file() {
            debug!(path = %path.display(), "skipping non-file entry");
            return Ok(FileOutcome::Skipped);
        }

        if !self.has_allowed_extension(path) {
            debug!(path = %path.display(), "skipping unsupported extension");
            return Ok(FileOutcome::Skipped);
        }

        let content = tokio::fs::read_to_string(path).await.map_err(|e| RagError::Ingestion {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if content.trim().is_empty() {
            return Ok(FileOutcome::Skipped);
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let document =
            Document::from_upload(format!("file_{}", Uuid::new_v4()), content, file_name);
        self.ingest_documents(&[document]).await?;
        Ok(FileOutcome::Added)
    }

    /// Ingest every supported file under a folder.
    ///
    /// The walk is iterative, prunes the configured ignored directory
    /// names, and is bounded to the folder's own entries when `recursive`
    /// is false. Per-file failures are counted, never fatal.
    pub async fn ingest_folder(&self, path: &Path, recursive: bool) -> Result<IngestReport> {
        let mut report = IngestReport::default();

        let mut walker = WalkDir::new(path);
        if !recursive {
            walker = walker.max_depth(1);
        }
        let ignored = self.config.ingestion.ignored_dirs.clone();
        let entries = walker.into_iter().filter_entry(move |entry| {
            !(entry.file_type().is_dir()
                && ignored.iter().any(|dir| entry.file_name().to_string_lossy() == *dir))
        });

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "folder walk entry failed");
                    report.errors += 1;
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if !self.has_allowed_extension(entry.path()) {
                report.skipped += 1;
                continue;
            }

            match self.ingest_file_outcome(entry.path()).await {
                Ok(FileOutcome::Added) => report.added += 1,
                Ok(FileOutcome::Skipped) => report.skipped += 1,
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "file ingestion failed");
                    report.errors += 1;
                }
            }
        }

        info!(
            path = %path.display(),
            added = report.added,
            skipped = report.skipped,
            errors = report.errors,
            "folder ingestion finished"
        );
        Ok(report)
    }

    /// Answer a query against the store, enriching from the web first
    /// when retrieval is insufficient and the query allows it.
    ///
    /// Queries containing explicit file references bypass similarity
    /// search and enrichment entirely and answer from exact title
    /// matches. Zero final chunks is a normal outcome and yields the
    /// fixed [`NO_RELEVANT_INFORMATION`] answer.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Validation`] for an unusable query and
    /// propagates embedding-provider and answer-generator failures.
    /// Enrichment failures never fail the query.
    pub async fn answer_query(&self, query: SearchQuery) -> Result<RagResponse> {
        validate_query(&query.query)?;

        let top_k = query.top_k.unwrap_or(self.config.retrieval.top_k);
        let threshold = query.threshold.unwrap_or(self.config.retrieval.threshold);

        let references =
            file_references(&query.query, &self.config.ingestion.allowed_extensions);
        let results = if references.is_empty() {
            self.retrieve(&query, top_k, threshold).await?
        } else {
            debug!(?references, "query references files, bypassing similarity search");
            self.store
                .chunks_by_title(&references)
                .await
                .into_iter()
                .map(|chunk| ScoredChunk { chunk, score: 1.0 })
                .collect()
        };

        if results.is_empty() {
            info!(query = %query.query, "no relevant chunks found");
            return Ok(RagResponse {
                answer: NO_RELEVANT_INFORMATION.to_string(),
                sources: Vec::new(),
                query: query.query,
                timestamp: Utc::now(),
            });
        }

        let answer = self.provider.generate_answer(&query.query, &results).await?;
        let sources = results
            .iter()
            .map(|result| SourceExcerpt {
                content: result.chunk.content.clone(),
                metadata: result.chunk.metadata.clone(),
                similarity: result.score,
            })
            .collect();

        info!(query = %query.query, sources = results.len(), "query answered");
        Ok(RagResponse { answer, sources, query: query.query, timestamp: Utc::now() })
    }

    /// Initial retrieval plus the conditional enrichment branch.
    async fn retrieve(
        &self,
        query: &SearchQuery,
        top_k: usize,
        threshold: f32,
    ) -> Result<Vec<ScoredChunk>> {
        let normalized = normalize_text(&query.query);
        let embedding = self.provider.embed(&normalized).await?;
        let mut results = self.store.search(&embedding, top_k, threshold).await?;

        if query.enrich && self.is_insufficient(results.len(), top_k) {
            let budget = query
                .enrichment_budget
                .unwrap_or_else(|| (top_k - results.len()).min(ENRICHMENT_BUDGET_CEILING));
            match self.enrich_and_research(&query.query, budget, &embedding, top_k, threshold).await
            {
                Ok(Some(rerun)) => results = rerun,
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, "web enrichment failed, answering from existing chunks");
                }
            }
        }

        Ok(results)
    }

    fn is_insufficient(&self, count: usize, top_k: usize) -> bool {
        match self.config.retrieval.sufficiency {
            SufficiencyPolicy::BelowTopK => count < top_k,
            SufficiencyPolicy::EmptyOnly => count == 0,
        }
    }

    /// Run one enrichment pass and re-search with the cached query
    /// embedding. `Ok(None)` means there was nothing to do (no pipeline,
    /// zero budget); errors are handled by the caller.
    async fn enrich_and_research(
        &self,
        query: &str,
        budget: usize,
        embedding: &[f32],
        top_k: usize,
        threshold: f32,
    ) -> Result<Option<Vec<ScoredChunk>>> {
        let Some(pipeline) = &self.enrichment else {
            debug!("retrieval insufficient but no enrichment pipeline is configured");
            return Ok(None);
        };
        if budget == 0 {
            return Ok(None);
        }

        info!(query, budget, "retrieval insufficient, enriching from the web");
        let (documents, _) = pipeline.gather(query, budget).await?;
        if documents.is_empty() {
            return Ok(None);
        }
        self.ingest_documents(&documents).await?;

        let rerun = self.store.search(embedding, top_k, threshold).await?;
        Ok(Some(rerun))
    }

    /// Fetch and ingest web content for a query, outside of any query
    /// flow.
    ///
    /// # Errors
    ///
    /// Unlike the query path, failures propagate here:
    /// [`RagError::Config`] when no enrichment pipeline is configured,
    /// plus any gathering or ingestion error.
    pub async fn enrich_from_web(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<EnrichmentReport> {
        let pipeline = self.enrichment.as_ref().ok_or_else(|| {
            RagError::Config("no enrichment pipeline is configured".to_string())
        })?;

        let (documents, executed_queries) = pipeline.gather(query, max_results).await?;
        let documents_added = documents.len();
        self.ingest_documents(&documents).await?;
        Ok(EnrichmentReport { documents_added, executed_queries })
    }

    /// Remove every chunk whose URL or title equals `source`.
    pub async fn remove_source(&self, source: &str) {
        self.store.remove_by_source(source).await;
        info!(source, "removed source from store");
    }

    /// Empty the chunk store.
    pub async fn clear(&self) {
        self.store.clear().await;
    }

    /// Aggregate store statistics.
    pub async fn stats(&self) -> StoreStats {
        self.store.stats().await
    }

    /// Names of the models the provider has installed.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        self.provider.list_models().await
    }

    fn has_allowed_extension(&self, path: &Path) -> bool {
        let Some(extension) = path.extension() else { return false };
        let extension = format!(".{}", extension.to_string_lossy().to_lowercase());
        self.config.ingestion.allowed_extensions.contains(&extension)
    }
}

/// Builder for constructing a [`RagEngine`].
///
/// `config`, `provider`, `store`, and `chunker` are required; the
/// enrichment pipeline is optional — without one, insufficient retrieval
/// simply proceeds with what the store holds.
#[derive(Default)]
pub struct RagEngineBuilder {
    config: Option<RagConfig>,
    provider: Option<Arc<dyn ModelProvider>>,
    store: Option<Arc<ChunkStore>>,
    chunker: Option<Arc<dyn Chunker>>,
    enrichment: Option<EnrichmentPipeline>,
}

impl RagEngineBuilder {
    /// Set the engine configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding/answer provider.
    pub fn provider(mut self, provider: Arc<dyn ModelProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the chunk store.
    pub fn store(mut self, store: Arc<ChunkStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the optional web enrichment pipeline.
    pub fn enrichment(mut self, pipeline: EnrichmentPipeline) -> Self {
        self.enrichment = Some(pipeline);
        self
    }

    /// Build the [`RagEngine`], validating the configuration and that all
    /// required components are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] for a missing component or an
    /// inconsistent configuration.
    pub fn build(self) -> Result<RagEngine> {
        let config =
            self.config.ok_or_else(|| RagError::Config("config is required".to_string()))?;
        config.validate()?;
        let provider =
            self.provider.ok_or_else(|| RagError::Config("provider is required".to_string()))?;
        let store = self.store.ok_or_else(|| RagError::Config("store is required".to_string()))?;
        let chunker =
            self.chunker.ok_or_else(|| RagError::Config("chunker is required".to_string()))?;

        Ok(RagEngine { config, provider, store, chunker, enrichment: self.enrichment })
    }
}

//! Retrieval-augmented answer pipeline.
//!
//! This crate splits documents into bounded overlapping chunks, stores
//! them with embeddings in an in-memory vector store, retrieves the
//! chunks most relevant to a query by linear-scan similarity search, and
//! adaptively enriches the store with freshly fetched web content when
//! stored coverage is insufficient, before handing the selected chunks
//! to an answer generator.
//!
//! The concrete model provider, search engines, and page extractor live
//! in adapter crates behind the [`ModelProvider`], [`SearchProvider`],
//! and [`ContentExtractor`] traits.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ragkit_core::{ChunkStore, RagConfig, RagEngine, SearchQuery, TextChunker};
//!
//! let config = RagConfig::default();
//! let engine = RagEngine::builder()
//!     .store(Arc::new(ChunkStore::new(config.store.clone())?))
//!     .chunker(Arc::new(TextChunker::new(config.chunking.clone())?))
//!     .provider(Arc::new(my_provider))
//!     .config(config)
//!     .build()?;
//!
//! engine.initialize().await?;
//! let response = engine.answer_query(SearchQuery::new("what is chunking?")).await?;
//! ```

pub mod chunker;
pub mod config;
pub mod document;
pub mod engine;
pub mod enrichment;
pub mod error;
pub mod provider;
pub mod query;
pub mod similarity;
pub mod store;
pub mod websearch;

pub use chunker::{Chunker, TextChunker};
pub use config::{
    ChunkingConfig, IngestionConfig, RagConfig, RagConfigBuilder, RetrievalConfig,
    SearchEngineKind, StoreConfig, SufficiencyPolicy, WebSearchConfig,
};
pub use document::{
    Chunk, Document, DocumentMetadata, EnrichmentReport, IngestReport, Provenance, RagResponse,
    ScoredChunk, SearchQuery, SourceCount, SourceExcerpt, StoreStats,
};
pub use engine::{NO_RELEVANT_INFORMATION, RagEngine, RagEngineBuilder};
pub use enrichment::EnrichmentPipeline;
pub use error::{RagError, Result};
pub use provider::ModelProvider;
pub use query::{file_references, normalize_text, validate_query};
pub use similarity::SimilarityMetric;
pub use store::ChunkStore;
pub use websearch::{ContentExtractor, ExtractedPage, SearchHit, SearchProvider};

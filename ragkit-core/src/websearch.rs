//! Consumed interfaces for web search and page content extraction.
//!
//! Concrete engines and the HTML extractor live in an adapter crate;
//! the core pipeline only depends on these traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One ranked result from a web search engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchHit {
    /// Result title as shown on the results page.
    pub title: String,
    /// Result URL, already cleaned of redirects and tracking parameters.
    pub url: String,
    /// Short descriptive snippet.
    pub snippet: String,
    /// 1-based position in the result list.
    pub rank: usize,
}

/// The main content extracted from a fetched page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractedPage {
    /// The fetched URL.
    pub url: String,
    /// The page title, when one was present.
    pub title: Option<String>,
    /// Main content text, whitespace-normalized.
    pub content: String,
    /// Text of the page's `h1`–`h3` headings.
    pub headings: Vec<String>,
    /// When the extraction happened.
    pub extracted_at: DateTime<Utc>,
}

/// A web search engine returning ranked results for a query.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run a search and return results ordered by ascending rank.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>>;
}

/// Fetches a page and extracts its main content region.
///
/// Implementations own fetch retries and the per-attempt timeout. A URL
/// that cannot be fetched, or whose extracted content falls below the
/// configured minimum length, yields an
/// [`RagError::Extraction`](crate::RagError::Extraction) for that URL
/// only.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    /// Fetch `url` and extract its main content.
    async fn extract(&self, url: &str) -> Result<ExtractedPage>;
}

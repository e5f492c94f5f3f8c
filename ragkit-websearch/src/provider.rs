//! The [`SearchProvider`] implementation over scraped engine result
//! pages.

use async_trait::async_trait;
use ragkit_core::{RagError, Result, SearchHit, SearchProvider, WebSearchConfig};
use tracing::debug;

use crate::engines;
use crate::fetch::fetch_with_retry;

/// A [`SearchProvider`] that scrapes the configured engine's HTML
/// results page.
///
/// # Example
///
/// ```rust,ignore
/// use ragkit_core::WebSearchConfig;
/// use ragkit_websearch::WebSearchProvider;
///
/// let provider = WebSearchProvider::new(WebSearchConfig::default());
/// let hits = provider.search("rust borrow checker").await?;
/// ```
pub struct WebSearchProvider {
    client: reqwest::Client,
    config: WebSearchConfig,
}

impl WebSearchProvider {
    /// Create a provider for the engine named in the configuration.
    pub fn new(config: WebSearchConfig) -> Self {
        Self { client: reqwest::Client::new(), config }
    }
}

#[async_trait]
impl SearchProvider for WebSearchProvider {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let engine = self.config.engine;
        let request_url = engines::request_url(engine, query);

        let html = fetch_with_retry(&self.client, &request_url, &self.config).await.map_err(
            |e| RagError::Search { engine: engine.to_string(), message: e.to_string() },
        )?;

        let hits = engines::parse_results(engine, &html)?;
        debug!(%engine, query, hits = hits.len(), "search completed");
        Ok(hits)
    }
}

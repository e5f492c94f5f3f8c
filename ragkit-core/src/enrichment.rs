//! Web enrichment: turning search results into freshly fetched documents.
//!
//! The pipeline asks a [`SearchProvider`] for ranked results, filters
//! them by domain policy, fans extraction out across the surviving URLs,
//! and converts the usable pages into documents ready for ingestion.
//! Fetch failures are per-URL and never abort the batch.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::config::WebSearchConfig;
use crate::document::Document;
use crate::error::{RagError, Result};
use crate::query::validate_query;
use crate::websearch::{ContentExtractor, SearchHit, SearchProvider};

/// Gathers web content for a query via search, fetch, and extraction.
pub struct EnrichmentPipeline {
    search: Arc<dyn SearchProvider>,
    extractor: Arc<dyn ContentExtractor>,
    config: WebSearchConfig,
}

impl EnrichmentPipeline {
    /// Create a pipeline over a search provider and a content extractor.
    pub fn new(
        search: Arc<dyn SearchProvider>,
        extractor: Arc<dyn ContentExtractor>,
        config: WebSearchConfig,
    ) -> Self {
        Self { search, extractor, config }
    }

    /// Search the web for `query` and convert up to `max_results` usable
    /// pages into documents.
    ///
    /// Returns the documents together with the list of search queries
    /// that were executed. A `max_results` of zero is a deliberate no-op
    /// and returns empty lists. Ingestion of the returned documents is
    /// the caller's step.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Validation`] for an empty or too-short query,
    /// a provider error if the search itself fails, and
    /// [`RagError::EnrichmentExhausted`] when zero pages yielded usable
    /// content.
    pub async fn gather(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<(Vec<Document>, Vec<String>)> {
        validate_query(query)?;

        if max_results == 0 {
            debug!(query, "enrichment requested with a zero budget, skipping");
            return Ok((Vec::new(), Vec::new()));
        }

        let hits = self.search.search(query).await?;
        let candidates: Vec<SearchHit> = hits
            .into_iter()
            .filter(|hit| self.passes_domain_policy(&hit.url))
            .take(max_results)
            .collect();

        info!(query, candidates = candidates.len(), "extracting web search results");

        let extractions = join_all(
            candidates
                .iter()
                .map(|hit| async { self.extractor.extract(&hit.url).await }),
        )
        .await;

        let mut documents = Vec::new();
        for (hit, outcome) in candidates.into_iter().zip(extractions) {
            let page = match outcome {
                Ok(page) => page,
                Err(e) => {
                    warn!(url = %hit.url, error = %e, "extraction failed, skipping result");
                    continue;
                }
            };
            if page.content.chars().count() < self.config.min_content_length {
                warn!(url = %hit.url, "extracted content below minimum length, skipping");
                continue;
            }

            let title = page.title.clone().filter(|t| !t.is_empty()).or_else(|| {
                (!hit.title.is_empty()).then(|| hit.title.clone())
            });
            documents.push(Document::from_web_search(
                format!("web_{}", Uuid::new_v4()),
                page.content,
                page.url,
                title,
                page.extracted_at,
            ));
        }

        if documents.is_empty() {
            return Err(RagError::EnrichmentExhausted { query: query.to_string() });
        }

        info!(query, documents = documents.len(), "web enrichment gathered documents");
        Ok((documents, vec![query.to_string()]))
    }

    /// Whether a result URL's host passes the exclude/include lists.
    fn passes_domain_policy(&self, url: &str) -> bool {
        let host = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_lowercase))
            .unwrap_or_default();

        if self.config.exclude_domains.iter().any(|d| host.contains(d.as_str())) {
            return false;
        }
        if !self.config.include_domains.is_empty() {
            return self.config.include_domains.iter().any(|d| host.contains(d.as_str()));
        }
        true
    }
}

//! Web search and page extraction adapters for RagKit.
//!
//! This crate provides:
//! - [`WebSearchProvider`] — scraping-based search over DuckDuckGo, Bing,
//!   or Google HTML result pages
//! - [`PageExtractor`] — main-content extraction from fetched pages
//! - [`fetch_with_retry`] — bounded-retry HTTP fetching with per-attempt
//!   timeouts
//! - URL cleanup helpers for redirect unwrapping and tracking-parameter
//!   removal

mod engines;
mod extractor;
mod fetch;
mod provider;
mod url_clean;

pub use extractor::PageExtractor;
pub use fetch::fetch_with_retry;
pub use provider::WebSearchProvider;
pub use url_clean::{clean_url, domain_of};

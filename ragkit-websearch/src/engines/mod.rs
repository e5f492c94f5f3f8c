//! Per-engine request URLs and HTML result parsing.
//!
//! Each engine module exposes a pure `parse` function over the result
//! page HTML, producing [`SearchHit`]s with 1-based ranks; fetching is
//! the provider's concern.

mod bing;
mod ddg;
mod google;

use ragkit_core::{Result, SearchEngineKind, SearchHit};
use scraper::{ElementRef, Selector};

/// The search request URL for a query on the given engine.
pub(crate) fn request_url(engine: SearchEngineKind, query: &str) -> String {
    let encoded: String =
        url::form_urlencoded::Serializer::new(String::new()).append_pair("q", query).finish();
    match engine {
        SearchEngineKind::DuckDuckGo => {
            format!("https://html.duckduckgo.com/html/?{encoded}")
        }
        SearchEngineKind::Bing => format!("https://www.bing.com/search?{encoded}"),
        SearchEngineKind::Google => format!("https://www.google.com/search?{encoded}"),
    }
}

/// Parse a result page fetched from the given engine.
pub(crate) fn parse_results(engine: SearchEngineKind, html: &str) -> Result<Vec<SearchHit>> {
    match engine {
        SearchEngineKind::DuckDuckGo => ddg::parse(html),
        SearchEngineKind::Bing => bing::parse(html),
        SearchEngineKind::Google => google::parse(html),
    }
}

/// Compile a CSS selector, mapping failures into a search error.
fn selector(engine: &str, css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ragkit_core::RagError::Search {
        engine: engine.to_string(),
        message: format!("invalid selector '{css}': {e}"),
    })
}

/// The trimmed text content of an element.
fn text_of(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_urls_encode_the_query() {
        let url = request_url(SearchEngineKind::DuckDuckGo, "rust async traits");
        assert_eq!(url, "https://html.duckduckgo.com/html/?q=rust+async+traits");

        let url = request_url(SearchEngineKind::Bing, "a&b");
        assert_eq!(url, "https://www.bing.com/search?q=a%26b");

        let url = request_url(SearchEngineKind::Google, "résumé");
        assert!(url.starts_with("https://www.google.com/search?q="));
    }
}

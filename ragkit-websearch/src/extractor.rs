//! Main-content extraction from fetched pages.

use async_trait::async_trait;
use chrono::Utc;
use ragkit_core::{ContentExtractor, ExtractedPage, RagError, Result, WebSearchConfig};
use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;

use crate::fetch::fetch_with_retry;

/// Elements whose text never belongs to the main content.
const SKIPPED_ELEMENTS: [&str; 4] = ["script", "style", "nav", "footer"];

/// Content-area selectors tried in priority order before falling back to
/// the whole body.
const CONTENT_SELECTORS: [&str; 3] = ["article", "main", ".content"];

/// A [`ContentExtractor`] that fetches pages over HTTP and pulls out the
/// main content region.
///
/// The extractor owns fetch retries and the per-attempt timeout. A page
/// is usable only when its extracted content reaches the configured
/// minimum length.
pub struct PageExtractor {
    client: reqwest::Client,
    config: WebSearchConfig,
}

impl PageExtractor {
    /// Create an extractor with the given fetch/extraction settings.
    pub fn new(config: WebSearchConfig) -> Self {
        Self { client: reqwest::Client::new(), config }
    }
}

#[async_trait]
impl ContentExtractor for PageExtractor {
    async fn extract(&self, url: &str) -> Result<ExtractedPage> {
        let html = fetch_with_retry(&self.client, url, &self.config).await?;
        let page = parse_page(&html, self.config.min_content_length);

        let length = page.content.chars().count();
        if length < self.config.min_content_length {
            return Err(RagError::Extraction {
                url: url.to_string(),
                message: format!(
                    "extracted content too short ({length} < {} chars)",
                    self.config.min_content_length
                ),
            });
        }

        debug!(url, content_chars = length, "page extracted");
        Ok(ExtractedPage {
            url: url.to_string(),
            title: page.title,
            content: page.content,
            headings: page.headings,
            extracted_at: Utc::now(),
        })
    }
}

struct ParsedPage {
    title: Option<String>,
    content: String,
    headings: Vec<String>,
}

/// Pull the main content out of a page.
///
/// Tries the content-area selectors in priority order, accepting the
/// first whose text reaches `min_length`; otherwise falls back to the
/// full body text.
fn parse_page(html: &str, min_length: usize) -> ParsedPage {
    let document = Html::parse_document(html);

    let title = select_first(&document, "title")
        .map(|el| element_text(el))
        .filter(|t| !t.is_empty());
    let headings = collect_headings(&document);

    for css in CONTENT_SELECTORS {
        if let Some(element) = select_first(&document, css) {
            let content = element_text(element);
            if content.chars().count() >= min_length {
                return ParsedPage { title, content, headings };
            }
        }
    }

    let content = select_first(&document, "body").map(element_text).unwrap_or_default();
    ParsedPage { title, content, headings }
}

fn select_first<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    document.select(&selector).next()
}

fn collect_headings(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("h1, h2, h3") else { return Vec::new() };
    document
        .select(&selector)
        .map(|el| element_text(el))
        .filter(|text| !text.is_empty())
        .collect()
}

/// The whitespace-normalized text of an element, skipping script, style,
/// nav, and footer subtrees.
fn element_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_text(element, &mut raw);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            Node::Element(el) if !SKIPPED_ELEMENTS.contains(&el.name()) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_the_article_region() {
        let html = r#"
            <html><head><title>Page title</title></head><body>
            <nav>Home About Contact</nav>
            <article>This is the main article content, long enough to qualify.</article>
            <footer>copyright</footer>
            </body></html>
        "#;
        let page = parse_page(html, 20);
        assert_eq!(page.title.as_deref(), Some("Page title"));
        assert_eq!(page.content, "This is the main article content, long enough to qualify.");
    }

    #[test]
    fn falls_back_to_the_body_when_regions_are_too_short() {
        let html = r#"
            <html><body>
            <article>tiny</article>
            <p>Everything else in the body becomes the fallback content region.</p>
            </body></html>
        "#;
        let page = parse_page(html, 30);
        assert!(page.content.contains("fallback content region"));
        assert!(page.content.contains("tiny"));
    }

    #[test]
    fn skips_script_style_nav_and_footer_text() {
        let html = r#"
            <html><body>
            <script>var tracked = true;</script>
            <style>.a { color: red }</style>
            <nav>navigation links</nav>
            <main>Visible main content of a reasonable length here.</main>
            <footer>footer text</footer>
            </body></html>
        "#;
        let page = parse_page(html, 10);
        assert_eq!(page.content, "Visible main content of a reasonable length here.");
    }

    #[test]
    fn collects_headings_in_document_order() {
        let html = r#"
            <html><body>
            <h1>First</h1>
            <main>Some content that is long enough for the threshold.</main>
            <h2>Second</h2>
            <h3>Third</h3>
            <h4>Ignored</h4>
            </body></html>
        "#;
        let page = parse_page(html, 10);
        assert_eq!(page.headings, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn collapses_whitespace_runs() {
        let html = "<html><body><main>spaced   \n\n  out     text over the minimum</main></body></html>";
        let page = parse_page(html, 5);
        assert_eq!(page.content, "spaced out text over the minimum");
    }
}

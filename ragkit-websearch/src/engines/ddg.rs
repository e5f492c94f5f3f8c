//! DuckDuckGo HTML-endpoint result parsing.

use ragkit_core::{Result, SearchHit};
use scraper::Html;

use super::{selector, text_of};
use crate::url_clean::clean_url;

/// Parse a `html.duckduckgo.com` results page.
///
/// A result contributes a hit only when title, URL, and snippet are all
/// present. Ranks follow the result's position on the page.
pub(crate) fn parse(html: &str) -> Result<Vec<SearchHit>> {
    let document = Html::parse_document(html);
    let result_sel = selector("duckduckgo", ".result__body")?;
    let title_sel = selector("duckduckgo", ".result__title a")?;
    let snippet_sel = selector("duckduckgo", ".result__snippet")?;

    let mut hits = Vec::new();
    for (index, result) in document.select(&result_sel).enumerate() {
        let Some(title_el) = result.select(&title_sel).next() else { continue };
        let title = text_of(&title_el);
        let Some(href) = title_el.value().attr("href") else { continue };
        let snippet =
            result.select(&snippet_sel).next().map(|el| text_of(&el)).unwrap_or_default();

        if title.is_empty() || snippet.is_empty() {
            continue;
        }
        hits.push(SearchHit { title, url: clean_url(href), snippet, rank: index + 1 });
    }

    Ok(hits)
}

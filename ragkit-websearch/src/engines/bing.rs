//! Bing result parsing.
//!
//! Bing is more sensitive to the User-Agent than DuckDuckGo; the
//! configured UA should be a recent browser string.

use ragkit_core::{Result, SearchHit};
use scraper::Html;

use super::{selector, text_of};
use crate::url_clean::clean_url;

/// Parse a `www.bing.com/search` results page. Snippets are optional.
pub(crate) fn parse(html: &str) -> Result<Vec<SearchHit>> {
    let document = Html::parse_document(html);
    let result_sel = selector("bing", ".b_algo")?;
    let title_sel = selector("bing", "h2 a")?;
    let snippet_sel = selector("bing", ".b_caption p, .b_lineclamp2, .b_algoSlug")?;

    let mut hits = Vec::new();
    for (index, result) in document.select(&result_sel).enumerate() {
        let Some(title_el) = result.select(&title_sel).next() else { continue };
        let title = text_of(&title_el);
        let Some(href) = title_el.value().attr("href") else { continue };
        if title.is_empty() {
            continue;
        }
        let snippet =
            result.select(&snippet_sel).next().map(|el| text_of(&el)).unwrap_or_default();

        hits.push(SearchHit { title, url: clean_url(href), snippet, rank: index + 1 });
    }

    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
        <html><body>
        <li class="b_algo">
            <h2><a href="https://doc.rust-lang.org/std/">std - Rust</a></h2>
            <div class="b_caption"><p>Standard library documentation.</p></div>
        </li>
        <li class="b_algo">
            <h2><a href="https://crates.io/?utm_source=bing">crates.io</a></h2>
        </li>
        </body></html>
    "#;

    #[test]
    fn parses_results_with_and_without_snippets() {
        let hits = parse(FIXTURE).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "std - Rust");
        assert_eq!(hits[0].snippet, "Standard library documentation.");
        assert_eq!(hits[1].snippet, "");
        assert_eq!(hits[1].url, "https://crates.io/");
        assert_eq!(hits[1].rank, 2);
    }
}

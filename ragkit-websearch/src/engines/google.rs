//! Google result parsing.
//!
//! Google's markup changes often; the selectors here cover the current
//! desktop layout and may need refreshing when it shifts.

use ragkit_core::{Result, SearchHit};
use scraper::Html;

use super::{selector, text_of};
use crate::url_clean::clean_url;

/// Parse a `www.google.com/search` results page.
///
/// Only absolute `http(s)` result links are kept.
pub(crate) fn parse(html: &str) -> Result<Vec<SearchHit>> {
    let document = Html::parse_document(html);
    let result_sel = selector("google", "div.g")?;
    let title_sel = selector("google", "h3")?;
    let link_sel = selector("google", "a")?;
    let snippet_sel =
        selector("google", r#"div[style*="-webkit-line-clamp"], .VwiC3b, .y6099c"#)?;

    let mut hits = Vec::new();
    for (index, result) in document.select(&result_sel).enumerate() {
        let Some(title_el) = result.select(&title_sel).next() else { continue };
        let title = text_of(&title_el);
        let Some(href) =
            result.select(&link_sel).next().and_then(|el| el.value().attr("href"))
        else {
            continue;
        };
        if title.is_empty() || !href.starts_with("http") {
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
        <div class="g">
            <a href="https://doc.rust-lang.org/reference/"><h3>The Rust Reference</h3></a>
            <div class="VwiC3b">The language reference.</div>
        </div>
        <div class="g">
            <a href="/search?q=related"><h3>Relative link result</h3></a>
        </div>
        </body></html>
    "#;

    #[test]
    fn keeps_absolute_links_only() {
        let hits = parse(FIXTURE).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "The Rust Reference");
        assert_eq!(hits[0].url, "https://doc.rust-lang.org/reference/");
        assert_eq!(hits[0].snippet, "The language reference.");
    }
}

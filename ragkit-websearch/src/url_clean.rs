//! Cleanup of result URLs: redirect unwrapping, scheme fixes, and
//! tracking-parameter removal.

use url::Url;

/// Query parameters stripped from every cleaned URL.
const TRACKING_PARAMS: [&str; 7] =
    ["utm_source", "utm_medium", "utm_campaign", "utm_content", "utm_term", "fbclid", "gclid"];

/// Normalize a result URL.
///
/// Unwraps DuckDuckGo `uddg=` redirect links, upgrades scheme-relative
/// `//` URLs to `https`, and strips common tracking parameters. URLs
/// that cannot be parsed are returned unchanged.
pub fn clean_url(raw: &str) -> String {
    let mut candidate = raw.to_string();
    if candidate.starts_with("//") {
        candidate = format!("https:{candidate}");
    }

    if let Ok(parsed) = Url::parse(&candidate) {
        let is_ddg_redirect = parsed.host_str().is_some_and(|h| h.ends_with("duckduckgo.com"))
            && parsed.path().starts_with("/l/");
        if is_ddg_redirect {
            if let Some((_, target)) = parsed.query_pairs().find(|(key, _)| key == "uddg") {
                candidate = target.into_owned();
            }
        }
    }

    match Url::parse(&candidate) {
        Ok(parsed) => strip_tracking_params(parsed).to_string(),
        Err(_) => candidate,
    }
}

fn strip_tracking_params(mut url: Url) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !TRACKING_PARAMS.contains(&key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.set_query(None);
    if !kept.is_empty() {
        let mut serializer = url.query_pairs_mut();
        for (key, value) in &kept {
            serializer.append_pair(key, value);
        }
    }
    url
}

/// The lowercased host of a URL, or an empty string when unparseable.
pub fn domain_of(url: &str) -> String {
    Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_lowercase)).unwrap_or_default()
}

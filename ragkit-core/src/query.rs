//! Query text utilities: normalization, validation, and file-reference
//! extraction.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::{RagError, Result};

/// Matches path-like tokens carrying a file extension, e.g. `src/lib.rs`
/// or `notes.md`.
static FILE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w./\\-]+\.[A-Za-z0-9]+").unwrap());

/// Normalize query text before embedding.
///
/// Case-folds, strips diacritics via NFD decomposition, replaces
/// punctuation with spaces, and collapses runs of whitespace.
///
/// # Example
///
/// ```rust,ignore
/// assert_eq!(normalize_text("  Où est le CAFÉ?! "), "ou est le cafe");
/// ```
pub fn normalize_text(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| if c.is_alphanumeric() || c == '_' || c.is_whitespace() { c } else { ' ' })
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Validate that a query is usable.
///
/// # Errors
///
/// Returns [`RagError::Validation`] if the trimmed query is empty or
/// shorter than 2 characters.
pub fn validate_query(query: &str) -> Result<()> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(RagError::Validation("query must not be empty".to_string()));
    }
    if trimmed.chars().count() < 2 {
        return Err(RagError::Validation(
            "query must contain at least 2 characters".to_string(),
        ));
    }
    Ok(())
}

/// Extract explicit file references from a query.
///
/// A token qualifies when its extension appears in `allowed_extensions`
/// (lowercase, with leading dot). Both the token itself and its basename
/// are emitted, deduplicated, so that `src/main.rs` matches chunks
/// titled either `src/main.rs` or `main.rs`.
pub fn file_references(query: &str, allowed_extensions: &[String]) -> Vec<String> {
    let mut references = Vec::new();

    for token in FILE_TOKEN_RE.find_iter(query) {
        let token = token.as_str();
        let extension = match token.rfind('.') {
            Some(pos) => token[pos..].to_lowercase(),
            None => continue,
        };
        if !allowed_extensions.contains(&extension) {
            continue;
        }

        let basename = token.rsplit(['/', '\\']).next().unwrap_or(token);
        for candidate in [token, basename] {
            if !references.iter().any(|r| r == candidate) {
                references.push(candidate.to_string());
            }
        }
    }

    references
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extensions() -> Vec<String> {
        vec![".txt".to_string(), ".md".to_string(), ".rs".to_string()]
    }

    #[test]
    fn normalize_lowercases_and_strips_diacritics() {
        assert_eq!(normalize_text("Où est le CAFÉ?"), "ou est le cafe");
    }

    #[test]
    fn normalize_collapses_punctuation_and_whitespace() {
        assert_eq!(normalize_text("  hello,   world!!  "), "hello world");
        assert_eq!(normalize_text("foo-bar_baz"), "foo bar_baz");
    }

    #[test]
    fn normalize_of_punctuation_only_text_is_empty() {
        assert_eq!(normalize_text("?!... ---"), "");
    }

    #[test]
    fn validate_rejects_empty_and_short_queries() {
        assert!(matches!(validate_query(""), Err(RagError::Validation(_))));
        assert!(matches!(validate_query("   "), Err(RagError::Validation(_))));
        assert!(matches!(validate_query("a"), Err(RagError::Validation(_))));
        assert!(validate_query("ok").is_ok());
    }

    #[test]
    fn file_references_finds_allowed_extensions_only() {
        let refs = file_references("compare notes.md with data.csv", &extensions());
        assert_eq!(refs, vec!["notes.md"]);
    }

    #[test]
    fn file_references_emits_path_and_basename() {
        let refs = file_references("what does src/main.rs do?", &extensions());
        assert_eq!(refs, vec!["src/main.rs", "main.rs"]);
    }

    #[test]
    fn file_references_deduplicates() {
        let refs = file_references("main.rs and main.rs again", &extensions());
        assert_eq!(refs, vec!["main.rs"]);
    }

    #[test]
    fn plain_queries_have_no_file_references() {
        assert!(file_references("how does chunking work", &extensions()).is_empty());
    }
}

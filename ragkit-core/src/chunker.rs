//! Splitting documents into bounded, overlapping chunks.
//!
//! [`TextChunker`] tries a priority-ordered list of separators (paragraph
//! break, line break, sentence terminators, space) and falls back to
//! fixed-width character slicing when no separator splits the text. All
//! sizes are measured in characters, never bytes, so a split can never
//! land inside a UTF-8 code point.

use crate::config::ChunkingConfig;
use crate::document::{Chunk, Document};
use crate::error::Result;

/// Separators tried in priority order when splitting oversized text.
const SEPARATORS: [&str; 6] = ["\n\n", "\n", ". ", "! ", "? ", " "];

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with content and metadata but no
/// embeddings; embeddings are attached later by the engine.
pub trait Chunker: Send + Sync {
    /// Split a document into ordered chunks.
    ///
    /// Returns an empty `Vec` if the document content is empty or
    /// whitespace-only.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;

    /// Split several documents, flattening the results in input order.
    fn chunk_many(&self, documents: &[Document]) -> Vec<Chunk> {
        documents.iter().flat_map(|document| self.chunk(document)).collect()
    }

    /// Estimate how many chunks a text of this length would produce.
    fn estimate_count(&self, text: &str) -> usize;
}

/// Separator-aware chunker with configurable size bound and overlap.
///
/// # Example
///
/// ```rust,ignore
/// use ragkit_core::{ChunkingConfig, Chunker, TextChunker};
///
/// let chunker = TextChunker::new(ChunkingConfig::default())?;
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct TextChunker {
    config: ChunkingConfig,
}

impl TextChunker {
    /// Create a chunker, validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`](crate::RagError::Config) if
    /// `max_chunk_size` is zero or `overlap >= max_chunk_size`.
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    fn split_text(&self, text: &str, separators: &[&str]) -> Vec<String> {
        if char_len(text) <= self.config.max_chunk_size {
            return vec![text.to_string()];
        }

        for (i, separator) in separators.iter().enumerate() {
            let parts = split_keeping_separator(text, separator);
            if parts.len() > 1 {
                // Oversized merged chunks are re-split with the separators
                // that remain below this one.
                return self
                    .merge_parts(&parts)
                    .into_iter()
                    .flat_map(|piece| {
                        if char_len(&piece) > self.config.max_chunk_size {
                            self.split_text(&piece, &separators[i + 1..])
                        } else {
                            vec![piece]
                        }
                    })
                    .collect();
            }
        }

        self.split_by_characters(text)
    }

    /// Accumulate separator-delimited parts into chunks that respect the
    /// size bound, seeding each new chunk with the trailing `overlap`
    /// characters of the previous one.
    fn merge_parts(&self, parts: &[&str]) -> Vec<String> {
        let mut chunks: Vec<String> = Vec::new();
        let mut current = String::new();

        for part in parts {
            if char_len(&current) + char_len(part) <= self.config.max_chunk_size {
                current.push_str(part);
            } else {
                let flushed = current.trim();
                if !flushed.is_empty() {
                    chunks.push(flushed.to_string());
                }
                current = match chunks.last() {
                    Some(previous) if self.config.overlap > 0 => {
                        format!("{}{part}", tail_chars(previous, self.config.overlap))
                    }
                    _ => (*part).to_string(),
                };
            }
        }

        let flushed = current.trim();
        if !flushed.is_empty() {
            chunks.push(flushed.to_string());
        }

        chunks
    }

    /// Fixed-width character slicing, backing off to the last space within
    /// the window to avoid mid-word cuts. The window re-advances by at
    /// least one character so progress is guaranteed.
    fn split_by_characters(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            // The window end is deliberately left unclamped when it runs
            // past the text: the final re-advance then lands beyond the
            // last overlap window instead of emitting a short tail chunk.
            let mut end = start + self.config.max_chunk_size;

            if end < chars.len() {
                if let Some(offset) = chars[start..end].iter().rposition(|c| *c == ' ') {
                    if offset > 0 {
                        end = start + offset;
                    }
                }
            }

            let piece: String = chars[start..end.min(chars.len())].iter().collect();
            let trimmed = piece.trim();
            if !trimmed.is_empty() {
                chunks.push(trimmed.to_string());
            }

            start = (start + 1).max(end.saturating_sub(self.config.overlap));
        }

        chunks
    }
}

impl Chunker for TextChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.content.trim().is_empty() {
            return Vec::new();
        }

        let pieces = self.split_text(&document.content, &SEPARATORS);
        let total = pieces.len();

        pieces
            .into_iter()
            .enumerate()
            .map(|(index, piece)| {
                let mut metadata = document.metadata.clone();
                metadata.chunk_index = Some(index);
                metadata.total_chunks = Some(total);
                Chunk {
                    id: format!("{}_{index}", document.id),
                    content: piece.trim().to_string(),
                    embedding: None,
                    metadata,
                }
            })
            .collect()
    }

    fn estimate_count(&self, text: &str) -> usize {
        let len = char_len(text);
        if len <= self.config.max_chunk_size {
            return 1;
        }
        let average =
            self.config.max_chunk_size as f64 - self.config.overlap as f64 / 2.0;
        (len as f64 / average).ceil() as usize
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// The trailing `count` characters of `text`.
fn tail_chars(text: &str, count: usize) -> String {
    let skip = char_len(text).saturating_sub(count);
    text.chars().skip(skip).collect()
}

/// Split at a separator, keeping the separator attached to the preceding
/// part.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        parts.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        parts.push(&text[start..]);
    }

    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn chunker(max_chunk_size: usize, overlap: usize) -> TextChunker {
        TextChunker::new(ChunkingConfig { max_chunk_size, overlap }).unwrap()
    }

    fn doc(content: &str) -> Document {
        Document::from_manual("doc", content, Some("doc".to_string()))
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunks = chunker(100, 20).chunk(&doc("short text"));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].id, "doc_0");
        assert_eq!(chunks[0].content, "short text");
        assert_eq!(chunks[0].metadata.chunk_index, Some(0));
        assert_eq!(chunks[0].metadata.total_chunks, Some(1));
        assert!(chunks[0].embedding.is_none());
    }

    #[test]
    fn empty_document_yields_no_chunks() {
        assert!(chunker(100, 20).chunk(&doc("")).is_empty());
        assert!(chunker(100, 20).chunk(&doc("   \n\n  ")).is_empty());
    }

    #[test]
    fn paragraphs_are_preferred_split_points() {
        let first = "a".repeat(60);
        let second = "b".repeat(60);
        let text = format!("{first}\n\n{second}");
        let chunks = chunker(100, 0).chunk(&doc(&text));
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, first);
        assert_eq!(chunks[1].content, second);
    }

    #[test]
    fn every_chunk_respects_the_size_bound() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(40);
        let chunks = chunker(120, 30).chunk(&doc(&text));
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.content.chars().count() <= 120);
        }
    }

    #[test]
    fn fallback_split_repeats_overlap_at_chunk_boundaries() {
        // No separator appears anywhere, so character slicing is used.
        let text: String =
            (0..1200).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let chunks = chunker(500, 100).chunk(&doc(&text));
        assert_eq!(chunks.len(), 3);
        for chunk in &chunks {
            assert!(chunk.content.chars().count() <= 500);
        }
        let tail: String =
            chunks[0].content.chars().skip(chunks[0].content.chars().count() - 100).collect();
        assert!(chunks[1].content.starts_with(&tail));
    }

    #[test]
    fn space_separated_words_are_never_cut_mid_word() {
        let text = format!("{} {}", "x".repeat(80), "y".repeat(80));
        let chunks = chunker(100, 10).chunk(&doc(&text));
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "x".repeat(80));
        // The second chunk is seeded with the previous chunk's overlap tail.
        assert!(chunks[1].content.starts_with(&"x".repeat(10)));
        assert!(chunks[1].content.ends_with(&"y".repeat(80)));
    }

    #[test]
    fn multibyte_text_never_splits_a_code_point() {
        let text = "héllo wörld ✓ ".repeat(100);
        let chunks = chunker(50, 10).chunk(&doc(&text));
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.content.chars().count() <= 50);
        }
    }

    #[test]
    fn chunk_many_flattens_in_document_order() {
        let docs = vec![
            Document::from_manual("a", "first", None),
            Document::from_manual("b", "second", None),
        ];
        let chunks = chunker(100, 0).chunk_many(&docs);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].id, "a_0");
        assert_eq!(chunks[1].id, "b_0");
    }

    #[test]
    fn estimate_count_matches_the_single_chunk_case() {
        let c = chunker(500, 100);
        assert_eq!(c.estimate_count("short"), 1);
        assert_eq!(c.estimate_count(&"a".repeat(1200)), 3);
    }

    #[test]
    fn invalid_configs_are_rejected_at_construction() {
        assert!(TextChunker::new(ChunkingConfig { max_chunk_size: 0, overlap: 0 }).is_err());
        assert!(TextChunker::new(ChunkingConfig { max_chunk_size: 100, overlap: 100 }).is_err());
        assert!(TextChunker::new(ChunkingConfig { max_chunk_size: 100, overlap: 250 }).is_err());
    }
}

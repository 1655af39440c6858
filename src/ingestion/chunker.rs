//! Recursive character splitting with overlap and offset tracking

use std::collections::VecDeque;

use crate::config::ChunkingConfig;
use crate::types::document::{Chunk, Document};

/// Separator priority: paragraph, line, sentence, word. Text with none of
/// these falls back to a hard character cut.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", ". ", " "];

/// Text splitter with configurable size and overlap, both measured in
/// characters.
///
/// Splitting walks the separator priority list so chunks end on natural
/// boundaries where possible, then merges adjacent pieces up to the chunk
/// size, carrying up to `chunk_overlap` characters of tail into the next
/// chunk. Each chunk records its starting character offset within the parent
/// document, strictly increasing per document.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    /// Create a new splitter
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Create a splitter from configuration
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Split a batch of documents into chunks, in input order.
    ///
    /// Documents with empty content produce zero chunks. Each chunk inherits
    /// its parent's metadata augmented with the `start_index` offset.
    pub fn split_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for document in documents {
            for (start_index, content) in self.split_text(&document.content) {
                chunks.push(Chunk::from_parent(document, content.to_string(), start_index));
            }
        }
        chunks
    }

    /// Split text into `(char_offset, content)` pairs.
    ///
    /// Every content piece is at most `chunk_size` characters, offsets are
    /// strictly increasing, and consecutive pieces overlap by at most
    /// `chunk_overlap` characters.
    pub fn split_text<'a>(&self, text: &'a str) -> Vec<(usize, &'a str)> {
        let mut atoms = Vec::new();
        self.atomize(text, 0, text.len(), &SEPARATORS, &mut atoms);

        let merged = self.merge(text, &atoms);

        let mut out: Vec<(usize, &str)> = Vec::new();
        for (start, end) in merged {
            let raw = &text[start..end];
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            let leading = raw.len() - raw.trim_start().len();
            let char_start = text[..start + leading].chars().count();
            if out.last().map_or(true, |&(prev, _)| char_start > prev) {
                out.push((char_start, trimmed));
            }
        }
        out
    }

    /// Recursively break `text[start..end]` into contiguous pieces of at most
    /// `chunk_size` characters, preferring earlier separators in the list.
    fn atomize(
        &self,
        text: &str,
        start: usize,
        end: usize,
        separators: &[&str],
        out: &mut Vec<(usize, usize)>,
    ) {
        if start == end {
            return;
        }
        let piece = &text[start..end];
        if piece.chars().count() <= self.chunk_size {
            out.push((start, end));
            return;
        }

        for (i, separator) in separators.iter().enumerate() {
            if !piece.contains(separator) {
                continue;
            }
            // Split keeping the separator attached to the preceding segment,
            // so merged runs stay contiguous slices of the original text.
            let remaining = &separators[i + 1..];
            let mut segment_start = start;
            while let Some(pos) = text[segment_start..end].find(separator) {
                let segment_end = segment_start + pos + separator.len();
                self.atomize(text, segment_start, segment_end, remaining, out);
                segment_start = segment_end;
            }
            if segment_start < end {
                self.atomize(text, segment_start, end, remaining, out);
            }
            return;
        }

        // No separator left: hard cut at character boundaries.
        let mut segment_start = start;
        let mut chars_in_segment = 0;
        for (offset, _) in piece.char_indices() {
            if chars_in_segment == self.chunk_size {
                out.push((segment_start, start + offset));
                segment_start = start + offset;
                chars_in_segment = 0;
            }
            chars_in_segment += 1;
        }
        if segment_start < end {
            out.push((segment_start, end));
        }
    }

    /// Merge adjacent atoms into chunks of at most `chunk_size` characters,
    /// retaining up to `chunk_overlap` trailing characters as the head of the
    /// next chunk.
    fn merge(&self, text: &str, atoms: &[(usize, usize)]) -> Vec<(usize, usize)> {
        let mut chunks = Vec::new();
        // (start, end, char length) of atoms in the current window
        let mut window: VecDeque<(usize, usize, usize)> = VecDeque::new();
        let mut window_len = 0usize;

        for &(start, end) in atoms {
            let atom_len = text[start..end].chars().count();

            if !window.is_empty() && window_len + atom_len > self.chunk_size {
                if let (Some(front), Some(back)) = (window.front(), window.back()) {
                    chunks.push((front.0, back.1));
                }
                while window_len > self.chunk_overlap
                    || (window_len + atom_len > self.chunk_size && window_len > 0)
                {
                    if let Some((_, _, popped)) = window.pop_front() {
                        window_len -= popped;
                    } else {
                        break;
                    }
                }
            }

            window.push_back((start, end, atom_len));
            window_len += atom_len;
        }

        if let (Some(front), Some(back)) = (window.front(), window.back()) {
            chunks.push((front.0, back.1));
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::document::START_INDEX_KEY;

    fn splitter(size: usize, overlap: usize) -> TextSplitter {
        TextSplitter::new(size, overlap)
    }

    #[test]
    fn short_text_yields_single_chunk_at_offset_zero() {
        let text = "The sky is blue. Grass is green.";
        let pieces = splitter(1200, 200).split_text(text);

        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0], (0, text));
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(splitter(1200, 200).split_text("").is_empty());
        assert!(splitter(1200, 200).split_text("   \n\n  ").is_empty());
    }

    #[test]
    fn chunks_respect_size_and_offsets_increase() {
        let sentence = "The quick brown fox jumps over the lazy dog. ";
        let text = sentence.repeat(100);
        let pieces = splitter(200, 40).split_text(&text);

        assert!(pieces.len() > 1);
        let mut last_start = None;
        for (start, content) in &pieces {
            assert!(content.chars().count() <= 200);
            if let Some(prev) = last_start {
                assert!(*start > prev, "offsets must be strictly increasing");
            }
            last_start = Some(*start);
        }
    }

    #[test]
    fn consecutive_chunks_overlap_at_most_configured_amount() {
        let sentence = "Alpha beta gamma delta epsilon zeta eta theta. ";
        let text = sentence.repeat(50);
        let overlap = 60;
        let pieces = splitter(240, overlap).split_text(&text);

        for pair in pieces.windows(2) {
            let (start_a, content_a) = (pair[0].0, pair[0].1);
            let (start_b, _) = (pair[1].0, pair[1].1);
            let end_a = start_a + content_a.chars().count();
            if start_b < end_a {
                assert!(end_a - start_b <= overlap, "overlap {} too large", end_a - start_b);
            }
        }
    }

    #[test]
    fn prefers_paragraph_boundaries() {
        let text = format!("{}\n\n{}", "a".repeat(80), "b".repeat(80));
        let pieces = splitter(100, 10).split_text(&text);

        assert_eq!(pieces.len(), 2);
        assert!(pieces[0].1.chars().all(|c| c == 'a'));
        assert!(pieces[1].1.chars().all(|c| c == 'b'));
        assert_eq!(pieces[1].0, 82);
    }

    #[test]
    fn hard_cut_applies_without_separators() {
        let text = "x".repeat(350);
        let pieces = splitter(100, 20).split_text(&text);

        assert!(pieces.len() >= 4);
        for (_, content) in &pieces {
            assert!(content.chars().count() <= 100);
        }
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        let text = "日本語のテキスト。".repeat(60);
        let pieces = splitter(50, 10).split_text(&text);

        assert!(!pieces.is_empty());
        for (_, content) in &pieces {
            assert!(content.chars().count() <= 50);
        }
    }

    #[test]
    fn split_documents_tags_chunks_with_parent_metadata() {
        let mut doc = Document::new("The sky is blue. Grass is green.");
        doc.set_default_source("file:test.txt");

        let chunks = splitter(1200, 200).split_documents(&[doc]);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].source(), Some("file:test.txt"));
        assert_eq!(chunks[0].metadata[START_INDEX_KEY], serde_json::json!(0));
    }

    #[test]
    fn split_documents_covers_whole_batch() {
        let docs = vec![
            Document::new("First document body. More text here."),
            Document::new("Second document body. Even more text."),
        ];
        let chunks = splitter(1200, 200).split_documents(&docs);
        assert_eq!(chunks.len(), 2);
    }
}

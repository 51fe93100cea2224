//! Text chunking with sentence-aware boundaries and overlap

use unicode_segmentation::UnicodeSegmentation;

/// Text chunker with configurable size and overlap
///
/// Sizes are measured in characters. Every emitted chunk is non-empty,
/// trimmed, and at most `chunk_size` characters long.
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Target chunk size in characters
    chunk_size: usize,
    /// Overlap between chunks
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            overlap: overlap.min(chunk_size - 1),
        }
    }

    /// Split `text` into ordered chunks
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0usize;

        for piece in self.split_into_pieces(text) {
            let piece_len = piece.chars().count();

            // If adding this piece exceeds chunk size, save current chunk
            if current_len > 0 && current_len + piece_len > self.chunk_size {
                push_trimmed(&mut chunks, &current);

                // Start new chunk with overlap, unless the overlap alone would
                // push it over the limit
                current = self.get_overlap_text(&current);
                current_len = current.chars().count();
                if current_len + piece_len > self.chunk_size {
                    current.clear();
                    current_len = 0;
                }
            }

            current.push_str(piece);
            current_len += piece_len;
        }

        push_trimmed(&mut chunks, &current);
        chunks
    }

    /// Sentence-bounded pieces, with sentences longer than `chunk_size`
    /// hard-split into `chunk_size`-character slices
    fn split_into_pieces<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut pieces = Vec::new();

        for sentence in text.split_sentence_bounds() {
            let mut start = 0;
            let mut len = 0;
            for (i, _) in sentence.char_indices() {
                if len == self.chunk_size {
                    pieces.push(&sentence[start..i]);
                    start = i;
                    len = 0;
                }
                len += 1;
            }
            if start < sentence.len() {
                pieces.push(&sentence[start..]);
            }
        }

        pieces
    }

    /// Get overlap text from the end of a chunk
    fn get_overlap_text(&self, text: &str) -> String {
        if self.overlap == 0 {
            return String::new();
        }

        let total = text.chars().count();
        if total <= self.overlap {
            return text.to_string();
        }

        // Byte offset of the first character of the tail
        let start = text
            .char_indices()
            .nth(total - self.overlap)
            .map(|(i, _)| i)
            .unwrap_or(0);
        let overlap_text = &text[start..];

        // Try to start at a sentence boundary
        if let Some(pos) = overlap_text.find(". ") {
            return overlap_text[pos + 2..].to_string();
        }

        // Fall back to word boundary
        if let Some(pos) = overlap_text.find(' ') {
            return overlap_text[pos + 1..].to_string();
        }

        overlap_text.to_string()
    }
}

fn push_trimmed(chunks: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

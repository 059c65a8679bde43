//! Recursive separator-preference splitting with overlap.
//!
//! Pieces are cut at the most natural boundary available — paragraph break,
//! then line break, then sentence end, then comma, then space — and adjacent
//! chunks share an overlap so a sentence sitting on a boundary is retrievable
//! from either side.

use crate::text_util::{char_len, tail_chars};

/// Separators tried in order of preference.
const SEPARATORS: [&str; 7] = ["\n\n", "\n", ". ", "! ", "? ", ", ", " "];

pub struct RecursiveSplitter {
    chunk_size: usize,
    overlap: usize,
}

impl RecursiveSplitter {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        debug_assert!(overlap < chunk_size, "overlap must stay below chunk size");
        Self {
            chunk_size,
            overlap,
        }
    }

    /// Split `text` into trimmed pieces of at most `chunk_size` chars.
    pub fn split(&self, text: &str) -> Vec<String> {
        let mut pieces = self.split_level(text, 0);
        pieces.retain(|p| !p.trim().is_empty());
        pieces
    }

    fn split_level(&self, text: &str, sep_idx: usize) -> Vec<String> {
        if char_len(text) <= self.chunk_size {
            let trimmed = text.trim();
            return if trimmed.is_empty() {
                Vec::new()
            } else {
                vec![trimmed.to_string()]
            };
        }

        let Some(&sep) = SEPARATORS.get(sep_idx) else {
            return self.hard_split(text);
        };
        if !text.contains(sep) {
            return self.split_level(text, sep_idx + 1);
        }

        let mut chunks = Vec::new();
        let mut current = String::new();

        for part in text.split_inclusive(sep) {
            if char_len(part) > self.chunk_size {
                // Oversized segment: flush what we have, recurse deeper.
                if !current.trim().is_empty() {
                    chunks.push(current.trim().to_string());
                }
                current = String::new();
                chunks.extend(self.split_level(part, sep_idx + 1));
                continue;
            }

            if !current.is_empty() && char_len(&current) + char_len(part) > self.chunk_size {
                chunks.push(current.trim().to_string());
                current = tail_chars(&current, self.overlap).to_string();
            }
            current.push_str(part);
        }

        if !current.trim().is_empty() {
            chunks.push(current.trim().to_string());
        }

        chunks
    }

    /// Last resort: fixed-width windows on char boundaries.
    fn hard_split(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let step = self.chunk_size - self.overlap;
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            let piece: String = chars[start..end].iter().collect();
            let piece = piece.trim().to_string();
            if !piece.is_empty() {
                chunks.push(piece);
            }
            if end == chars.len() {
                break;
            }
            start += step;
        }

        chunks
    }
}

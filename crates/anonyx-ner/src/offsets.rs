//! Character ↔ byte offset conversion.
//!
//! The classifier service reports code-point offsets; Rust slices by byte.

/// Pre-computed char → byte table for one text. ASCII text maps 1:1 and
/// skips the table.
pub struct CharOffsets {
    char_to_byte: Vec<usize>,
    len_bytes: usize,
    is_ascii: bool,
}

impl CharOffsets {
    pub fn new(text: &str) -> Self {
        if text.is_ascii() {
            return Self { char_to_byte: Vec::new(), len_bytes: text.len(), is_ascii: true };
        }
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self { char_to_byte, len_bytes: text.len(), is_ascii: false }
    }

    /// Byte offset of char index `idx`, or `None` past the end of the text.
    pub fn byte_of(&self, idx: usize) -> Option<usize> {
        if self.is_ascii {
            return (idx <= self.len_bytes).then_some(idx);
        }
        self.char_to_byte.get(idx).copied()
    }

    /// Convert a half-open char span to bytes. Empty or inverted spans are rejected.
    pub fn byte_span(&self, char_start: usize, char_end: usize) -> Option<(usize, usize)> {
        if char_start >= char_end {
            return None;
        }
        Some((self.byte_of(char_start)?, self.byte_of(char_end)?))
    }
}

//! Contracts for the two editing widgets a session drives, plus in-memory
//! implementations used by the headless binary and the tests.
//!
//! A surface never notifies the session by itself. The host forwards its
//! widget's change callbacks to `SyncedContentSession::on_text_modified` /
//! `on_raw_modified`.

use crate::app::domain::charset::CharsetGuess;

/// A text editing widget. Positions are character indices.
pub trait TextSurface {
    fn with_text(text: String) -> Self;
    fn text(&self) -> String;
    /// Replace the whole content. Counts as one undoable edit.
    fn set_text(&mut self, text: &str);
    fn caret(&self) -> usize;
    fn set_caret(&mut self, pos: usize);
    /// Forget all undo history without touching the content.
    fn discard_undo_history(&mut self);
}

/// A hex/byte editing widget.
pub trait ByteSurface {
    fn with_bytes(bytes: Vec<u8>) -> Self;
    fn bytes(&self) -> Vec<u8>;
    /// Replace the content with bytes that came from the text view.
    /// `text_charset` is the charset the widget should use for its own
    /// character column.
    fn set_bytes(&mut self, bytes: Vec<u8>, text_charset: CharsetGuess);
    fn is_modified(&self) -> bool;
    fn clear_modified(&mut self);
    fn offset(&self) -> u64;
}

#[derive(Debug, Default)]
pub struct MemoryTextSurface {
    text: String,
    caret: usize,
    undo: Vec<String>,
}

impl MemoryTextSurface {
    /// Insert `s` at character index `at` (clamped to the end).
    pub fn insert(&mut self, at: usize, s: &str) {
        self.undo.push(self.text.clone());
        let byte_idx = char_to_byte(&self.text, at);
        self.text.insert_str(byte_idx, s);
        self.caret = at.min(self.len_chars()) + s.chars().count();
    }

    /// Remove `count` characters starting at character index `at`.
    pub fn delete(&mut self, at: usize, count: usize) {
        self.undo.push(self.text.clone());
        let start = char_to_byte(&self.text, at);
        let end = char_to_byte(&self.text, at.saturating_add(count));
        self.text.replace_range(start..end, "");
        self.caret = at.min(self.len_chars());
    }

    pub fn undo(&mut self) -> bool {
        match self.undo.pop() {
            Some(previous) => {
                self.text = previous;
                self.caret = self.caret.min(self.len_chars());
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    fn len_chars(&self) -> usize {
        self.text.chars().count()
    }
}

fn char_to_byte(text: &str, idx: usize) -> usize {
    text.char_indices()
        .nth(idx)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

impl TextSurface for MemoryTextSurface {
    fn with_text(text: String) -> Self {
        Self {
            text,
            caret: 0,
            undo: Vec::new(),
        }
    }

    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.undo.push(std::mem::replace(&mut self.text, text.to_string()));
        self.caret = self.caret.min(self.len_chars());
    }

    fn caret(&self) -> usize {
        self.caret
    }

    fn set_caret(&mut self, pos: usize) {
        self.caret = pos.min(self.len_chars());
    }

    fn discard_undo_history(&mut self) {
        self.undo.clear();
    }
}

#[derive(Debug, Default)]
pub struct MemoryByteSurface {
    data: Vec<u8>,
    offset: u64,
    modified: bool,
    text_charset: Option<CharsetGuess>,
}

impl MemoryByteSurface {
    /// Overwrite one byte. Writing past the end appends.
    pub fn write_byte(&mut self, offset: usize, value: u8) {
        match self.data.get_mut(offset) {
            Some(byte) => *byte = value,
            None => self.data.push(value),
        }
        self.offset = offset as u64;
        self.modified = true;
    }

    pub fn set_offset(&mut self, offset: u64) {
        self.offset = offset.min(self.data.len() as u64);
    }

    pub fn text_charset(&self) -> Option<CharsetGuess> {
        self.text_charset
    }
}

impl ByteSurface for MemoryByteSurface {
    fn with_bytes(bytes: Vec<u8>) -> Self {
        Self {
            data: bytes,
            ..Self::default()
        }
    }

    fn bytes(&self) -> Vec<u8> {
        self.data.clone()
    }

    fn set_bytes(&mut self, bytes: Vec<u8>, text_charset: CharsetGuess) {
        self.data = bytes;
        self.offset = self.offset.min(self.data.len() as u64);
        self.text_charset = Some(text_charset);
    }

    fn is_modified(&self) -> bool {
        self.modified
    }

    fn clear_modified(&mut self) {
        self.modified = false;
    }

    fn offset(&self) -> u64 {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_insert_delete_undo() {
        let mut surface = MemoryTextSurface::with_text("héllo".to_string());
        surface.insert(5, " wörld");
        assert_eq!(surface.text(), "héllo wörld");
        assert_eq!(surface.caret(), 11);

        surface.delete(0, 6);
        assert_eq!(surface.text(), "wörld");
        assert_eq!(surface.caret(), 0);

        assert!(surface.undo());
        assert_eq!(surface.text(), "héllo wörld");
        surface.discard_undo_history();
        assert!(!surface.can_undo());
        assert!(!surface.undo());
    }

    #[test]
    fn test_text_set_text_clamps_caret() {
        let mut surface = MemoryTextSurface::with_text("abcdef".to_string());
        surface.set_caret(6);
        surface.set_text("ab");
        assert_eq!(surface.caret(), 2);
        assert!(surface.can_undo());
        surface.set_caret(99);
        assert_eq!(surface.caret(), 2);
    }

    #[test]
    fn test_byte_surface_modified_flag() {
        let mut surface = MemoryByteSurface::with_bytes(vec![0, 1, 2]);
        assert!(!surface.is_modified());
        surface.write_byte(1, 0xAA);
        surface.write_byte(3, 0xBB);
        assert_eq!(surface.bytes(), vec![0, 0xAA, 2, 0xBB]);
        assert!(surface.is_modified());
        surface.clear_modified();
        assert!(!surface.is_modified());
    }

    #[test]
    fn test_byte_surface_set_bytes_clamps_offset() {
        let mut surface = MemoryByteSurface::with_bytes(vec![0; 16]);
        surface.set_offset(12);
        surface.set_bytes(vec![1, 2, 3], CharsetGuess::Utf8);
        assert_eq!(surface.offset(), 3);
        assert_eq!(surface.text_charset(), Some(CharsetGuess::Utf8));
    }
}

//! Content buffer bound to the editing surface
//!
//! Holds the rope, the last known cursor line and the language hint the
//! buffer was created with. Snapshots for saving are `Rope` clones, which
//! share chunks with the live buffer.

use super::language::LanguageHint;
use ropey::Rope;
use std::io::{self, Write};

#[derive(Clone, Debug)]
pub struct TextBuffer {
    rope: Rope,
    cursor_line: usize,
    language: LanguageHint,
}

impl TextBuffer {
    pub fn new(content: &str, language: LanguageHint) -> Self {
        Self {
            rope: Rope::from_str(content),
            cursor_line: 0,
            language,
        }
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    pub fn snapshot(&self) -> Rope {
        self.rope.clone()
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Streams the content chunk by chunk.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for chunk in self.rope.chunks() {
            writer.write_all(chunk.as_bytes())?;
        }
        Ok(())
    }

    pub fn language(&self) -> LanguageHint {
        self.language
    }

    pub fn cursor_line(&self) -> usize {
        self.cursor_line
    }

    /// Moves the cursor, clamped to the last line.
    pub fn set_cursor_line(&mut self, line: usize) {
        self.cursor_line = line.min(self.last_line());
    }

    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    pub fn line(&self, row: usize) -> Option<String> {
        (row < self.rope.len_lines()).then(|| self.rope.line(row).to_string())
    }

    /// Replaces the whole content, as a surface "set content" does.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.clamp_cursor();
    }

    /// Inserts at a char offset, clamped to the end of the buffer.
    pub fn insert(&mut self, char_idx: usize, text: &str) {
        let at = char_idx.min(self.rope.len_chars());
        self.rope.insert(at, text);
    }

    /// Appends text at the end; the cursor follows to the last line.
    pub fn append(&mut self, text: &str) {
        let end = self.rope.len_chars();
        self.rope.insert(end, text);
        self.cursor_line = self.last_line();
    }

    /// Removes a char range, clamped to the buffer.
    pub fn delete(&mut self, start: usize, end: usize) {
        let len = self.rope.len_chars();
        let (start, end) = (start.min(len), end.min(len));
        if start < end {
            self.rope.remove(start..end);
            self.clamp_cursor();
        }
    }

    fn last_line(&self) -> usize {
        self.rope.len_lines().saturating_sub(1)
    }

    fn clamp_cursor(&mut self) {
        self.cursor_line = self.cursor_line.min(self.last_line());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/text_buffer.rs"]
mod tests;

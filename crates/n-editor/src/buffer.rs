//! Text buffer: the text the motion engine searches through.
//!
//! A `Buffer` wraps a [`ropey::Rope`] and exposes exactly what a host needs
//! to serve character motions: line access, content lengths, and coordinate
//! conversion between `Position` (line, col), rope char indices, and byte
//! offsets into the flattened text (the coordinate space regex matches use).
//!
//! - **Columns are char offsets**, not byte offsets. Column 3 of `"café"` is
//!   `'é'`. Byte offsets only appear in the `byte_*` conversion helpers,
//!   which exist for the search layer.
//!
//! - **Read-mostly.** Motions never edit text; the buffer is loaded once and
//!   searched many times. The flattened `String` is cached so repeated
//!   searches don't re-collect the rope.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ropey::{Rope, RopeSlice};

use crate::position::Position;

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

/// A text buffer backed by a rope.
///
/// All positions are 0-indexed `(line, col)` pairs. Columns count Unicode
/// scalar values (chars).
pub struct Buffer {
    rope: Rope,
    /// Flattened contents, kept in sync with `rope`.
    text: String,
    path: Option<PathBuf>,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// Create an empty buffer with no file path.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            text: String::new(),
            path: None,
        }
    }

    /// Create a buffer from a string.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            text: text.to_string(),
            path: None,
        }
    }

    /// Load a buffer from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid UTF-8.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self {
            rope: Rope::from_str(&text),
            text,
            path: Some(path.to_path_buf()),
        })
    }

    // -- Text access --------------------------------------------------------

    /// The whole buffer as one string slice. Byte offsets into this slice
    /// convert with [`byte_to_pos`](Self::byte_to_pos) and
    /// [`pos_to_byte`](Self::pos_to_byte).
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Total number of lines. An empty buffer has 1 line (the empty line).
    /// A buffer ending with `\n` has a trailing empty line.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total character count (Unicode scalar values, not bytes).
    #[inline]
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// True when the buffer contains no text.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Get a line by 0-indexed line number, including its trailing line
    /// ending. Returns `None` if `line >= line_count()`.
    #[inline]
    #[must_use]
    pub fn line(&self, line: usize) -> Option<RopeSlice<'_>> {
        if line < self.rope.len_lines() {
            Some(self.rope.line(line))
        } else {
            None
        }
    }

    /// Number of chars in a line **excluding** any trailing line ending
    /// (`\n`, `\r\n`, `\r`). Returns `None` if the line doesn't exist.
    #[must_use]
    pub fn line_content_len(&self, line: usize) -> Option<usize> {
        self.line(line).map(|rope_line| {
            let total = rope_line.len_chars();
            if total == 0 {
                return 0;
            }
            let last = rope_line.char(total - 1);
            if last == '\n' {
                if total >= 2 && rope_line.char(total - 2) == '\r' {
                    total - 2
                } else {
                    total - 1
                }
            } else if last == '\r' {
                total - 1
            } else {
                total
            }
        })
    }

    /// The content of a line without its line ending.
    #[must_use]
    pub fn line_text(&self, line: usize) -> Option<String> {
        let len = self.line_content_len(line)?;
        self.line(line).map(|l| l.slice(..len).to_string())
    }

    /// The file this buffer was loaded from, if any.
    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // -- Coordinate conversion ----------------------------------------------

    /// Convert a `Position` to an absolute char index in the rope.
    ///
    /// A column equal to the line's char count (including its line ending)
    /// is accepted as the position just past the line.
    #[must_use]
    pub fn pos_to_char_idx(&self, pos: Position) -> Option<usize> {
        if pos.line >= self.rope.len_lines() {
            return None;
        }
        let line_start = self.rope.line_to_char(pos.line);
        let line_len = self.rope.line(pos.line).len_chars();
        if pos.col > line_len {
            return None;
        }
        Some(line_start + pos.col)
    }

    /// Convert an absolute char index to a `Position`.
    #[must_use]
    pub fn char_idx_to_pos(&self, char_idx: usize) -> Option<Position> {
        if char_idx > self.rope.len_chars() {
            return None;
        }
        let line = self.rope.char_to_line(char_idx);
        let line_start = self.rope.line_to_char(line);
        Some(Position::new(line, char_idx - line_start))
    }

    /// Byte offset into [`text`](Self::text) for a position.
    #[must_use]
    pub fn pos_to_byte(&self, pos: Position) -> Option<usize> {
        self.pos_to_char_idx(pos).map(|idx| self.rope.char_to_byte(idx))
    }

    /// Position of a byte offset into [`text`](Self::text). The offset must
    /// sit on a char boundary.
    #[must_use]
    pub fn byte_to_pos(&self, byte: usize) -> Option<Position> {
        if byte > self.rope.len_bytes() {
            return None;
        }
        self.char_idx_to_pos(self.rope.byte_to_char(byte))
    }

    /// Clamp a position to the nearest cursor cell in the buffer.
    ///
    /// The clamped column uses the content length, so the cursor can sit
    /// one past the last char (where a `till` match against a line break
    /// lands) but never beyond.
    #[must_use]
    pub fn clamp_position(&self, pos: Position) -> Position {
        if self.is_empty() {
            return Position::ZERO;
        }

        let line = pos.line.min(self.line_count() - 1);
        let max_col = self.line_content_len(line).unwrap_or(0);
        Position::new(line, pos.col.min(max_col))
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("lines", &self.line_count())
            .field("chars", &self.len_chars())
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Construction -------------------------------------------------------

    #[test]
    fn new_buffer_is_empty() {
        let buf = Buffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.text(), "");
        assert!(buf.path().is_none());
    }

    #[test]
    fn from_text_basic() {
        let buf = Buffer::from_text("hello\nworld");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.len_chars(), 11);
        assert_eq!(buf.text(), "hello\nworld");
    }

    #[test]
    fn from_file_missing_is_error() {
        let err = Buffer::from_file(Path::new("/definitely/not/here.txt"));
        assert!(err.is_err());
    }

    // -- Line access --------------------------------------------------------

    #[test]
    fn line_content_len_excludes_endings() {
        let buf = Buffer::from_text("ab\ncd\r\nef\rgh");
        assert_eq!(buf.line_content_len(0), Some(2));
        assert_eq!(buf.line_content_len(1), Some(2));
        assert_eq!(buf.line_content_len(2), Some(2));
        assert_eq!(buf.line_content_len(3), Some(2));
        assert_eq!(buf.line_content_len(4), None);
    }

    #[test]
    fn line_text_strips_newline() {
        let buf = Buffer::from_text("foo\nbar");
        assert_eq!(buf.line_text(0).as_deref(), Some("foo"));
        assert_eq!(buf.line_text(1).as_deref(), Some("bar"));
        assert_eq!(buf.line_text(2), None);
    }

    // -- Coordinate conversion ----------------------------------------------

    #[test]
    fn pos_char_idx_roundtrip() {
        let buf = Buffer::from_text("abc\ndef\nghi");
        for idx in 0..=buf.len_chars() {
            let pos = buf.char_idx_to_pos(idx).unwrap();
            assert_eq!(buf.pos_to_char_idx(pos), Some(idx));
        }
    }

    #[test]
    fn byte_conversion_unicode() {
        let buf = Buffer::from_text("café\nx");
        // 'x' is at byte 6 ("caf" 3 + 'é' 2 + '\n' 1).
        assert_eq!(buf.byte_to_pos(6), Some(Position::new(1, 0)));
        assert_eq!(buf.pos_to_byte(Position::new(1, 0)), Some(6));
        assert_eq!(buf.pos_to_byte(Position::new(0, 3)), Some(3));
        assert_eq!(buf.byte_to_pos(100), None);
    }

    #[test]
    fn pos_to_char_idx_out_of_bounds() {
        let buf = Buffer::from_text("abc");
        assert_eq!(buf.pos_to_char_idx(Position::new(0, 4)), None);
        assert_eq!(buf.pos_to_char_idx(Position::new(1, 0)), None);
    }

    // -- Clamping -----------------------------------------------------------

    #[test]
    fn clamp_line_and_col() {
        let buf = Buffer::from_text("abc\nde");
        assert_eq!(buf.clamp_position(Position::new(9, 9)), Position::new(1, 2));
        assert_eq!(buf.clamp_position(Position::new(0, 1)), Position::new(0, 1));
    }

    #[test]
    fn clamp_empty_buffer() {
        let buf = Buffer::new();
        assert_eq!(buf.clamp_position(Position::new(3, 3)), Position::ZERO);
    }

    #[test]
    fn debug_is_compact() {
        let buf = Buffer::from_text("a\nb");
        let dbg = format!("{buf:?}");
        assert!(dbg.contains("lines: 2"));
    }
}

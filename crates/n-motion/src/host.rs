//! The editor environment the engine runs inside.
//!
//! The engine owns no text. Everything it knows about the buffer, the
//! cursor, the mode, and the screen comes through [`Host`]. Calls happen
//! synchronously on one thread; [`Host::read_key`] is the only call that may
//! block.

use n_editor::position::Position;
use n_editor::search::SearchFlags;

use crate::input::Key;
use crate::mode::ModeKey;
use crate::pattern::SearchPattern;

/// Handle to a highlight the host is displaying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

/// The two independent highlight classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkKind {
    /// The cursor cell, while the prompt waits for a char.
    Cursor,
    /// Candidate targets on the current line.
    Char,
}

/// What to highlight.
#[derive(Debug, Clone, Copy)]
pub enum MarkRegion<'a> {
    /// The cell under the cursor.
    Cursor,
    /// Every landing cell of `pattern` on `line`.
    Targets {
        line: usize,
        pattern: &'a SearchPattern,
    },
}

impl MarkRegion<'_> {
    #[must_use]
    pub const fn kind(&self) -> MarkKind {
        match self {
            Self::Cursor => MarkKind::Cursor,
            Self::Targets { .. } => MarkKind::Char,
        }
    }
}

/// How far a search may go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchScope {
    Buffer,
    CurrentLine,
}

/// Severity of a user-visible message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Warning,
    Error,
}

/// Operations the engine consumes from the editor.
pub trait Host {
    /// Block until one key is available.
    fn read_key(&mut self) -> Key;

    /// Move the cursor to the next match of `pattern`, or leave it alone and
    /// return `None`. Never wraps around the buffer.
    fn search(
        &mut self,
        pattern: &SearchPattern,
        flags: SearchFlags,
        scope: SearchScope,
    ) -> Option<Position>;

    fn cursor(&self) -> Position;

    fn set_cursor(&mut self, pos: Position);

    fn mode(&self) -> ModeKey;

    /// Text of a line without its line ending.
    fn line_text(&self, line: usize) -> Option<String>;

    fn mark_region(&mut self, region: MarkRegion<'_>) -> MarkerId;

    fn clear_marker(&mut self, id: MarkerId);

    /// Point the jump mark at `pos`. Visual modes extend the selection to it.
    fn set_jump_mark(&mut self, pos: Position);

    fn notify(&mut self, severity: Severity, message: &str);

    /// Show the prompt text on the command line, or clear it with `None`.
    fn show_prompt(&mut self, text: Option<&str>);

    fn set_cursor_visible(&mut self, visible: bool);

    /// Flush pending screen changes so a mark shows before a blocking read.
    fn redraw(&mut self) {}
}

//! Cursor positions and highlight ranges.
//!
//! All coordinates are **0-indexed** and columns count chars, matching how
//! `ropey` indexes text. The `Display` impls are 1-indexed for humans.

use std::cmp::Ordering;
use std::fmt;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A position in a text buffer: (line, column), both 0-indexed.
///
/// Positions order line first, then column, so "later in the buffer" is
/// simply `>`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    /// Line 0, column 0.
    pub const ZERO: Self = Self { line: 0, col: 0 };

    #[inline]
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// True when `next` lies strictly after `self`: a later line, or the
    /// same line at a larger column. Equal positions are not forward.
    #[inline]
    #[must_use]
    pub const fn moves_forward_to(self, next: Self) -> bool {
        if self.line != next.line {
            return self.line < next.line;
        }
        self.col < next.col
    }

    /// True when `other` is on a different line.
    #[inline]
    #[must_use]
    pub const fn crosses_line(self, other: Self) -> bool {
        self.line != other.line
    }
}

impl Ord for Position {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.line.cmp(&other.line).then(self.col.cmp(&other.col))
    }
}

impl PartialOrd for Position {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.line, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// A half-open range `[start, end)`. Highlight regions for marked target
/// characters are ranges of one or two chars.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Create a range. Panics in debug if `start > end`.
    #[inline]
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        debug_assert!(
            start.line < end.line || (start.line == end.line && start.col <= end.col),
            "Range::new requires start <= end"
        );
        Self { start, end }
    }
}

impl fmt::Debug for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Range({}:{} .. {}:{})",
            self.start.line, self.start.col, self.end.line, self.end.col
        )
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_line_major() {
        assert!(Position::new(0, 100) < Position::new(1, 0));
        assert!(Position::new(2, 3) < Position::new(2, 4));
        assert_eq!(Position::new(1, 1).cmp(&Position::new(1, 1)), Ordering::Equal);
    }

    // -- moves_forward_to ---------------------------------------------------

    #[test]
    fn forward_on_later_line_regardless_of_col() {
        assert!(Position::new(0, 9).moves_forward_to(Position::new(1, 0)));
        assert!(!Position::new(1, 0).moves_forward_to(Position::new(0, 9)));
    }

    #[test]
    fn forward_on_same_line_by_col() {
        assert!(Position::new(3, 1).moves_forward_to(Position::new(3, 2)));
        assert!(!Position::new(3, 2).moves_forward_to(Position::new(3, 1)));
    }

    #[test]
    fn equal_position_is_not_forward() {
        let p = Position::new(4, 4);
        assert!(!p.moves_forward_to(p));
    }

    #[test]
    fn crosses_line() {
        assert!(Position::new(0, 0).crosses_line(Position::new(1, 0)));
        assert!(!Position::new(0, 0).crosses_line(Position::new(0, 7)));
    }

    // -- Formatting ---------------------------------------------------------

    #[test]
    fn debug_is_zero_indexed_display_is_one_indexed() {
        let p = Position::new(2, 5);
        assert_eq!(format!("{p:?}"), "Pos(2:5)");
        assert_eq!(format!("{p}"), "3:6");
    }

    #[test]
    fn range_formatting() {
        let r = Range::new(Position::new(0, 1), Position::new(0, 2));
        assert_eq!(format!("{r:?}"), "Range(0:1 .. 0:2)");
        assert_eq!(format!("{r}"), "1:2-1:3");
    }
}

//! Search: single-step regex search with Vim `search()` semantics.
//!
//! Character motions are built from repeated one-match searches: find the
//! next match after the cursor (or before it, searching backward), never
//! wrapping around the buffer, optionally accepting a match that sits right
//! at the cursor, and optionally refusing to leave a given line.
//!
//! # Landing group
//!
//! A match normally lands the cursor on its first char. A pattern can instead
//! name a capture group [`LANDING_GROUP`]; the cursor then lands where that
//! group starts. This is how `t`/`T` patterns express "the char before the
//! target" and "the char after the target" without lookaround, which the
//! `regex` crate does not support. Candidates overlap freely: every char
//! offset is tried as a match start.
//!
//! A landing char is always on the same line as its match start, because
//! line breaks belong to the line they end. Scans therefore go line by line.

use bitflags::bitflags;
use regex::Regex;

use crate::buffer::Buffer;
use crate::position::{Position, Range};

/// Capture group name that marks where the cursor lands within a match.
pub const LANDING_GROUP: &str = "land";

// ---------------------------------------------------------------------------
// Flags and direction
// ---------------------------------------------------------------------------

bitflags! {
    /// Flags for a single search step, after Vim's `search()` flag letters.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SearchFlags: u8 {
        /// `b`: search toward the start of the buffer.
        const BACKWARD = 1;
        /// `c`: a match landing exactly on the cursor counts.
        const ACCEPT_AT_CURSOR = 1 << 1;
    }
}

/// Search direction.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum SearchDirection {
    Forward,
    Backward,
}

impl SearchDirection {
    /// The opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }

    /// The flags for a strict search in this direction.
    #[must_use]
    pub const fn flags(self) -> SearchFlags {
        match self {
            Self::Forward => SearchFlags::empty(),
            Self::Backward => SearchFlags::BACKWARD,
        }
    }
}

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

/// Where a match put the cursor, and how many chars its landing span covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    pub start: Position,
    pub len: usize,
}

impl Match {
    /// The landing span as a range (used for highlighting).
    #[must_use]
    pub const fn range(self) -> Range {
        Range::new(
            self.start,
            Position::new(self.start.line, self.start.col + self.len),
        )
    }
}

// ---------------------------------------------------------------------------
// Search functions
// ---------------------------------------------------------------------------

/// Find the next match of `re` from `from`, without wrapping.
///
/// - Forward: the first match landing after `from` (or at it, with
///   [`SearchFlags::ACCEPT_AT_CURSOR`]).
/// - Backward: the last match landing before `from` (or at it).
/// - `stop_line`: matches landing past this line in the search direction
///   are rejected, so `Some(from.line)` keeps the search on the current line.
#[must_use]
pub fn find(
    buf: &Buffer,
    re: &Regex,
    from: Position,
    flags: SearchFlags,
    stop_line: Option<usize>,
) -> Option<Match> {
    if buf.is_empty() {
        return None;
    }
    let cursor = buf.pos_to_byte(buf.clamp_position(from))?;
    let accept = flags.contains(SearchFlags::ACCEPT_AT_CURSOR);

    if flags.contains(SearchFlags::BACKWARD) {
        let lowest = stop_line.unwrap_or(0).min(from.line);
        for line in (lowest..=from.line.min(buf.line_count() - 1)).rev() {
            let (lo, hi) = line_bytes(buf, line)?;
            let best = landings(buf.text(), re, lo, hi)
                .take_while(|&(s, _)| {
                    let s = settle(buf, s);
                    s < cursor || (accept && s == cursor)
                })
                .last();
            if let Some((s, e)) = best {
                return to_match(buf, s, e);
            }
        }
        None
    } else {
        let (lo, _) = line_bytes(buf, from.line.min(buf.line_count() - 1))?;
        let (s, e) = landings(buf.text(), re, lo, buf.text().len())
            .find(|&(s, _)| {
                let s = settle(buf, s);
                s > cursor || (accept && s == cursor)
            })?;
        let m = to_match(buf, s, e)?;
        if stop_line.is_some_and(|stop| m.start.line > stop) {
            return None;
        }
        Some(m)
    }
}

/// Every landing span of `re` on one line, in order. Used to paint the
/// target-character highlight for the current line.
#[must_use]
pub fn find_all_in_line(buf: &Buffer, re: &Regex, line: usize) -> Vec<Match> {
    let Some((lo, hi)) = line_bytes(buf, line) else {
        return Vec::new();
    };
    landings(buf.text(), re, lo, hi)
        .filter_map(|(s, e)| to_match(buf, s, e))
        .filter(|m| m.start.line == line)
        .collect()
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Byte span `[start, end)` of a line, line ending included.
fn line_bytes(buf: &Buffer, line: usize) -> Option<(usize, usize)> {
    let lo = buf.pos_to_byte(Position::new(line, 0))?;
    let hi = if line + 1 < buf.line_count() {
        buf.pos_to_byte(Position::new(line + 1, 0))?
    } else {
        buf.text().len()
    };
    Some((lo, hi))
}

/// Landing spans (byte offsets) of all matches whose match start lies in
/// `[from, to)`, overlapping ones included.
fn landings<'a>(
    text: &'a str,
    re: &'a Regex,
    from: usize,
    to: usize,
) -> impl Iterator<Item = (usize, usize)> + 'a {
    let mut at = from;
    std::iter::from_fn(move || {
        if at >= to || at > text.len() {
            return None;
        }
        let caps = re.captures_at(text, at)?;
        let whole = caps.get(0)?;
        if whole.start() >= to {
            return None;
        }
        at = whole.start() + text[whole.start()..].chars().next().map_or(1, char::len_utf8);
        let span = caps.name(LANDING_GROUP).unwrap_or(whole);
        Some((span.start(), span.end()))
    })
}

/// The byte the cursor rests on for a landing at `byte`. A landing on the
/// `'\n'` of a `"\r\n"` pair settles on the `'\r'`.
fn settle(buf: &Buffer, byte: usize) -> usize {
    buf.byte_to_pos(byte)
        .and_then(|pos| buf.pos_to_byte(buf.clamp_position(pos)))
        .unwrap_or(byte)
}

fn to_match(buf: &Buffer, start: usize, end: usize) -> Option<Match> {
    let start_pos = buf.clamp_position(buf.byte_to_pos(start)?);
    let len = buf.text()[start..end].chars().count();
    Some(Match {
        start: start_pos,
        len,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

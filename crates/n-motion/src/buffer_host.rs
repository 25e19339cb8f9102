//! An in-memory [`Host`] over an n-editor [`Buffer`].
//!
//! Input comes from a key queue filled ahead of time, so a whole session can
//! be scripted. An exhausted queue reads as `<Esc>`. Markers are resolved to
//! ranges when they are created, which lets callers inspect exactly what
//! would be painted.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap, VecDeque};

use n_editor::buffer::Buffer;
use n_editor::mode::Mode;
use n_editor::position::{Position, Range};
use n_editor::search::{self, Match, SearchFlags};
use regex::Regex;
use tracing::{trace, warn};

use crate::host::{Host, MarkKind, MarkRegion, MarkerId, SearchScope, Severity};
use crate::input::Key;
use crate::mode::ModeKey;
use crate::pattern::SearchPattern;

/// A live highlight and the cells it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub kind: MarkKind,
    pub ranges: Vec<Range>,
}

#[derive(Debug)]
pub struct BufferHost {
    buffer: Buffer,
    cursor: Position,
    mode: Mode,
    input: VecDeque<Key>,
    reads: usize,
    redraws: usize,
    markers: BTreeMap<MarkerId, Marker>,
    next_marker: u64,
    jump_mark: Option<Position>,
    messages: Vec<(Severity, String)>,
    prompt: Option<String>,
    cursor_visible: bool,
    regexes: HashMap<SearchPattern, Regex>,
}

impl BufferHost {
    #[must_use]
    pub fn new(buffer: Buffer) -> Self {
        Self {
            buffer,
            cursor: Position::ZERO,
            mode: Mode::Normal,
            input: VecDeque::new(),
            reads: 0,
            redraws: 0,
            markers: BTreeMap::new(),
            next_marker: 1,
            jump_mark: None,
            messages: Vec::new(),
            prompt: None,
            cursor_visible: true,
            regexes: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_text(text: &str) -> Self {
        Self::new(Buffer::from_text(text))
    }

    // -- Mode and cursor ----------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn editor_mode(&self) -> Mode {
        self.mode
    }

    pub const fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Move the cursor the way the user would, outside any motion.
    pub fn move_to(&mut self, pos: Position) {
        self.cursor = self.buffer.clamp_position(pos);
    }

    #[inline]
    #[must_use]
    pub const fn jump_mark(&self) -> Option<Position> {
        self.jump_mark
    }

    // -- Input --------------------------------------------------------------

    pub fn push_key(&mut self, key: Key) {
        self.input.push_back(key);
    }

    /// Queue a key script such as `"fa<CR>"`.
    pub fn push_keys(&mut self, script: &str) {
        self.input.extend(Key::parse_sequence(script));
    }

    /// Take the next queued key without counting it as a prompt read.
    pub fn next_key(&mut self) -> Option<Key> {
        self.input.pop_front()
    }

    /// Keys still queued.
    #[inline]
    #[must_use]
    pub fn pending(&self) -> usize {
        self.input.len()
    }

    /// How many times [`Host::read_key`] was called.
    #[inline]
    #[must_use]
    pub const fn reads(&self) -> usize {
        self.reads
    }

    // -- Screen state -------------------------------------------------------

    pub fn markers(&self) -> impl Iterator<Item = (MarkerId, &Marker)> {
        self.markers.iter().map(|(id, m)| (*id, m))
    }

    #[must_use]
    pub fn markers_of(&self, kind: MarkKind) -> Vec<&Marker> {
        self.markers.values().filter(|m| m.kind == kind).collect()
    }

    /// Every cell covered by a live char marker, in buffer order.
    #[must_use]
    pub fn char_marks(&self) -> Vec<Range> {
        let mut ranges: Vec<Range> = self
            .markers_of(MarkKind::Char)
            .into_iter()
            .flat_map(|m| m.ranges.iter().copied())
            .collect();
        ranges.sort_by_key(|r| r.start);
        ranges
    }

    #[must_use]
    pub fn messages(&self) -> &[(Severity, String)] {
        &self.messages
    }

    #[must_use]
    pub fn prompt_text(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    #[inline]
    #[must_use]
    pub const fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    #[inline]
    #[must_use]
    pub const fn redraws(&self) -> usize {
        self.redraws
    }
}

impl Host for BufferHost {
    fn read_key(&mut self) -> Key {
        self.reads += 1;
        self.input.pop_front().unwrap_or(Key::Escape)
    }

    fn search(
        &mut self,
        pattern: &SearchPattern,
        flags: SearchFlags,
        scope: SearchScope,
    ) -> Option<Position> {
        let stop_line = match scope {
            SearchScope::Buffer => None,
            SearchScope::CurrentLine => Some(self.cursor.line),
        };
        let re = compiled(&mut self.regexes, pattern)?;
        let found = search::find(&self.buffer, re, self.cursor, flags, stop_line)?;
        trace!(from = ?self.cursor, to = ?found.start, ?flags, "search step");
        self.cursor = found.start;
        Some(found.start)
    }

    fn cursor(&self) -> Position {
        self.cursor
    }

    fn set_cursor(&mut self, pos: Position) {
        self.cursor = self.buffer.clamp_position(pos);
    }

    fn mode(&self) -> ModeKey {
        ModeKey::from_mode(self.mode).unwrap_or(ModeKey::Normal)
    }

    fn line_text(&self, line: usize) -> Option<String> {
        self.buffer.line_text(line)
    }

    fn mark_region(&mut self, region: MarkRegion<'_>) -> MarkerId {
        let id = MarkerId(self.next_marker);
        self.next_marker += 1;
        let ranges = match region {
            MarkRegion::Cursor => vec![Range::new(
                self.cursor,
                Position::new(self.cursor.line, self.cursor.col + 1),
            )],
            MarkRegion::Targets { line, pattern } => compiled(&mut self.regexes, pattern)
                .map(|re| {
                    search::find_all_in_line(&self.buffer, re, line)
                        .into_iter()
                        .map(Match::range)
                        .collect()
                })
                .unwrap_or_default(),
        };
        self.markers.insert(
            id,
            Marker {
                kind: region.kind(),
                ranges,
            },
        );
        id
    }

    fn clear_marker(&mut self, id: MarkerId) {
        self.markers.remove(&id);
    }

    fn set_jump_mark(&mut self, pos: Position) {
        self.jump_mark = Some(pos);
    }

    fn notify(&mut self, severity: Severity, message: &str) {
        self.messages.push((severity, message.to_string()));
    }

    fn show_prompt(&mut self, text: Option<&str>) {
        self.prompt = text.map(str::to_string);
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }

    fn redraw(&mut self) {
        self.redraws += 1;
    }
}

/// Compile `pattern` once and keep it.
fn compiled<'a>(
    cache: &'a mut HashMap<SearchPattern, Regex>,
    pattern: &SearchPattern,
) -> Option<&'a Regex> {
    match cache.entry(pattern.clone()) {
        Entry::Occupied(entry) => Some(entry.into_mut()),
        Entry::Vacant(entry) => match pattern.compile() {
            Ok(re) => Some(entry.insert(re)),
            Err(err) => {
                warn!(%err, "pattern failed to compile");
                None
            }
        },
    }
}

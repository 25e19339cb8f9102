//! The motion session state machine.
//!
//! One [`Session`] per [`ModeKey`] remembers the last motion, the char it
//! searched for, and where it left the cursor. An invocation whose cursor is
//! exactly where that session left it is a repeat; anything else is fresh
//! and prompts for a char.
//!
//! ```text
//!   find_with(kind) ──► cursor == session.last_cursor_pos ?
//!        │ no                         │ yes
//!        ▼                            ▼
//!   prompt for char            timed out? ── yes ──► reset, start over
//!   commit kind + char                │ no
//!        │                            ▼
//!        └────────► repeat(back) ◄── back = case of key (+ fix_key_direction)
//!                        │
//!                        ▼
//!             search `count` times from the cursor
//! ```
//!
//! A failed search restores the cursor and mutates nothing.

use std::time::{Duration, Instant};

use n_editor::position::Position;
use n_editor::search::{SearchDirection, SearchFlags};
use tracing::{debug, trace, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::dictionary::Dictionaries;
use crate::error::MotionError;
use crate::highlight::Highlight;
use crate::host::{Host, SearchScope, Severity};
use crate::input::Target;
use crate::kind::MotionKind;
use crate::mode::{ModeKey, ModeTable};
use crate::pattern::{SearchPattern, build_pattern_with};
use crate::prompt::PromptGuard;

// ---------------------------------------------------------------------------
// Session and outcome
// ---------------------------------------------------------------------------

/// Per-mode motion memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub last_motion_kind: Option<MotionKind>,
    /// Survives [`Engine::reset`] so the repeat-last-input keys keep working.
    pub last_char: Option<Target>,
    pub last_cursor_pos: Option<Position>,
    /// True from a fresh prompt until the first successful jump.
    pub is_first_move: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            last_motion_kind: None,
            last_char: None,
            last_cursor_pos: None,
            is_first_move: true,
        }
    }
}

/// A completed jump in a non-visual mode, for the host to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Motion {
    /// The effective kind, after any direction flip.
    pub kind: MotionKind,
    pub from: Position,
    pub to: Position,
    /// Operator-pending forward motions include the landing char.
    pub inclusive: bool,
    pub count: usize,
}

impl Motion {
    #[inline]
    #[must_use]
    pub const fn direction(&self) -> SearchDirection {
        self.kind.direction()
    }
}

/// What an invocation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Moved(Motion),
    /// Visual modes: the cursor and the jump mark moved to the target.
    Visual(Position),
    /// Fewer than `count` matches. Nothing changed.
    NoMovement,
    /// The prompt was cancelled. Nothing changed.
    Cancelled,
    /// Nothing to repeat, or the last target was a special key.
    Ignored,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Engine<C: Clock = SystemClock> {
    config: Config,
    clock: C,
    sessions: ModeTable<Session>,
    last_mode: Option<ModeKey>,
    last_invocation: Option<Instant>,
    moved_forward: bool,
    highlight: Highlight,
    dictionaries: Dictionaries,
}

impl Engine<SystemClock> {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Engine<C> {
    #[must_use]
    pub fn with_clock(config: Config, clock: C) -> Self {
        let dictionaries = Dictionaries::new(&config.encoding);
        Self {
            config,
            clock,
            sessions: ModeTable::default(),
            last_mode: None,
            last_invocation: None,
            moved_forward: false,
            highlight: Highlight::default(),
            dictionaries,
        }
    }

    #[inline]
    #[must_use]
    pub fn session(&self, mode: ModeKey) -> &Session {
        &self.sessions[mode]
    }

    /// The mode of the last fresh prompt.
    #[inline]
    #[must_use]
    pub const fn last_mode(&self) -> Option<ModeKey> {
        self.last_mode
    }

    #[inline]
    #[must_use]
    pub const fn highlight(&self) -> &Highlight {
        &self.highlight
    }

    #[inline]
    #[must_use]
    pub const fn dictionaries(&self) -> &Dictionaries {
        &self.dictionaries
    }

    // -- Invocation ---------------------------------------------------------

    /// [`find_with`](Self::find_with) for a raw motion key.
    ///
    /// # Errors
    ///
    /// [`MotionError::InvalidMotionRequest`] for any key but `f`, `F`, `t`,
    /// `T`, and whatever `find_with` returns.
    pub fn find_with_key<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        key: char,
        count: usize,
    ) -> Result<Outcome, MotionError> {
        match MotionKind::from_key(key) {
            Ok(kind) => self.find_with(host, kind, count),
            Err(err) => {
                host.notify(Severity::Error, &err.to_string());
                Err(err)
            }
        }
    }

    /// Run one `f`/`F`/`t`/`T` invocation.
    ///
    /// # Errors
    ///
    /// [`MotionError::NoPreviousInput`] when a repeat-last-input key is typed
    /// at the prompt before any char was ever searched. Nothing is mutated.
    pub fn find_with<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        kind: MotionKind,
        count: usize,
    ) -> Result<Outcome, MotionError> {
        let mode = host.mode();
        let session = self.sessions[mode];
        let previous = session
            .last_motion_kind
            .filter(|_| session.last_cursor_pos == Some(host.cursor()));
        let Some(previous) = previous else {
            return self.prompt(host, mode, kind, count);
        };

        let mut back = kind.is_backward();
        if self.config.fix_key_direction && previous.is_backward() {
            back = !back;
        }

        if let Some(timeout) = self.config.timeout() {
            if self.timed_out(timeout) {
                debug!(?mode, "session timed out");
                self.reset(host);
                return self.find_with(host, kind, count);
            }
        }

        debug!(?mode, ?kind, back, count, "repeat");
        Ok(self.repeat(host, back, count))
    }

    fn prompt<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        mode: ModeKey,
        kind: MotionKind,
        count: usize,
    ) -> Result<Outcome, MotionError> {
        debug!(?mode, ?kind, "fresh prompt");
        let key = PromptGuard::acquire(host, &self.config).read_key();

        let target = if self.config.repeat_last_char_inputs.contains(&key) {
            let Some(previous) = self.last_mode.and_then(|m| self.sessions[m].last_char) else {
                let err = MotionError::NoPreviousInput;
                host.notify(Severity::Error, &err.to_string());
                return Err(err);
            };
            previous
        } else {
            let Some(target) = key.target() else {
                debug!("prompt cancelled");
                return Ok(Outcome::Cancelled);
            };
            target
        };

        let session = &mut self.sessions[mode];
        session.last_motion_kind = Some(kind);
        session.last_char = Some(target);
        session.is_first_move = true;
        self.last_mode = Some(mode);
        if self.config.timeout().is_some() {
            self.last_invocation = Some(self.clock.now());
        }

        if self.config.mark_char {
            self.highlight.clear(host);
            if mode.marks_targets() {
                self.highlight.arm();
                if let Target::Char(ch) = target {
                    let pattern = self.pattern_for(host, kind, ch);
                    let line = host.cursor().line;
                    self.highlight.mark_targets(host, line, &pattern);
                }
            }
        }

        Ok(self.repeat(host, false, count))
    }

    /// Repeat the current mode's last motion, reversed when `back` is set.
    pub fn repeat<H: Host + ?Sized>(&mut self, host: &mut H, back: bool, count: usize) -> Outcome {
        let mode = host.mode();
        let session = self.sessions[mode];
        let (Some(kind), Some(target)) = (session.last_motion_kind, session.last_char) else {
            return Outcome::Ignored;
        };
        let Target::Char(ch) = target else {
            trace!(?mode, "last target was a special key");
            return Outcome::Ignored;
        };

        let kind = if back { kind.opposite() } else { kind };
        let count = count.max(1);
        if mode.is_visual() {
            self.move_visual(host, mode, kind, ch, count)
        } else {
            let inclusive = mode == ModeKey::OperatorPending && !kind.is_backward();
            self.find(host, mode, kind, ch, count, inclusive)
        }
    }

    fn find<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        mode: ModeKey,
        kind: MotionKind,
        ch: char,
        count: usize,
        inclusive: bool,
    ) -> Outcome {
        let before = host.cursor();
        let pattern = self.pattern_for(host, kind, ch);
        let Some(next) = self.next_pos(host, mode, kind, &pattern, count) else {
            debug!(?kind, ?ch, count, "no movement");
            return Outcome::NoMovement;
        };

        let moves_forward = before.moves_forward_to(next);
        if self.config.mark_char {
            let polarity_flipped = kind.is_till()
                && !self.sessions[mode].is_first_move
                && self.moved_forward != moves_forward;
            if before.crosses_line(next) || polarity_flipped {
                self.highlight.clear(host);
                self.highlight.mark_targets(host, next.line, &pattern);
            }
        }

        self.moved_forward = moves_forward;
        let session = &mut self.sessions[mode];
        session.last_cursor_pos = Some(next);
        session.is_first_move = false;

        Outcome::Moved(Motion {
            kind,
            from: before,
            to: next,
            inclusive,
            count,
        })
    }

    fn move_visual<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        mode: ModeKey,
        kind: MotionKind,
        ch: char,
        count: usize,
    ) -> Outcome {
        let pattern = self.pattern_for(host, kind, ch);
        let Some(next) = self.next_pos(host, mode, kind, &pattern, count) else {
            debug!(?kind, ?ch, count, "no movement");
            return Outcome::NoMovement;
        };
        host.set_jump_mark(next);
        let session = &mut self.sessions[mode];
        session.last_cursor_pos = Some(next);
        session.is_first_move = false;
        Outcome::Visual(next)
    }

    /// Search `count` times. On failure the cursor goes back to where it
    /// started.
    fn next_pos<H: Host + ?Sized>(
        &self,
        host: &mut H,
        mode: ModeKey,
        kind: MotionKind,
        pattern: &SearchPattern,
        count: usize,
    ) -> Option<Position> {
        let origin = host.cursor();
        let flags = kind.direction().flags();
        let scope = if self.config.across_no_line {
            SearchScope::CurrentLine
        } else {
            SearchScope::Buffer
        };

        let mut remaining = count;
        if kind.is_till() && self.sessions[mode].is_first_move {
            // The cursor may already sit right next to a target.
            if host
                .search(pattern, flags | SearchFlags::ACCEPT_AT_CURSOR, scope)
                .is_none()
            {
                host.set_cursor(origin);
                return None;
            }
            remaining -= 1;
        }

        for _ in 0..remaining {
            if host.search(pattern, flags, scope).is_none() {
                host.set_cursor(origin);
                return None;
            }
        }
        Some(host.cursor())
    }

    // -- Patterns -----------------------------------------------------------

    fn pattern_for<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        kind: MotionKind,
        ch: char,
    ) -> SearchPattern {
        let phonetic = if self.uses_phonetic(host, ch) {
            match self.dictionaries.lookup(ch) {
                Ok(alternatives) => alternatives.map(str::to_string),
                Err(err) => {
                    warn!(%err, "phonetic matching disabled");
                    host.notify(Severity::Warning, &err.to_string());
                    None
                }
            }
        } else {
            None
        };
        build_pattern_with(ch, kind, &self.config, phonetic.as_deref())
    }

    fn uses_phonetic<H: Host + ?Sized>(&self, host: &H, ch: char) -> bool {
        self.config.use_migemo
            && !self.dictionaries.is_disabled()
            && ch.is_ascii_alphabetic()
            && (!self.config.across_no_line
                || host
                    .line_text(host.cursor().line)
                    .is_some_and(|line| !line.is_ascii()))
    }

    /// True when the last invocation is older than `timeout`, or unknown.
    /// Either way the timestamp moves to now.
    fn timed_out(&mut self, timeout: Duration) -> bool {
        let now = self.clock.now();
        let elapsed = self
            .last_invocation
            .map(|then| now.saturating_duration_since(then));
        self.last_invocation = Some(now);
        elapsed.is_none_or(|elapsed| elapsed > timeout)
    }

    // -- Reset --------------------------------------------------------------

    /// Forget every session's motion and position, the timeout clock, the
    /// dictionary cache, and the char marks. Last searched chars survive.
    pub fn reset<H: Host + ?Sized>(&mut self, host: &mut H) {
        debug!("reset");
        for session in self.sessions.values_mut() {
            *session = Session {
                last_char: session.last_char,
                ..Session::default()
            };
        }
        self.dictionaries.clear();
        self.last_invocation = None;
        self.highlight.clear(host);
    }

    /// [`reset`](Self::reset), plus the last searched chars, the last mode,
    /// and the finalizer.
    pub fn reset_all<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.reset(host);
        self.sessions = ModeTable::default();
        self.last_mode = None;
        self.highlight.disarm();
        self.moved_forward = false;
    }

    // -- Lifecycle hooks ----------------------------------------------------

    /// The cursor moved. Finalizes the marking unless the cursor is where
    /// the last prompted mode's motion left it.
    pub fn on_cursor_moved<H: Host + ?Sized>(&mut self, host: &mut H) {
        if !self.highlight.is_armed() {
            return;
        }
        let recorded = self
            .last_mode
            .and_then(|mode| self.sessions[mode].last_cursor_pos);
        if recorded != Some(host.cursor()) {
            self.finalize(host);
        }
    }

    pub fn on_insert_enter<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.highlight.is_armed() {
            self.finalize(host);
        }
    }

    /// Window focus changed.
    pub fn on_window_change<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.config.clean_labels_eagerly && self.config.mark_char {
            self.highlight.clear(host);
        }
    }

    fn finalize<H: Host + ?Sized>(&mut self, host: &mut H) {
        trace!("finalize marking");
        self.highlight.disarm();
        self.highlight.clear(host);
        self.moved_forward = false;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

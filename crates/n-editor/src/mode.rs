//! Vim-style editing modes, as far as character motions care.
//!
//! | Mode              | Motions allowed | How `f`/`t` land            |
//! |-------------------|-----------------|-----------------------------|
//! | Normal            | yes             | cursor moves                |
//! | Visual (3 kinds)  | yes             | selection end moves         |
//! | Select            | yes             | cursor moves                |
//! | Operator-pending  | yes             | operator applies to motion  |
//! | Insert            | no              | n/a                         |

use std::fmt;

/// The sub-mode of visual selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualKind {
    /// `v`: character-wise selection.
    Char,
    /// `V`: line-wise selection.
    Line,
    /// `Ctrl-V`: block selection.
    Block,
}

/// The current editing mode of a host.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Normal,
    /// Text entry. Entering it ends any motion highlighting.
    Insert,
    Visual(VisualKind),
    /// Select mode (`gh`): like visual, but typing replaces the selection.
    Select,
    /// An operator (`d`, `c`, `y`) is waiting for its motion.
    OperatorPending,
}

impl Mode {
    /// Human-readable name for status output.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
            Self::Visual(VisualKind::Char) => "VISUAL",
            Self::Visual(VisualKind::Line) => "VISUAL LINE",
            Self::Visual(VisualKind::Block) => "VISUAL BLOCK",
            Self::Select => "SELECT",
            Self::OperatorPending => "O-PENDING",
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_visual(self) -> bool {
        matches!(self, Self::Visual(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_insert(self) -> bool {
        matches!(self, Self::Insert)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names() {
        assert_eq!(Mode::Normal.to_string(), "NORMAL");
        assert_eq!(Mode::Visual(VisualKind::Block).to_string(), "VISUAL BLOCK");
        assert_eq!(Mode::OperatorPending.to_string(), "O-PENDING");
        assert_eq!(Mode::Select.display_name(), "SELECT");
    }

    #[test]
    fn predicates() {
        assert!(Mode::Visual(VisualKind::Line).is_visual());
        assert!(!Mode::Select.is_visual());
        assert!(Mode::Insert.is_insert());
        assert!(!Mode::Normal.is_insert());
    }

    #[test]
    fn default_is_normal() {
        assert_eq!(Mode::default(), Mode::Normal);
    }
}

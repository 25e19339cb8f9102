//! Mode keys and the per-mode table that holds motion sessions.
//!
//! Sessions are partitioned by the mode a motion was issued in, so a `f`
//! repeated in visual mode never continues a search started in normal mode.
//! The key set is closed, so a fixed array indexed by [`ModeKey`] replaces
//! any string-keyed map.

use std::ops::{Index, IndexMut};

use n_editor::mode::{Mode, VisualKind};

/// The mode a motion was invoked in. Used only as a lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModeKey {
    Normal,
    Visual,
    VisualLine,
    VisualBlock,
    Select,
    /// Operator-pending, characterwise.
    OperatorPending,
}

impl ModeKey {
    pub const COUNT: usize = 6;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Normal,
        Self::Visual,
        Self::VisualLine,
        Self::VisualBlock,
        Self::Select,
        Self::OperatorPending,
    ];

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The key for a host mode. Insert mode issues no motions.
    #[must_use]
    pub const fn from_mode(mode: Mode) -> Option<Self> {
        match mode {
            Mode::Normal => Some(Self::Normal),
            Mode::Visual(VisualKind::Char) => Some(Self::Visual),
            Mode::Visual(VisualKind::Line) => Some(Self::VisualLine),
            Mode::Visual(VisualKind::Block) => Some(Self::VisualBlock),
            Mode::Select => Some(Self::Select),
            Mode::OperatorPending => Some(Self::OperatorPending),
            Mode::Insert => None,
        }
    }

    /// Visual modes extend the selection through the jump mark instead of
    /// returning a motion.
    #[inline]
    #[must_use]
    pub const fn is_visual(self) -> bool {
        matches!(self, Self::Visual | Self::VisualLine | Self::VisualBlock)
    }

    /// Modes in which a fresh prompt marks the target chars on the line.
    #[inline]
    #[must_use]
    pub const fn marks_targets(self) -> bool {
        !matches!(self, Self::OperatorPending)
    }
}

/// One `T` per [`ModeKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeTable<T> {
    slots: [T; ModeKey::COUNT],
}

impl<T: Default> Default for ModeTable<T> {
    fn default() -> Self {
        Self {
            slots: std::array::from_fn(|_| T::default()),
        }
    }
}

impl<T> ModeTable<T> {
    /// Iterate `(key, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (ModeKey, &T)> {
        ModeKey::ALL.into_iter().zip(self.slots.iter())
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut()
    }
}

impl<T> Index<ModeKey> for ModeTable<T> {
    type Output = T;

    fn index(&self, key: ModeKey) -> &T {
        &self.slots[key.index()]
    }
}

impl<T> IndexMut<ModeKey> for ModeTable<T> {
    fn index_mut(&mut self, key: ModeKey) -> &mut T {
        &mut self.slots[key.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_dense() {
        for (i, key) in ModeKey::ALL.into_iter().enumerate() {
            assert_eq!(key.index(), i);
        }
    }

    #[test]
    fn from_host_mode() {
        assert_eq!(ModeKey::from_mode(Mode::Normal), Some(ModeKey::Normal));
        assert_eq!(
            ModeKey::from_mode(Mode::Visual(VisualKind::Block)),
            Some(ModeKey::VisualBlock)
        );
        assert_eq!(
            ModeKey::from_mode(Mode::OperatorPending),
            Some(ModeKey::OperatorPending)
        );
        assert_eq!(ModeKey::from_mode(Mode::Insert), None);
    }

    #[test]
    fn visual_and_marking_sets() {
        assert!(ModeKey::VisualLine.is_visual());
        assert!(!ModeKey::Select.is_visual());
        assert!(ModeKey::Select.marks_targets());
        assert!(!ModeKey::OperatorPending.marks_targets());
    }

    #[test]
    fn table_slots_are_independent() {
        let mut table: ModeTable<u32> = ModeTable::default();
        table[ModeKey::Visual] = 3;
        table[ModeKey::Select] += 1;
        assert_eq!(table[ModeKey::Normal], 0);
        assert_eq!(table[ModeKey::Visual], 3);
        assert_eq!(table[ModeKey::Select], 1);

        for v in table.values_mut() {
            *v = 9;
        }
        assert!(table.iter().all(|(_, &v)| v == 9));
    }
}

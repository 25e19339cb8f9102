//! The four character motions.

use std::fmt;

use n_editor::search::SearchDirection;

use crate::error::MotionError;

/// `f`, `F`, `t`, or `T`.
///
/// Lowercase keys search forward, uppercase keys backward. Swapping case
/// ([`opposite`](Self::opposite)) is how a repeat reverses direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionKind {
    /// `f`: land on the target, searching forward.
    Find,
    /// `F`: land on the target, searching backward.
    FindBack,
    /// `t`: land just before the target, searching forward.
    Till,
    /// `T`: land just after the target, searching backward.
    TillBack,
}

impl MotionKind {
    /// The key that requests this motion.
    #[must_use]
    pub const fn key(self) -> char {
        match self {
            Self::Find => 'f',
            Self::FindBack => 'F',
            Self::Till => 't',
            Self::TillBack => 'T',
        }
    }

    /// Parse a motion key.
    ///
    /// # Errors
    ///
    /// [`MotionError::InvalidMotionRequest`] for anything but `f`, `F`, `t`,
    /// `T`.
    pub const fn from_key(key: char) -> Result<Self, MotionError> {
        match key {
            'f' => Ok(Self::Find),
            'F' => Ok(Self::FindBack),
            't' => Ok(Self::Till),
            'T' => Ok(Self::TillBack),
            other => Err(MotionError::InvalidMotionRequest(other)),
        }
    }

    /// Same motion, other direction (`f` ↔ `F`, `t` ↔ `T`).
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Find => Self::FindBack,
            Self::FindBack => Self::Find,
            Self::Till => Self::TillBack,
            Self::TillBack => Self::Till,
        }
    }

    /// True for the uppercase (backward) variants.
    #[inline]
    #[must_use]
    pub const fn is_backward(self) -> bool {
        matches!(self, Self::FindBack | Self::TillBack)
    }

    /// True for `t` and `T`.
    #[inline]
    #[must_use]
    pub const fn is_till(self) -> bool {
        matches!(self, Self::Till | Self::TillBack)
    }

    #[must_use]
    pub const fn direction(self) -> SearchDirection {
        if self.is_backward() {
            SearchDirection::Backward
        } else {
            SearchDirection::Forward
        }
    }
}

impl TryFrom<char> for MotionKind {
    type Error = MotionError;

    fn try_from(key: char) -> Result<Self, Self::Error> {
        Self::from_key(key)
    }
}

impl fmt::Display for MotionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [MotionKind; 4] = [
        MotionKind::Find,
        MotionKind::FindBack,
        MotionKind::Till,
        MotionKind::TillBack,
    ];

    #[test]
    fn keys_parse_back() {
        for kind in ALL {
            assert_eq!(MotionKind::from_key(kind.key()), Ok(kind));
        }
    }

    #[test]
    fn other_keys_are_invalid() {
        assert_eq!(
            MotionKind::try_from('x'),
            Err(MotionError::InvalidMotionRequest('x'))
        );
        assert!(MotionKind::from_key(';').is_err());
    }

    #[test]
    fn opposite_swaps_case() {
        for kind in ALL {
            let opp = kind.opposite();
            assert_ne!(opp.is_backward(), kind.is_backward());
            assert_eq!(opp.is_till(), kind.is_till());
            assert_eq!(opp.opposite(), kind);
        }
        assert_eq!(MotionKind::Till.opposite().key(), 'T');
    }

    #[test]
    fn direction_follows_case() {
        assert_eq!(MotionKind::Find.direction(), SearchDirection::Forward);
        assert_eq!(MotionKind::TillBack.direction(), SearchDirection::Backward);
    }

    #[test]
    fn display_is_key() {
        assert_eq!(MotionKind::FindBack.to_string(), "F");
    }
}

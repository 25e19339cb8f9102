//! Error types.
//!
//! Only genuine failures live here. "No match" and a cancelled prompt are
//! ordinary [`Outcome`](crate::engine::Outcome)s, and a timeout reset is a
//! plain state transition.

use thiserror::Error;

/// A motion request that was rejected before any state changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MotionError {
    /// The key does not name one of `f`, `F`, `t`, `T`.
    #[error("Invalid mapping: {0}")]
    InvalidMotionRequest(char),

    /// A repeat-last-input key was typed, but no char was ever searched.
    #[error("Previous input not found.")]
    NoPreviousInput,
}

/// Loading a phonetic dictionary failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DictionaryError {
    #[error("Error: {0} is not supported. Migemo is disabled.")]
    UnsupportedEncoding(String),
}

/// A `:set`-style directive that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Invalid argument: {name}={value}")]
    InvalidValue { name: String, value: String },

    #[error("Not a boolean option: {0}")]
    NotBoolean(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_user_facing_text() {
        assert_eq!(
            MotionError::InvalidMotionRequest('x').to_string(),
            "Invalid mapping: x"
        );
        assert_eq!(MotionError::NoPreviousInput.to_string(), "Previous input not found.");
        assert_eq!(
            DictionaryError::UnsupportedEncoding("latin1".into()).to_string(),
            "Error: latin1 is not supported. Migemo is disabled."
        );
        assert_eq!(
            ConfigError::InvalidValue {
                name: "timeout_ms".into(),
                value: "soon".into()
            }
            .to_string(),
            "Invalid argument: timeout_ms=soon"
        );
    }
}

//! # n-editor: Text model for n-seek
//!
//! The host side of character motions:
//!
//! - **[`position`]**: `Position` (line, col) and `Range` types, 0-indexed
//! - **[`buffer`]**: `Buffer` wrapping a rope, with char/byte coordinate conversion
//! - **[`mode`]**: Vim-style modes (`Normal`, `Visual`, `Select`, ...)
//! - **[`search`]**: one-step regex search with Vim `search()` semantics

pub mod buffer;
pub mod mode;
pub mod position;
pub mod search;

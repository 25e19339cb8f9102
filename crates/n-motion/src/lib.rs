//! # n-motion: Clever character motions
//!
//! `f`, `F`, `t`, `T` that remember what they searched for. Press `f` and a
//! char once; pressing `f` again right where the motion left the cursor
//! jumps to the next occurrence, `F` goes back, and moving the cursor any
//! other way starts a fresh search.
//!
//! - **[`engine`]**: the per-mode session state machine
//! - **[`pattern`]**: typed char + motion kind → search pattern
//! - **[`host`]**: the editor operations the engine consumes
//! - **[`buffer_host`]**: an in-memory host with scripted input
//! - **[`config`]**: options, TOML loading, `:set`-style directives
//! - **[`dictionary`]**: phonetic (kana) matching for ASCII letters
//!
//! ```
//! use n_motion::buffer_host::BufferHost;
//! use n_motion::config::Config;
//! use n_motion::engine::Engine;
//! use n_motion::host::Host;
//!
//! let mut host = BufferHost::with_text("one two three");
//! let mut engine = Engine::new(Config::default());
//!
//! host.push_keys("t");
//! engine.find_with_key(&mut host, 'f', 1).unwrap();
//! assert_eq!(host.cursor().col, 4);
//!
//! // Same place, same key: repeat without prompting.
//! engine.find_with_key(&mut host, 'f', 1).unwrap();
//! assert_eq!(host.cursor().col, 8);
//! ```

pub mod buffer_host;
pub mod clock;
pub mod config;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod highlight;
pub mod host;
pub mod input;
pub mod kind;
pub mod mode;
pub mod pattern;
pub mod prompt;

pub use config::Config;
pub use engine::{Engine, Motion, Outcome};
pub use error::MotionError;
pub use host::Host;
pub use kind::MotionKind;

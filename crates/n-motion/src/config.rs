//! Motion options: defaults, TOML loading, and `:set`-style directives.
//!
//! [`Config`] deserializes from a partial TOML table (unnamed options keep
//! their defaults) and can be changed at runtime with the same directive
//! syntax as Vim's `:set`:
//!
//! | Syntax           | Effect                          |
//! |------------------|---------------------------------|
//! | `option`         | Enable a boolean option         |
//! | `nooption`       | Disable a boolean option        |
//! | `option!`        | Toggle a boolean option         |
//! | `option=value`   | Assign a numeric/string option  |
//!
//! | Option                    | Type     | Default  |
//! |---------------------------|----------|----------|
//! | `across_no_line`          | bool     | false    |
//! | `ignore_case`             | bool     | false    |
//! | `smart_case`              | bool     | false    |
//! | `fix_key_direction`       | bool     | false    |
//! | `show_prompt`             | bool     | false    |
//! | `timeout_ms`              | integer  | 0 (off)  |
//! | `chars_match_any_signs`   | string   | `""`     |
//! | `repeat_last_char_inputs` | keys     | `<CR>`   |
//! | `mark_cursor`             | bool     | true     |
//! | `mark_char`               | bool     | true     |
//! | `clean_labels_eagerly`    | bool     | true     |
//! | `hide_cursor_on_cmdline`  | bool     | true     |
//! | `use_migemo`              | bool     | false    |
//! | `encoding`                | string   | `utf-8`  |

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::input::Key;

/// Every option the motion engine reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools)]
pub struct Config {
    /// Keep searches on the cursor line.
    pub across_no_line: bool,
    pub ignore_case: bool,
    /// Ignore case only when the typed char is lowercase.
    pub smart_case: bool,
    /// Lowercase keys always search forward and uppercase keys backward,
    /// whatever direction the session started in.
    pub fix_key_direction: bool,
    /// Show `clever-f: ` while waiting for the char.
    pub show_prompt: bool,
    /// Sessions older than this many milliseconds are discarded. 0 disables.
    pub timeout_ms: u64,
    /// Typing any of these chars matches any sign/punctuation char.
    pub chars_match_any_signs: String,
    /// Keys that reuse the last searched char instead of being searched.
    pub repeat_last_char_inputs: Vec<Key>,
    /// Mark the cursor cell while prompting.
    pub mark_cursor: bool,
    /// Mark the candidate chars on the current line.
    pub mark_char: bool,
    /// Clear char marks as soon as the window changes.
    pub clean_labels_eagerly: bool,
    /// Hide the terminal cursor while prompting.
    pub hide_cursor_on_cmdline: bool,
    /// Let ASCII letters also match kana via a phonetic dictionary.
    pub use_migemo: bool,
    /// Encoding name used to pick the phonetic dictionary.
    pub encoding: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            across_no_line: false,
            ignore_case: false,
            smart_case: false,
            fix_key_direction: false,
            show_prompt: false,
            timeout_ms: 0,
            chars_match_any_signs: String::new(),
            repeat_last_char_inputs: vec![Key::Enter],
            mark_cursor: true,
            mark_char: true,
            clean_labels_eagerly: true,
            hide_cursor_on_cmdline: true,
            use_migemo: false,
            encoding: "utf-8".to_string(),
        }
    }
}

impl Config {
    /// The session timeout, or `None` when timeouts are disabled.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        if self.timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.timeout_ms))
        }
    }

    /// Apply one directive.
    ///
    /// # Errors
    ///
    /// Unknown option names, toggling a non-boolean option, and values that
    /// do not parse are rejected without changing anything.
    pub fn apply(&mut self, directive: &SetDirective) -> Result<(), ConfigError> {
        match directive {
            SetDirective::On(name) => *self.bool_mut(name)? = true,
            SetDirective::Off(name) => *self.bool_mut(name)? = false,
            SetDirective::Toggle(name) => {
                let flag = self.bool_mut(name)?;
                *flag = !*flag;
            }
            SetDirective::Assign(name, value) => self.assign(name, value)?,
        }
        Ok(())
    }

    fn bool_mut(&mut self, name: &str) -> Result<&mut bool, ConfigError> {
        Ok(match name {
            "across_no_line" => &mut self.across_no_line,
            "ignore_case" => &mut self.ignore_case,
            "smart_case" => &mut self.smart_case,
            "fix_key_direction" => &mut self.fix_key_direction,
            "show_prompt" => &mut self.show_prompt,
            "mark_cursor" => &mut self.mark_cursor,
            "mark_char" => &mut self.mark_char,
            "clean_labels_eagerly" => &mut self.clean_labels_eagerly,
            "hide_cursor_on_cmdline" => &mut self.hide_cursor_on_cmdline,
            "use_migemo" => &mut self.use_migemo,
            other if is_value_option(other) => {
                return Err(ConfigError::NotBoolean(other.to_string()));
            }
            other => return Err(ConfigError::UnknownOption(other.to_string())),
        })
    }

    fn assign(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        };
        match name {
            "timeout_ms" => self.timeout_ms = value.parse().map_err(|_| invalid())?,
            "chars_match_any_signs" => self.chars_match_any_signs = value.to_string(),
            "encoding" => self.encoding = value.to_string(),
            "repeat_last_char_inputs" => {
                self.repeat_last_char_inputs = if value.is_empty() {
                    Vec::new()
                } else {
                    value
                        .split(',')
                        .map(str::parse::<Key>)
                        .collect::<Result<_, _>>()
                        .map_err(|_| invalid())?
                };
            }
            other if is_bool_option(other) => {
                let flag = self.bool_mut(other)?;
                *flag = match value {
                    "1" | "true" | "on" => true,
                    "0" | "false" | "off" => false,
                    _ => return Err(invalid()),
                };
            }
            other => return Err(ConfigError::UnknownOption(other.to_string())),
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Directives
// ---------------------------------------------------------------------------

/// A parsed `:set`-style directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    /// `option`: enable a boolean option.
    On(String),
    /// `nooption`: disable a boolean option.
    Off(String),
    /// `option!`: toggle a boolean option.
    Toggle(String),
    /// `option=value`: assign a value.
    Assign(String, String),
}

/// Returns `true` if `name` is a boolean option.
#[must_use]
pub fn is_bool_option(name: &str) -> bool {
    matches!(
        name,
        "across_no_line"
            | "ignore_case"
            | "smart_case"
            | "fix_key_direction"
            | "show_prompt"
            | "mark_cursor"
            | "mark_char"
            | "clean_labels_eagerly"
            | "hide_cursor_on_cmdline"
            | "use_migemo"
    )
}

/// Returns `true` if `name` takes a value (`name=value`).
#[must_use]
pub fn is_value_option(name: &str) -> bool {
    matches!(
        name,
        "timeout_ms" | "chars_match_any_signs" | "repeat_last_char_inputs" | "encoding"
    )
}

/// Parse whitespace-separated directives (`"smart_case timeout_ms=500"`).
#[must_use]
pub fn parse_set(args: &str) -> Vec<SetDirective> {
    args.split_whitespace().map(parse_set_arg).collect()
}

/// Parse a single directive.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if let Some((name, value)) = arg.split_once('=') {
        return SetDirective::Assign(name.to_string(), value.to_string());
    }

    if let Some(name) = arg.strip_suffix('!') {
        return SetDirective::Toggle(name.to_string());
    }

    // Only strip "no" when the rest is a boolean option name.
    if let Some(name) = arg.strip_prefix("no") {
        if is_bool_option(name) {
            return SetDirective::Off(name.to_string());
        }
    }

    SetDirective::On(arg.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

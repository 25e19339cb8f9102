//! Keys read at the motion prompt, and the search target they become.
//!
//! Keys use Vim's angle-bracket notation when written down (`<CR>`, `<Esc>`,
//! `<Left>`), which is also how they appear in configuration.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// One logical input unit from the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Key {
    Char(char),
    /// `<CR>`. Also the default "repeat last input" key.
    Enter,
    /// `<Esc>`. Cancels the prompt.
    Escape,
    /// A non-character key (`<Left>`, `<F1>`, ...), by name.
    Special(String),
    /// The `0x80 0xfd '`'` sequence some terminals interleave with real
    /// input. Never a user keystroke; the prompt skips it.
    TerminalArtifact,
}

impl Key {
    /// What a search for this key looks for. `None` means the key cancels.
    #[must_use]
    pub const fn target(&self) -> Option<Target> {
        match self {
            Self::Char(ch) => Some(Target::Char(*ch)),
            Self::Enter => Some(Target::Char('\r')),
            Self::Special(_) => Some(Target::Special),
            Self::Escape | Self::TerminalArtifact => None,
        }
    }

    /// Split a key script (`"fa<CR>;,"`) into keys. An unterminated `<` is
    /// read as a literal char.
    #[must_use]
    pub fn parse_sequence(script: &str) -> Vec<Self> {
        let mut keys = Vec::new();
        let mut rest = script;
        while let Some(ch) = rest.chars().next() {
            if ch == '<' {
                if let Some(end) = rest.find('>') {
                    if let Ok(key) = rest[..=end].parse() {
                        keys.push(key);
                        rest = &rest[end + 1..];
                        continue;
                    }
                }
            }
            keys.push(Self::Char(ch));
            rest = &rest[ch.len_utf8()..];
        }
        keys
    }
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            return Ok(Self::Char(ch));
        }
        let name = s
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
            .filter(|name| !name.is_empty())
            .ok_or_else(|| format!("not a key: {s}"))?;
        Ok(match name.to_ascii_lowercase().as_str() {
            "cr" | "enter" | "return" => Self::Enter,
            "esc" => Self::Escape,
            "space" => Self::Char(' '),
            "tab" => Self::Char('\t'),
            "lt" => Self::Char('<'),
            "bar" => Self::Char('|'),
            "bslash" => Self::Char('\\'),
            _ => Self::Special(name.to_string()),
        })
    }
}

impl TryFrom<String> for Key {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char('<') => f.write_str("<lt>"),
            Self::Char(' ') => f.write_str("<Space>"),
            Self::Char(ch) => write!(f, "{ch}"),
            Self::Enter => f.write_str("<CR>"),
            Self::Escape => f.write_str("<Esc>"),
            Self::Special(name) => write!(f, "<{name}>"),
            Self::TerminalArtifact => f.write_str("<artifact>"),
        }
    }
}

/// The searched value recorded in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Char(char),
    /// A special key was typed at the prompt. Repeats against it do nothing.
    Special,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_chars_parse_literally() {
        assert_eq!("x".parse::<Key>(), Ok(Key::Char('x')));
        assert_eq!("<".parse::<Key>(), Ok(Key::Char('<')));
        assert_eq!("日".parse::<Key>(), Ok(Key::Char('日')));
    }

    #[test]
    fn notation_is_case_insensitive() {
        assert_eq!("<CR>".parse::<Key>(), Ok(Key::Enter));
        assert_eq!("<cr>".parse::<Key>(), Ok(Key::Enter));
        assert_eq!("<Esc>".parse::<Key>(), Ok(Key::Escape));
        assert_eq!("<Space>".parse::<Key>(), Ok(Key::Char(' ')));
        assert_eq!("<Left>".parse::<Key>(), Ok(Key::Special("Left".into())));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!("ab".parse::<Key>().is_err());
        assert!("<>".parse::<Key>().is_err());
        assert!("".parse::<Key>().is_err());
    }

    #[test]
    fn sequence_mixes_chars_and_notation() {
        assert_eq!(
            Key::parse_sequence("fa<CR>;<Left>"),
            vec![
                Key::Char('f'),
                Key::Char('a'),
                Key::Enter,
                Key::Char(';'),
                Key::Special("Left".into()),
            ]
        );
    }

    #[test]
    fn sequence_keeps_stray_angle_bracket() {
        assert_eq!(
            Key::parse_sequence("f<"),
            vec![Key::Char('f'), Key::Char('<')]
        );
    }

    #[test]
    fn targets() {
        assert_eq!(Key::Char('a').target(), Some(Target::Char('a')));
        assert_eq!(Key::Enter.target(), Some(Target::Char('\r')));
        assert_eq!(Key::Special("F1".into()).target(), Some(Target::Special));
        assert_eq!(Key::Escape.target(), None);
    }

    #[test]
    fn display_roundtrips_notation() {
        for key in [Key::Enter, Key::Escape, Key::Char('<'), Key::Special("Up".into())] {
            assert_eq!(key.to_string().parse::<Key>(), Ok(key));
        }
    }
}

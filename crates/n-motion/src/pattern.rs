//! Pattern builder: from a typed char and a motion kind to a search pattern.
//!
//! A [`SearchPattern`] is an abstract description: what char (or class of
//! chars) the target is, where the cursor lands relative to it, and whether
//! case matters. Hosts render it to a regex with
//! [`SearchPattern::regex_source`]; `t`/`T` landing offsets are expressed
//! with the n-editor [`LANDING_GROUP`] capture instead of lookaround.

use n_editor::search::LANDING_GROUP;
use regex::Regex;

use crate::config::Config;
use crate::kind::MotionKind;

/// The sign/punctuation class matched by a wildcard sign char.
pub const SIGNS: &str = "!\"#$%&'()=~|-^\\@`[]{};:+*<>,.?_/";

/// Whether the search compares case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseMode {
    Sensitive,
    Insensitive,
}

/// What a target char matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternAtom {
    /// Exactly this char.
    Literal(char),
    /// Any char in [`SIGNS`].
    AnySign,
    /// The letter itself or any of the dictionary's alternatives.
    Phonetic { letter: char, alternatives: String },
}

/// Where the cursor lands relative to a matched target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// On the target (`f`, `F`).
    On,
    /// On the char right before the target (`t`).
    Before,
    /// On the char right after the target (`T`).
    After,
}

/// A fully resolved single-char search.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchPattern {
    pub atom: PatternAtom,
    pub anchor: Anchor,
    pub case: CaseMode,
}

impl SearchPattern {
    /// The pattern in `regex` crate syntax. Any char, line breaks included,
    /// can sit on the landing side of a `t`/`T` target.
    #[must_use]
    pub fn regex_source(&self) -> String {
        let mut src = String::new();
        if self.case == CaseMode::Insensitive {
            src.push_str("(?i)");
        }
        let atom = self.atom_source();
        let landing = format!("(?s:(?P<{LANDING_GROUP}>.))");
        match self.anchor {
            Anchor::On => src.push_str(&atom),
            Anchor::Before => {
                src.push_str(&format!("{landing}(?:{atom})"));
            }
            Anchor::After => {
                src.push_str(&format!("(?:{atom}){landing}"));
            }
        }
        src
    }

    /// Compile [`regex_source`](Self::regex_source).
    ///
    /// # Errors
    ///
    /// Only if the regex engine rejects the generated source (e.g. a size
    /// limit); every char is escaped.
    pub fn compile(&self) -> Result<Regex, regex::Error> {
        Regex::new(&self.regex_source())
    }

    fn atom_source(&self) -> String {
        match &self.atom {
            PatternAtom::Literal(ch) => escape_char(*ch),
            PatternAtom::AnySign => char_class(SIGNS.chars()),
            PatternAtom::Phonetic {
                letter,
                alternatives,
            } => char_class(std::iter::once(*letter).chain(alternatives.chars())),
        }
    }
}

/// Build the pattern for a typed char, without phonetic alternatives.
#[must_use]
pub fn build_pattern(ch: char, kind: MotionKind, config: &Config) -> SearchPattern {
    build_pattern_with(ch, kind, config, None)
}

/// Build the pattern for a typed char.
///
/// `phonetic` carries the dictionary alternatives for `ch` when phonetic
/// matching applies; it takes precedence over the sign wildcard.
#[must_use]
pub fn build_pattern_with(
    ch: char,
    kind: MotionKind,
    config: &Config,
    phonetic: Option<&str>,
) -> SearchPattern {
    let atom = match phonetic {
        Some(alternatives) => PatternAtom::Phonetic {
            letter: ch,
            alternatives: alternatives.to_string(),
        },
        None if config.chars_match_any_signs.contains(ch) => PatternAtom::AnySign,
        None => PatternAtom::Literal(ch),
    };

    let anchor = match kind {
        MotionKind::Till => Anchor::Before,
        MotionKind::TillBack => Anchor::After,
        MotionKind::Find | MotionKind::FindBack => Anchor::On,
    };

    SearchPattern {
        atom,
        anchor,
        case: case_mode(ch, config),
    }
}

/// Case-insensitive when `ignore_case` is set, or when `smart_case` is set
/// and the char is in `a-z`.
#[must_use]
pub fn case_mode(ch: char, config: &Config) -> CaseMode {
    if config.ignore_case || (config.smart_case && ch.is_ascii_lowercase()) {
        CaseMode::Insensitive
    } else {
        CaseMode::Sensitive
    }
}

fn escape_char(ch: char) -> String {
    let mut buf = [0u8; 4];
    regex::escape(ch.encode_utf8(&mut buf))
}

fn char_class(chars: impl Iterator<Item = char>) -> String {
    let mut class = String::from("[");
    for ch in chars {
        class.push_str(&escape_char(ch));
    }
    class.push(']');
    class
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::default()
    }

    fn matches(p: &SearchPattern, text: &str) -> bool {
        p.compile().unwrap().is_match(text)
    }

    // -- Atom selection -----------------------------------------------------

    #[test]
    fn literal_by_default() {
        let p = build_pattern('a', MotionKind::Find, &config());
        assert_eq!(p.atom, PatternAtom::Literal('a'));
        assert_eq!(p.anchor, Anchor::On);
        assert_eq!(p.case, CaseMode::Sensitive);
        assert_eq!(p.regex_source(), "a");
    }

    #[test]
    fn regex_metachars_are_escaped() {
        let p = build_pattern('.', MotionKind::Find, &config());
        assert_eq!(p.regex_source(), r"\.");
        assert!(!matches(&p, "abc"));
        assert!(matches(&p, "a.c"));
    }

    #[test]
    fn sign_wildcard_matches_any_sign() {
        let c = Config {
            chars_match_any_signs: ";".into(),
            ..config()
        };
        let p = build_pattern(';', MotionKind::Find, &c);
        assert_eq!(p.atom, PatternAtom::AnySign);
        for sign in SIGNS.chars() {
            assert!(matches(&p, &sign.to_string()), "sign {sign:?}");
        }
        assert!(!matches(&p, "abc 123"));
    }

    #[test]
    fn phonetic_takes_precedence() {
        let c = Config {
            chars_match_any_signs: "k".into(),
            ..config()
        };
        let p = build_pattern_with('k', MotionKind::Find, &c, Some("かカ"));
        assert!(matches!(p.atom, PatternAtom::Phonetic { letter: 'k', .. }));
        assert!(matches(&p, "か"));
        assert!(matches(&p, "k"));
        assert!(!matches(&p, "x"));
    }

    // -- Anchors ------------------------------------------------------------

    #[test]
    fn till_lands_before_target() {
        let p = build_pattern('.', MotionKind::Till, &config());
        assert_eq!(p.anchor, Anchor::Before);
        let caps = p.compile().unwrap().captures("ab.").unwrap();
        assert_eq!(caps.name(LANDING_GROUP).unwrap().start(), 1);
    }

    #[test]
    fn till_back_lands_after_target() {
        let p = build_pattern('.', MotionKind::TillBack, &config());
        assert_eq!(p.anchor, Anchor::After);
        let caps = p.compile().unwrap().captures(".ab").unwrap();
        assert_eq!(caps.name(LANDING_GROUP).unwrap().start(), 1);
    }

    #[test]
    fn landing_char_may_be_a_line_break() {
        let p = build_pattern('x', MotionKind::Till, &config());
        assert!(matches(&p, "\nx"));
    }

    // -- Case mode ----------------------------------------------------------

    #[test]
    fn ignore_case_always_insensitive() {
        let c = Config {
            ignore_case: true,
            ..config()
        };
        assert_eq!(case_mode('A', &c), CaseMode::Insensitive);
        assert!(matches(&build_pattern('A', MotionKind::Find, &c), "a"));
    }

    #[test]
    fn smart_case_only_for_lowercase() {
        let c = Config {
            smart_case: true,
            ..config()
        };
        assert_eq!(case_mode('a', &c), CaseMode::Insensitive);
        assert_eq!(case_mode('A', &c), CaseMode::Sensitive);
        assert_eq!(case_mode('.', &c), CaseMode::Sensitive);
        assert_eq!(case_mode('é', &c), CaseMode::Sensitive);
        assert!(!matches(&build_pattern('é', MotionKind::Find, &c), "É"));
        assert!(matches(&build_pattern('a', MotionKind::Find, &c), "A"));
        assert!(!matches(&build_pattern('A', MotionKind::Find, &c), "a"));
    }

    #[test]
    fn case_sensitive_by_default() {
        assert!(!matches(&build_pattern('a', MotionKind::Find, &config()), "A"));
    }
}

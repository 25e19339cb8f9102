//! Phonetic (migemo-style) dictionaries.
//!
//! With `use_migemo` on, typing an ASCII letter also matches the kana whose
//! romanization starts with that letter: `fk` can land on `か` or `カ`.
//!
//! A [`DictionaryProvider`] is chosen once from the configured encoding
//! name. Buffers are decoded to `char`s before they reach the engine, so
//! every supported encoding serves the same kana table; what the encoding
//! decides is whether the feature is available at all. An unsupported name
//! disables phonetic matching for the rest of the process, and the first
//! lookup that hits the disabled state reports it once.

use std::fmt;

use crate::error::DictionaryError;

/// Encodings with a dictionary provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Encoding {
    Utf8,
    Cp932,
    EucJp,
    Unsupported(String),
}

impl Encoding {
    /// Parse an encoding name as Vim spells them (`utf-8`, `cp932`, `euc-jp`).
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Self::Utf8,
            "cp932" | "sjis" | "shift_jis" => Self::Cp932,
            "euc-jp" | "eucjp" => Self::EucJp,
            _ => Self::Unsupported(name.to_string()),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Cp932 => "cp932",
            Self::EucJp => "euc-jp",
            Self::Unsupported(name) => name,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps a typed letter to the extra chars it should match.
pub trait DictionaryProvider {
    /// Chars (not a pattern) matched in addition to `letter` itself.
    fn lookup(&self, letter: char) -> Option<&str>;

    fn encoding(&self) -> Encoding;
}

/// The built-in romaji-initial → kana table.
#[derive(Debug, Clone, Copy)]
pub struct KanaDictionary {
    encoding: KanaEncoding,
}

#[derive(Debug, Clone, Copy)]
enum KanaEncoding {
    Utf8,
    Cp932,
    EucJp,
}

impl DictionaryProvider for KanaDictionary {
    fn lookup(&self, letter: char) -> Option<&str> {
        let kana = match letter.to_ascii_lowercase() {
            'a' => "あアぁァ",
            'i' => "いイぃィ",
            'u' => "うウぅゥ",
            'e' => "えエぇェ",
            'o' => "おオぉォ",
            'k' => "かきくけこカキクケコ",
            'g' => "がぎぐげごガギグゲゴ",
            's' => "さしすせそサシスセソ",
            'z' => "ざじずぜぞザジズゼゾ",
            'j' => "じジ",
            't' => "たちつてとっタチツテトッ",
            'c' => "ちチ",
            'd' => "だぢづでどダヂヅデド",
            'n' => "なにぬねのんナニヌネノン",
            'h' => "はひふへほハヒフヘホ",
            'f' => "ふフ",
            'b' => "ばびぶべぼバビブベボ",
            'p' => "ぱぴぷぺぽパピプペポ",
            'm' => "まみむめもマミムメモ",
            'y' => "やゆよゃゅょヤユヨャュョ",
            'r' => "らりるれろラリルレロ",
            'w' => "わをワヲ",
            'v' => "ヴ",
            _ => return None,
        };
        Some(kana)
    }

    fn encoding(&self) -> Encoding {
        match self.encoding {
            KanaEncoding::Utf8 => Encoding::Utf8,
            KanaEncoding::Cp932 => Encoding::Cp932,
            KanaEncoding::EucJp => Encoding::EucJp,
        }
    }
}

/// Select the provider for an encoding.
///
/// # Errors
///
/// [`DictionaryError::UnsupportedEncoding`] when no provider exists.
pub fn provider_for(encoding: &Encoding) -> Result<Box<dyn DictionaryProvider>, DictionaryError> {
    let encoding = match encoding {
        Encoding::Utf8 => KanaEncoding::Utf8,
        Encoding::Cp932 => KanaEncoding::Cp932,
        Encoding::EucJp => KanaEncoding::EucJp,
        Encoding::Unsupported(name) => {
            return Err(DictionaryError::UnsupportedEncoding(name.clone()));
        }
    };
    Ok(Box::new(KanaDictionary { encoding }))
}

/// Lazily loaded dictionary plus the process-wide disabled state.
pub struct Dictionaries {
    encoding: Encoding,
    loaded: Option<Box<dyn DictionaryProvider>>,
    disabled: bool,
}

impl Dictionaries {
    #[must_use]
    pub fn new(encoding: &str) -> Self {
        Self {
            encoding: Encoding::from_name(encoding),
            loaded: None,
            disabled: false,
        }
    }

    /// True once an unsupported encoding has been hit.
    #[inline]
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    #[inline]
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Look up `letter`, loading the provider on first use.
    ///
    /// # Errors
    ///
    /// Returns the load error exactly once, on the call that discovers the
    /// encoding is unsupported. Every later call sees the disabled state and
    /// returns `Ok(None)`.
    pub fn lookup(&mut self, letter: char) -> Result<Option<&str>, DictionaryError> {
        if self.disabled {
            return Ok(None);
        }
        if self.loaded.is_none() {
            match provider_for(&self.encoding) {
                Ok(provider) => self.loaded = Some(provider),
                Err(err) => {
                    self.disabled = true;
                    return Err(err);
                }
            }
        }
        Ok(self.loaded.as_deref().and_then(|p| p.lookup(letter)))
    }

    /// Drop the loaded provider. The disabled state survives.
    pub fn clear(&mut self) {
        self.loaded = None;
    }
}

impl fmt::Debug for Dictionaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dictionaries")
            .field("encoding", &self.encoding)
            .field("loaded", &self.is_loaded())
            .field("disabled", &self.disabled)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_names() {
        assert_eq!(Encoding::from_name("UTF-8"), Encoding::Utf8);
        assert_eq!(Encoding::from_name("cp932"), Encoding::Cp932);
        assert_eq!(Encoding::from_name("euc-jp"), Encoding::EucJp);
        assert_eq!(
            Encoding::from_name("latin1"),
            Encoding::Unsupported("latin1".into())
        );
        assert_eq!(Encoding::EucJp.to_string(), "euc-jp");
    }

    #[test]
    fn every_supported_encoding_has_a_provider() {
        for enc in [Encoding::Utf8, Encoding::Cp932, Encoding::EucJp] {
            let provider = provider_for(&enc).unwrap();
            assert_eq!(provider.encoding(), enc);
            assert!(provider.lookup('k').unwrap().contains('か'));
        }
    }

    #[test]
    fn lookup_is_case_insensitive_and_partial() {
        let provider = provider_for(&Encoding::Utf8).unwrap();
        assert_eq!(provider.lookup('K'), provider.lookup('k'));
        assert!(provider.lookup('q').is_none());
        assert!(provider.lookup('1').is_none());
    }

    #[test]
    fn loads_lazily_and_clears() {
        let mut dicts = Dictionaries::new("utf-8");
        assert!(!dicts.is_loaded());
        assert!(dicts.lookup('a').unwrap().is_some());
        assert!(dicts.is_loaded());
        dicts.clear();
        assert!(!dicts.is_loaded());
    }

    #[test]
    fn unsupported_encoding_reports_once_then_stays_disabled() {
        let mut dicts = Dictionaries::new("latin1");
        assert_eq!(
            dicts.lookup('a'),
            Err(DictionaryError::UnsupportedEncoding("latin1".into()))
        );
        assert!(dicts.is_disabled());
        assert_eq!(dicts.lookup('a'), Ok(None));
        dicts.clear();
        assert!(dicts.is_disabled());
    }
}

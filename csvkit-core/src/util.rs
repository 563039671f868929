//! Miscellaneous utilities shared by every tool.

use crate::errors::*;
use std::str::FromStr;

/// Parse a character specifier and return a single-byte character.
///
/// Accepts a single ASCII byte, the two-character escape `\t`, or the
/// literal string `none` (meaning "disable this feature", used for
/// `--quote none`).
pub fn parse_char_specifier(specifier: &str) -> Result<Option<u8>> {
    if specifier.as_bytes().len() == 1 {
        Ok(Some(specifier.as_bytes()[0]))
    } else {
        match specifier {
            // For convenience so users can type `"\t"` in most shells
            // instead of trying to type a tab literal.
            r"\t" => Ok(Some(b'\t')),
            "none" => Ok(None),
            _ => Err(ErrorKind::CannotParseCharacter(specifier.to_owned()).into()),
        }
    }
}

/// A command-line argument type wrapping [`parse_char_specifier`], so
/// `structopt` can parse `-d`/`--quote`-style flags directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharSpecifier(Option<u8>);

impl CharSpecifier {
    pub fn char(self) -> Option<u8> {
        self.0
    }
}

impl FromStr for CharSpecifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(CharSpecifier(parse_char_specifier(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_char_specifiers() {
        assert_eq!(parse_char_specifier(",").unwrap(), Some(b','));
        assert_eq!(parse_char_specifier("\t").unwrap(), Some(b'\t'));
        assert_eq!(parse_char_specifier(r"\t").unwrap(), Some(b'\t'));
        assert_eq!(parse_char_specifier(r"none").unwrap(), None);
    }

    #[test]
    fn rejects_multi_byte_specifiers() {
        assert!(parse_char_specifier("ab").is_err());
    }
}

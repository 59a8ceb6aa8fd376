// 📮 Postal Codes - Canadian "A1A 1A1" format
// Strict parsing for the validation layer, lenient normalization for the estimators

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// First letters Canada Post actually assigns (no D, F, I, O, Q, U, W, Z)
pub const VALID_FIRST_LETTERS: &str = "ABCEGHJKLMNPRSTVXY";

lazy_static! {
    static ref POSTAL_CODE_FORMAT: Regex =
        Regex::new(r"^[ABCEGHJ-NPRSTVXY]\d[ABCEGHJ-NPRSTV-Z]\d[ABCEGHJ-NPRSTV-Z]\d$")
            .expect("postal code pattern is valid");
    static ref LOOSE_SHAPE: Regex =
        Regex::new(r"^[A-Z]\d[A-Z]\d[A-Z]\d$").expect("loose postal code pattern is valid");
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostalCodeError {
    #[error("postal code is empty")]
    Empty,

    #[error("postal code must have 6 characters, got {0}")]
    WrongLength(usize),

    #[error("postal code must follow the A1A 1A1 pattern: {0}")]
    BadShape(String),

    #[error("'{0}' is not a Canadian postal code letter in this position")]
    InvalidLetter(char),
}

// ============================================================================
// POSTAL CODE
// ============================================================================

/// Uppercase postal code with all whitespace removed.
///
/// `parse` validates the full Canada Post format. `normalize` only cleans the
/// text; the estimators accept whatever they are given and fall back to
/// defaults for codes they do not recognize.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostalCode(String);

impl PostalCode {
    /// Normalize and validate a postal code ("m5v 2t6" -> "M5V2T6")
    pub fn parse(input: &str) -> Result<Self, PostalCodeError> {
        let code = Self::normalize(input);
        let len = code.0.chars().count();

        if len == 0 {
            return Err(PostalCodeError::Empty);
        }
        if len != 6 {
            return Err(PostalCodeError::WrongLength(len));
        }
        if !LOOSE_SHAPE.is_match(&code.0) {
            return Err(PostalCodeError::BadShape(code.0));
        }
        if !POSTAL_CODE_FORMAT.is_match(&code.0) {
            // Shape is right, so one of the letters is out of the allowed set
            let bad = code
                .0
                .chars()
                .enumerate()
                .find(|(i, c)| match i {
                    0 => !VALID_FIRST_LETTERS.contains(*c),
                    2 | 4 => "DFIOQU".contains(*c),
                    _ => false,
                })
                .map(|(_, c)| c)
                .unwrap_or('?');
            return Err(PostalCodeError::InvalidLetter(bad));
        }

        Ok(code)
    }

    /// Uppercase and strip whitespace without validating
    pub fn normalize(input: &str) -> Self {
        PostalCode(
            input
                .chars()
                .filter(|c| !c.is_whitespace())
                .flat_map(char::to_uppercase)
                .collect(),
        )
    }

    /// True when the text (after normalization) is a well-formed postal code
    pub fn is_valid(input: &str) -> bool {
        Self::parse(input).is_ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn first_letter(&self) -> Option<char> {
        self.0.chars().next()
    }

    /// Numeric value of the second character, the rurality/variation signal
    pub fn second_digit(&self) -> Option<u32> {
        self.0.chars().nth(1).and_then(|c| c.to_digit(10))
    }

    /// Forward sortation area, the first three characters ("M5V")
    pub fn fsa(&self) -> &str {
        match self.0.char_indices().nth(3) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// "M5V2T6" -> "M5V 2T6"
    pub fn formatted(&self) -> String {
        if self.0.chars().count() == 6 {
            format!("{} {}", self.fsa(), &self.0[self.fsa().len()..])
        } else {
            self.0.clone()
        }
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PostalCode {
    type Err = PostalCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PostalCode::parse(s)
    }
}

impl AsRef<str> for PostalCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case_and_spaces() {
        let code = PostalCode::parse(" m5v 2t6 ").unwrap();
        assert_eq!(code.as_str(), "M5V2T6");
        assert_eq!(code.formatted(), "M5V 2T6");
        assert_eq!(code.fsa(), "M5V");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(PostalCode::parse("   "), Err(PostalCodeError::Empty));
        assert_eq!(PostalCode::parse("M5V2T"), Err(PostalCodeError::WrongLength(5)));
        assert!(matches!(
            PostalCode::parse("55V2T6"),
            Err(PostalCodeError::BadShape(_))
        ));
    }

    #[test]
    fn test_parse_rejects_unassigned_letters() {
        assert_eq!(
            PostalCode::parse("Z1Z1Z1"),
            Err(PostalCodeError::InvalidLetter('Z'))
        );
        assert_eq!(
            PostalCode::parse("D1A1A1"),
            Err(PostalCodeError::InvalidLetter('D'))
        );
        assert_eq!(
            PostalCode::parse("K1O1A1"),
            Err(PostalCodeError::InvalidLetter('O'))
        );
    }

    #[test]
    fn test_normalize_does_not_validate() {
        let code = PostalCode::normalize("z1z 1z1");
        assert_eq!(code.as_str(), "Z1Z1Z1");
        assert_eq!(code.first_letter(), Some('Z'));
        assert_eq!(code.second_digit(), Some(1));
    }

    #[test]
    fn test_second_digit() {
        assert_eq!(PostalCode::normalize("K0A1A0").second_digit(), Some(0));
        assert_eq!(PostalCode::normalize("M5V2T6").second_digit(), Some(5));
        assert_eq!(PostalCode::normalize("MXV2T6").second_digit(), None);
        assert_eq!(PostalCode::normalize("M").second_digit(), None);
    }

    #[test]
    fn test_is_valid() {
        assert!(PostalCode::is_valid("H3Z 2Y7"));
        assert!(PostalCode::is_valid("x0a0h0"));
        assert!(!PostalCode::is_valid("123 Main Street"));
    }
}

// 🗺️ Region Lookup - Postal letter → province → estimation profile
// The Ontario fallback for unknown input lives here and nowhere else

use crate::postal::PostalCode;
use crate::profiles::{profile_for, ProvinceProfile};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// PROVINCE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Province {
    NewfoundlandAndLabrador,
    NovaScotia,
    PrinceEdwardIsland,
    NewBrunswick,
    Quebec,
    Ontario,
    Manitoba,
    Saskatchewan,
    Alberta,
    BritishColumbia,
    Yukon,
    NorthwestTerritories,
    Nunavut,
}

impl Province {
    pub const ALL: [Province; 13] = [
        Province::NewfoundlandAndLabrador,
        Province::NovaScotia,
        Province::PrinceEdwardIsland,
        Province::NewBrunswick,
        Province::Quebec,
        Province::Ontario,
        Province::Manitoba,
        Province::Saskatchewan,
        Province::Alberta,
        Province::BritishColumbia,
        Province::Yukon,
        Province::NorthwestTerritories,
        Province::Nunavut,
    ];

    /// Full English name
    pub fn name(&self) -> &'static str {
        match self {
            Province::NewfoundlandAndLabrador => "Newfoundland and Labrador",
            Province::NovaScotia => "Nova Scotia",
            Province::PrinceEdwardIsland => "Prince Edward Island",
            Province::NewBrunswick => "New Brunswick",
            Province::Quebec => "Quebec",
            Province::Ontario => "Ontario",
            Province::Manitoba => "Manitoba",
            Province::Saskatchewan => "Saskatchewan",
            Province::Alberta => "Alberta",
            Province::BritishColumbia => "British Columbia",
            Province::Yukon => "Yukon",
            Province::NorthwestTerritories => "Northwest Territories",
            Province::Nunavut => "Nunavut",
        }
    }

    /// Canada Post two-letter abbreviation
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Province::NewfoundlandAndLabrador => "NL",
            Province::NovaScotia => "NS",
            Province::PrinceEdwardIsland => "PE",
            Province::NewBrunswick => "NB",
            Province::Quebec => "QC",
            Province::Ontario => "ON",
            Province::Manitoba => "MB",
            Province::Saskatchewan => "SK",
            Province::Alberta => "AB",
            Province::BritishColumbia => "BC",
            Province::Yukon => "YT",
            Province::NorthwestTerritories => "NT",
            Province::Nunavut => "NU",
        }
    }

    pub fn is_territory(&self) -> bool {
        matches!(
            self,
            Province::Yukon | Province::NorthwestTerritories | Province::Nunavut
        )
    }

    /// Match a full name or abbreviation, ignoring case and surrounding spaces
    pub fn from_name(input: &str) -> Option<Province> {
        let wanted = input.trim();
        if wanted.is_empty() {
            return None;
        }

        Province::ALL.iter().copied().find(|p| {
            p.name().eq_ignore_ascii_case(wanted) || p.abbreviation().eq_ignore_ascii_case(wanted)
        })
    }

    /// Province from the postal code's first letter.
    ///
    /// X is shared by two territories: X0A, X0B and X0C are Nunavut, the
    /// rest is the Northwest Territories.
    pub fn from_postal_code(code: &PostalCode) -> Option<Province> {
        let province = match code.first_letter()? {
            'A' => Province::NewfoundlandAndLabrador,
            'B' => Province::NovaScotia,
            'C' => Province::PrinceEdwardIsland,
            'E' => Province::NewBrunswick,
            'G' | 'H' | 'J' => Province::Quebec,
            'K' | 'L' | 'M' | 'N' | 'P' => Province::Ontario,
            'R' => Province::Manitoba,
            'S' => Province::Saskatchewan,
            'T' => Province::Alberta,
            'V' => Province::BritishColumbia,
            'X' => {
                if ["X0A", "X0B", "X0C"].contains(&code.fsa()) {
                    Province::Nunavut
                } else {
                    Province::NorthwestTerritories
                }
            }
            'Y' => Province::Yukon,
            _ => return None,
        };
        Some(province)
    }
}

impl fmt::Display for Province {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Province {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Province::from_name(s).ok_or_else(|| format!("Unknown province or territory: {}", s))
    }
}

// ============================================================================
// RURAL CLASSIFICATION
// ============================================================================

/// Third-position letters accepted by the rural letter patterns (H, I, O excluded)
const RURAL_PATTERN_THIRD_LETTERS: &str = "ABCDEFGJKLMNPQRSTUVWXYZ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuralRule {
    /// Rural when the second character is '0'
    SecondDigitZero,

    /// Rural when the second character is '0', or the code starts with one of
    /// `letters`, then a digit 1-9, then a letter from the pattern set
    SecondDigitZeroOrLetters { letters: &'static str },
}

impl RuralRule {
    pub fn is_rural(&self, code: &PostalCode) -> bool {
        if code.second_digit() == Some(0) {
            return true;
        }

        match self {
            RuralRule::SecondDigitZero => false,
            RuralRule::SecondDigitZeroOrLetters { letters } => {
                let mut chars = code.as_str().chars();
                match (chars.next(), chars.next(), chars.next()) {
                    (Some(first), Some(digit), Some(third)) => {
                        letters.contains(first)
                            && matches!(digit, '1'..='9')
                            && RURAL_PATTERN_THIRD_LETTERS.contains(third)
                    }
                    _ => false,
                }
            }
        }
    }
}

/// Rural/urban classification for a province, or the plain second-digit rule
/// when the province has no profile of its own
pub fn is_rural(code: &PostalCode, province: Option<Province>) -> bool {
    province
        .and_then(profile_for)
        .map(|p| p.rural_rule)
        .unwrap_or(RuralRule::SecondDigitZero)
        .is_rural(code)
}

// ============================================================================
// RESOLUTION
// ============================================================================

/// Pick the estimation profile for a request.
///
/// A caller-supplied province (name or abbreviation) wins when it has a
/// profile. Otherwise the postal code's first letter decides. Anything left
/// over, including the territories, gets Ontario's profile so an estimate is
/// always produced.
pub fn resolve_province(code: &PostalCode, province: Option<&str>) -> &'static ProvinceProfile {
    if let Some(profile) = province
        .and_then(Province::from_name)
        .and_then(profile_for)
    {
        return profile;
    }

    let from_code = Province::from_postal_code(code);
    if let Some(profile) = from_code.and_then(profile_for) {
        return profile;
    }

    tracing::debug!(
        postal_code = %code,
        requested = ?province,
        from_code = ?from_code,
        "no estimation profile, falling back to Ontario"
    );
    ProvinceProfile::ontario()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> PostalCode {
        PostalCode::normalize(s)
    }

    #[test]
    fn test_province_from_name_and_abbreviation() {
        assert_eq!(Province::from_name("Ontario"), Some(Province::Ontario));
        assert_eq!(Province::from_name("on"), Some(Province::Ontario));
        assert_eq!(Province::from_name(" british columbia "), Some(Province::BritishColumbia));
        assert_eq!(Province::from_name("QC"), Some(Province::Quebec));
        assert_eq!(Province::from_name("Atlantis"), None);
        assert_eq!(Province::from_name(""), None);
        assert!("Nunavut".parse::<Province>().is_ok());
    }

    #[test]
    fn test_every_province_has_unique_abbreviation() {
        for a in Province::ALL {
            for b in Province::ALL {
                if a != b {
                    assert_ne!(a.abbreviation(), b.abbreviation());
                }
            }
            assert_eq!(Province::from_name(a.abbreviation()), Some(a));
        }
    }

    #[test]
    fn test_province_from_postal_letter() {
        assert_eq!(Province::from_postal_code(&code("M5V2T6")), Some(Province::Ontario));
        assert_eq!(Province::from_postal_code(&code("H2X1Y4")), Some(Province::Quebec));
        assert_eq!(Province::from_postal_code(&code("V6B1A1")), Some(Province::BritishColumbia));
        assert_eq!(Province::from_postal_code(&code("Y1A1A1")), Some(Province::Yukon));
        assert_eq!(Province::from_postal_code(&code("X0A0H0")), Some(Province::Nunavut));
        assert_eq!(
            Province::from_postal_code(&code("X1A2P3")),
            Some(Province::NorthwestTerritories)
        );
        assert_eq!(Province::from_postal_code(&code("Z1Z1Z1")), None);
        assert_eq!(Province::from_postal_code(&code("")), None);
    }

    #[test]
    fn test_second_digit_rule() {
        let rule = RuralRule::SecondDigitZero;
        assert!(rule.is_rural(&code("K0A1A0")));
        assert!(!rule.is_rural(&code("M5V2T6")));
    }

    #[test]
    fn test_quebec_letter_rule_marks_most_codes_rural() {
        let rule = RuralRule::SecondDigitZeroOrLetters { letters: "GHJ" };
        assert!(rule.is_rural(&code("J0K1A0")));
        assert!(rule.is_rural(&code("H2X1Y4")));
        assert!(rule.is_rural(&code("G1R4P5")));
        // H in third position is outside the pattern set
        assert!(!rule.is_rural(&code("H3H1A1")));
        assert!(!rule.is_rural(&code("M5V2T6")));
    }

    #[test]
    fn test_is_rural_without_profile_uses_second_digit() {
        assert!(is_rural(&code("X0A0H0"), Some(Province::Nunavut)));
        assert!(!is_rural(&code("Y1A1A1"), None));
        assert!(is_rural(&code("H2X1Y4"), Some(Province::Quebec)));
        assert!(!is_rural(&code("H2X1Y4"), None));
    }

    #[test]
    fn test_resolve_prefers_known_caller_province() {
        let profile = resolve_province(&code("M5V2T6"), Some("BC"));
        assert_eq!(profile.province, Province::BritishColumbia);
    }

    #[test]
    fn test_resolve_falls_back_to_postal_letter_then_ontario() {
        assert_eq!(
            resolve_province(&code("T2P1J9"), Some("Narnia")).province,
            Province::Alberta
        );
        assert_eq!(resolve_province(&code("T2P1J9"), None).province, Province::Alberta);
        assert_eq!(resolve_province(&code("Z1Z1Z1"), None).province, Province::Ontario);
        assert_eq!(resolve_province(&code("Y1A1A1"), None).province, Province::Ontario);
        assert_eq!(
            resolve_province(&code("X1A2P3"), Some("Northwest Territories")).province,
            Province::Ontario
        );
    }
}

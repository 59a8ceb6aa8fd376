// 🏠 Size Estimator
// Province base size (urban/rural) scaled by a local variation factor

use crate::postal::PostalCode;
use crate::profiles::ProvinceProfile;
use crate::region::resolve_province;

/// `0.9 + second_digit * 0.02`: digit 0 gives 0.90, digit 9 gives 1.08.
/// A second character that is not a digit leaves the base size unchanged.
pub fn local_variation_factor(code: &PostalCode) -> f64 {
    match code.second_digit() {
        Some(digit) => 0.9 + f64::from(digit) * 0.02,
        None => 1.0,
    }
}

/// Estimated floor area in sq ft. Unknown or missing provinces are resolved
/// from the postal code, then Ontario.
pub fn estimate_house_size(code: &PostalCode, province: Option<&str>) -> u32 {
    house_size_for(resolve_province(code, province), code)
}

pub fn house_size_for(profile: &ProvinceProfile, code: &PostalCode) -> u32 {
    let base = profile.house_size.pick(profile.is_rural(code));
    (f64::from(base) * local_variation_factor(code)).round() as u32
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::all_profiles;
    use approx::assert_relative_eq;

    #[test]
    fn test_local_variation_range() {
        assert_relative_eq!(local_variation_factor(&PostalCode::normalize("K0A1A0")), 0.9);
        assert_relative_eq!(local_variation_factor(&PostalCode::normalize("M5V2T6")), 1.0);
        assert_relative_eq!(local_variation_factor(&PostalCode::normalize("T9X1A1")), 1.08);
        assert_relative_eq!(local_variation_factor(&PostalCode::normalize("TXX1A1")), 1.0);
    }

    #[test]
    fn test_toronto_urban() {
        let size = estimate_house_size(&PostalCode::normalize("M5V 2T6"), None);
        assert_eq!(size, 1400);
    }

    #[test]
    fn test_ontario_rural() {
        let size = estimate_house_size(&PostalCode::normalize("K0A 1A0"), Some("Ontario"));
        assert_eq!(size, 1620);
    }

    #[test]
    fn test_explicit_province_overrides_postal_letter() {
        // Alberta urban 1800 * 1.0
        let size = estimate_house_size(&PostalCode::normalize("M5V2T6"), Some("AB"));
        assert_eq!(size, 1800);
    }

    #[test]
    fn test_unknown_prefix_uses_ontario() {
        // Ontario urban 1400 * (0.9 + 0.02)
        let size = estimate_house_size(&PostalCode::normalize("Z1Z1Z1"), None);
        assert_eq!(size, 1288);
    }

    #[test]
    fn test_quebec_letter_pattern_counts_as_rural() {
        // Quebec rural 1700 * (0.9 + 2 * 0.02)
        let size = estimate_house_size(&PostalCode::normalize("H2X1Y4"), None);
        assert_eq!(size, 1598);
    }

    #[test]
    fn test_always_positive() {
        let letters = "ABCEGHJKLMNPRSTVXY";
        for profile in all_profiles() {
            for letter in letters.chars() {
                for digit in 0..=9 {
                    let code = PostalCode::normalize(&format!("{}{}A1A1", letter, digit));
                    assert!(house_size_for(profile, &code) > 0);
                }
            }
        }
    }
}

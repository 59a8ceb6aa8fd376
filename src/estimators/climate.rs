// 🌡️ Climate/Seasonal Factors
// Ordered climate regions per province, first match wins

use crate::postal::PostalCode;
use crate::profiles::{
    profile_for, ClimateRegion, ProvinceProfile, RegionMatcher, DEFAULT_SEASONAL_FACTOR,
};
use crate::region::Province;

/// Used only if a profile's list somehow has no catch-all
static NEUTRAL_REGION: ClimateRegion = ClimateRegion {
    name: "default",
    factor: 1.0,
    matcher: RegionMatcher::Any,
};

/// Walk the province's climate regions in declared order and return the first
/// one whose pattern matches. Order matters: city clusters are listed before
/// the province-wide catch-all, and reordering silently changes results.
pub fn resolve_climate_region(
    profile: &'static ProvinceProfile,
    code: &PostalCode,
) -> &'static ClimateRegion {
    for region in profile.climate_regions {
        if region.matcher.matches(code) {
            tracing::trace!(
                province = %profile.province,
                region = region.name,
                factor = region.factor,
                "climate region matched"
            );
            return region;
        }
    }

    &NEUTRAL_REGION
}

/// Province-wide seasonal multiplier, 1.10 when the province has no profile
pub fn seasonal_factor(province: Option<Province>) -> f64 {
    province
        .and_then(profile_for)
        .map(|p| p.seasonal_factor)
        .unwrap_or(DEFAULT_SEASONAL_FACTOR)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::all_profiles;

    fn region_name(province: Province, code: &str) -> &'static str {
        let profile = profile_for(province).unwrap();
        resolve_climate_region(profile, &PostalCode::normalize(code)).name
    }

    #[test]
    fn test_ontario_regions() {
        assert_eq!(region_name(Province::Ontario, "M5V2T6"), "southern");
        assert_eq!(region_name(Province::Ontario, "L4C3G5"), "southern");
        assert_eq!(region_name(Province::Ontario, "P3A1A1"), "northern");
        assert_eq!(region_name(Province::Ontario, "K1A0B1"), "central");
        assert_eq!(region_name(Province::Ontario, "N2L3G1"), "central");
    }

    #[test]
    fn test_british_columbia_regions() {
        assert_eq!(region_name(Province::BritishColumbia, "V6B1A1"), "coastal");
        assert_eq!(region_name(Province::BritishColumbia, "V8W1P6"), "interior");
        assert_eq!(region_name(Province::BritishColumbia, "V0J1A0"), "northern");
        assert_eq!(region_name(Province::BritishColumbia, "V1Y9T1"), "interior");
    }

    #[test]
    fn test_other_provinces() {
        assert_eq!(region_name(Province::Alberta, "T0A0A0"), "northern");
        assert_eq!(region_name(Province::Alberta, "T2P1J9"), "southern");
        assert_eq!(region_name(Province::Saskatchewan, "S9X1A1"), "northern");
        assert_eq!(region_name(Province::Manitoba, "R3C4T3"), "southern");
        assert_eq!(region_name(Province::Quebec, "H2X1Y4"), "southern");
        assert_eq!(region_name(Province::Quebec, "G1R4P5"), "northern");
        assert_eq!(region_name(Province::Quebec, "J4K2T1"), "central");
        assert_eq!(region_name(Province::NewBrunswick, "E1C4M3"), "coastal");
        assert_eq!(region_name(Province::NovaScotia, "B3H4R2"), "coastal");
        assert_eq!(region_name(Province::NovaScotia, "B2N5E3"), "inland");
        assert_eq!(region_name(Province::PrinceEdwardIsland, "C1A4P3"), "standard");
        assert_eq!(region_name(Province::NewfoundlandAndLabrador, "A0K1A0"), "inland");
    }

    #[test]
    fn test_every_code_resolves_to_a_declared_region() {
        let codes = ["A1A1A1", "B0B0B0", "K0A1A0", "M5V2T6", "Z1Z1Z1", "", "V"];
        for profile in all_profiles() {
            for code in codes {
                let region = resolve_climate_region(profile, &PostalCode::normalize(code));
                assert!(
                    profile.climate_regions.iter().any(|r| r == region),
                    "{} / {:?} resolved outside its list",
                    profile.province,
                    code
                );
            }
        }
    }

    #[test]
    fn test_seasonal_factor() {
        assert_eq!(seasonal_factor(Some(Province::BritishColumbia)), 1.05);
        assert_eq!(seasonal_factor(Some(Province::Alberta)), 1.15);
        assert_eq!(seasonal_factor(Some(Province::Yukon)), 1.10);
        assert_eq!(seasonal_factor(None), 1.10);
    }
}

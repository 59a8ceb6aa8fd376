// 📊 Province Profiles - Estimation constants as data
// One record per province: sizes, window density, energy intensity, climate regions
//
// Adding a province is a table edit here, not a logic change in the estimators.

use crate::postal::PostalCode;
use crate::region::{Province, RuralRule};
use serde::Serialize;

// ============================================================================
// PROFILE TYPES
// ============================================================================

/// Urban/rural pair of a per-province value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UrbanRural<T> {
    pub urban: T,
    pub rural: T,
}

impl<T: Copy> UrbanRural<T> {
    pub fn pick(&self, is_rural: bool) -> T {
        if is_rural {
            self.rural
        } else {
            self.urban
        }
    }
}

/// Average annual consumption per square foot (2021 provincial data)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyIntensity {
    /// kWh per sq ft
    pub electricity: f64,
    /// GJ per sq ft, all fuels
    pub total: f64,
}

/// Which postal codes a climate region covers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum RegionMatcher {
    /// Codes starting with any of these prefixes
    Prefixes(&'static [&'static str]),
    /// Everything; must be last in a province's list
    Any,
}

impl RegionMatcher {
    pub fn matches(&self, code: &PostalCode) -> bool {
        match self {
            RegionMatcher::Prefixes(prefixes) => prefixes.iter().any(|p| code.starts_with(p)),
            RegionMatcher::Any => true,
        }
    }
}

/// A named climate sub-region and its energy multiplier
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClimateRegion {
    pub name: &'static str,
    pub factor: f64,
    pub matcher: RegionMatcher,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProvinceProfile {
    pub province: Province,

    /// Average house size (sq ft)
    pub house_size: UrbanRural<u32>,

    /// Windows per 1000 sq ft
    pub window_ratio: UrbanRural<f64>,

    /// Minimum window count for rural homes
    pub rural_window_floor: u32,

    pub energy: EnergyIntensity,

    /// Heating/cooling degree-day adjustment
    pub seasonal_factor: f64,

    #[serde(skip)]
    pub rural_rule: RuralRule,

    /// Evaluated in order, first match wins, last entry is `RegionMatcher::Any`
    pub climate_regions: &'static [ClimateRegion],
}

impl ProvinceProfile {
    pub fn ontario() -> &'static ProvinceProfile {
        &PROFILES[ONTARIO_INDEX]
    }

    pub fn is_rural(&self, code: &PostalCode) -> bool {
        self.rural_rule.is_rural(code)
    }
}

/// Look up the profile for a province; territories have none
pub fn profile_for(province: Province) -> Option<&'static ProvinceProfile> {
    PROFILES.iter().find(|p| p.province == province)
}

/// All profiles in table order
pub fn all_profiles() -> &'static [ProvinceProfile] {
    PROFILES
}

// ============================================================================
// DEFAULTS
// ============================================================================

/// Urban homes always get at least this many windows
pub const URBAN_WINDOW_FLOOR: u32 = 4;

/// Rural window floor when no profile applies
pub const DEFAULT_RURAL_WINDOW_FLOOR: u32 = 6;

/// Seasonal multiplier when no profile applies
pub const DEFAULT_SEASONAL_FACTOR: f64 = 1.10;

/// Rural properties use 15% more energy
pub const RURAL_ENERGY_FACTOR: f64 = 1.15;

// ============================================================================
// TABLE
// ============================================================================

const ONTARIO_INDEX: usize = 4;

const SECOND_DIGIT: RuralRule = RuralRule::SecondDigitZero;

static PROFILES: &[ProvinceProfile] = &[
    ProvinceProfile {
        province: Province::BritishColumbia,
        house_size: UrbanRural { urban: 1500, rural: 2200 },
        // More windows for views
        window_ratio: UrbanRural { urban: 6.0, rural: 8.0 },
        rural_window_floor: 8,
        energy: EnergyIntensity { electricity: 5.47, total: 0.0492 },
        seasonal_factor: 1.05,
        rural_rule: SECOND_DIGIT,
        climate_regions: &[
            // Vancouver, Victoria
            ClimateRegion { name: "coastal", factor: 0.9, matcher: RegionMatcher::Prefixes(&["V6", "V7"]) },
            ClimateRegion { name: "northern", factor: 1.2, matcher: RegionMatcher::Prefixes(&["V0"]) },
            ClimateRegion { name: "interior", factor: 1.1, matcher: RegionMatcher::Any },
        ],
    },
    ProvinceProfile {
        province: Province::Alberta,
        house_size: UrbanRural { urban: 1800, rural: 2400 },
        window_ratio: UrbanRural { urban: 5.0, rural: 7.0 },
        rural_window_floor: DEFAULT_RURAL_WINDOW_FLOOR,
        energy: EnergyIntensity { electricity: 3.58, total: 0.0677 },
        seasonal_factor: 1.15,
        rural_rule: SECOND_DIGIT,
        climate_regions: &[
            ClimateRegion { name: "northern", factor: 1.2, matcher: RegionMatcher::Prefixes(&["T0", "T1"]) },
            ClimateRegion { name: "southern", factor: 1.0, matcher: RegionMatcher::Any },
        ],
    },
    ProvinceProfile {
        province: Province::Saskatchewan,
        house_size: UrbanRural { urban: 1600, rural: 2600 },
        window_ratio: UrbanRural { urban: 5.0, rural: 7.0 },
        rural_window_floor: DEFAULT_RURAL_WINDOW_FLOOR,
        energy: EnergyIntensity { electricity: 4.11, total: 0.0596 },
        seasonal_factor: 1.15,
        rural_rule: SECOND_DIGIT,
        climate_regions: &[
            ClimateRegion { name: "northern", factor: 1.2, matcher: RegionMatcher::Prefixes(&["S0", "S9"]) },
            ClimateRegion { name: "southern", factor: 1.0, matcher: RegionMatcher::Any },
        ],
    },
    ProvinceProfile {
        province: Province::Manitoba,
        house_size: UrbanRural { urban: 1400, rural: 2200 },
        window_ratio: UrbanRural { urban: 4.0, rural: 6.0 },
        rural_window_floor: DEFAULT_RURAL_WINDOW_FLOOR,
        energy: EnergyIntensity { electricity: 7.17, total: 0.0557 },
        seasonal_factor: 1.15,
        rural_rule: SECOND_DIGIT,
        climate_regions: &[
            ClimateRegion { name: "northern", factor: 1.2, matcher: RegionMatcher::Prefixes(&["R0"]) },
            ClimateRegion { name: "southern", factor: 1.0, matcher: RegionMatcher::Any },
        ],
    },
    ProvinceProfile {
        province: Province::Ontario,
        house_size: UrbanRural { urban: 1400, rural: 1800 },
        window_ratio: UrbanRural { urban: 4.0, rural: 6.0 },
        rural_window_floor: DEFAULT_RURAL_WINDOW_FLOOR,
        energy: EnergyIntensity { electricity: 5.22, total: 0.0558 },
        seasonal_factor: 1.10,
        rural_rule: SECOND_DIGIT,
        climate_regions: &[
            ClimateRegion { name: "northern", factor: 1.15, matcher: RegionMatcher::Prefixes(&["P"]) },
            // Toronto, GTA
            ClimateRegion { name: "southern", factor: 0.95, matcher: RegionMatcher::Prefixes(&["M", "L"]) },
            ClimateRegion { name: "central", factor: 1.05, matcher: RegionMatcher::Any },
        ],
    },
    ProvinceProfile {
        province: Province::Quebec,
        house_size: UrbanRural { urban: 1300, rural: 1700 },
        window_ratio: UrbanRural { urban: 4.0, rural: 6.0 },
        rural_window_floor: DEFAULT_RURAL_WINDOW_FLOOR,
        energy: EnergyIntensity { electricity: 11.42, total: 0.0455 },
        seasonal_factor: 1.10,
        rural_rule: RuralRule::SecondDigitZeroOrLetters { letters: "GHJ" },
        climate_regions: &[
            ClimateRegion { name: "northern", factor: 1.15, matcher: RegionMatcher::Prefixes(&["G"]) },
            // Montreal
            ClimateRegion { name: "southern", factor: 0.95, matcher: RegionMatcher::Prefixes(&["H"]) },
            ClimateRegion { name: "central", factor: 1.05, matcher: RegionMatcher::Any },
        ],
    },
    ProvinceProfile {
        province: Province::NewBrunswick,
        house_size: UrbanRural { urban: 1500, rural: 2000 },
        window_ratio: UrbanRural { urban: 5.0, rural: 7.0 },
        rural_window_floor: DEFAULT_RURAL_WINDOW_FLOOR,
        energy: EnergyIntensity { electricity: 10.42, total: 0.0428 },
        seasonal_factor: 1.10,
        rural_rule: SECOND_DIGIT,
        climate_regions: &[
            // Saint John, Moncton
            ClimateRegion { name: "coastal", factor: 0.95, matcher: RegionMatcher::Prefixes(&["E1", "E2"]) },
            ClimateRegion { name: "inland", factor: 1.05, matcher: RegionMatcher::Any },
        ],
    },
    ProvinceProfile {
        province: Province::NovaScotia,
        house_size: UrbanRural { urban: 1400, rural: 1900 },
        window_ratio: UrbanRural { urban: 5.0, rural: 7.0 },
        rural_window_floor: DEFAULT_RURAL_WINDOW_FLOOR,
        energy: EnergyIntensity { electricity: 6.86, total: 0.0441 },
        seasonal_factor: 1.05,
        rural_rule: SECOND_DIGIT,
        climate_regions: &[
            ClimateRegion {
                name: "coastal",
                factor: 0.95,
                matcher: RegionMatcher::Prefixes(&["B3", "B4", "B5", "B6", "B7", "B8", "B9"]),
            },
            ClimateRegion { name: "inland", factor: 1.05, matcher: RegionMatcher::Any },
        ],
    },
    ProvinceProfile {
        province: Province::PrinceEdwardIsland,
        house_size: UrbanRural { urban: 1300, rural: 1800 },
        window_ratio: UrbanRural { urban: 5.0, rural: 7.0 },
        rural_window_floor: DEFAULT_RURAL_WINDOW_FLOOR,
        energy: EnergyIntensity { electricity: 6.44, total: 0.0467 },
        seasonal_factor: 1.05,
        rural_rule: SECOND_DIGIT,
        climate_regions: &[
            ClimateRegion { name: "standard", factor: 1.0, matcher: RegionMatcher::Any },
        ],
    },
    ProvinceProfile {
        province: Province::NewfoundlandAndLabrador,
        house_size: UrbanRural { urban: 1400, rural: 1900 },
        window_ratio: UrbanRural { urban: 5.0, rural: 7.0 },
        rural_window_floor: DEFAULT_RURAL_WINDOW_FLOOR,
        energy: EnergyIntensity { electricity: 9.47, total: 0.0431 },
        seasonal_factor: 1.10,
        rural_rule: SECOND_DIGIT,
        climate_regions: &[
            // St. John's and coastal
            ClimateRegion {
                name: "coastal",
                factor: 0.95,
                matcher: RegionMatcher::Prefixes(&["A1", "A2", "A3", "A4", "A5", "A6", "A7", "A8", "A9"]),
            },
            ClimateRegion { name: "inland", factor: 1.05, matcher: RegionMatcher::Any },
        ],
    },
];

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ontario_index_points_at_ontario() {
        assert_eq!(ProvinceProfile::ontario().province, Province::Ontario);
    }

    #[test]
    fn test_every_province_has_a_profile() {
        for province in Province::ALL {
            assert_eq!(profile_for(province).is_some(), !province.is_territory(), "{}", province);
        }
        assert_eq!(all_profiles().len(), 10);
    }

    #[test]
    fn test_climate_lists_end_with_catch_all() {
        for profile in all_profiles() {
            let regions = profile.climate_regions;
            assert!(!regions.is_empty(), "{} has no climate regions", profile.province);

            let last = regions[regions.len() - 1];
            assert_eq!(last.matcher, RegionMatcher::Any, "{}", profile.province);

            // Only the last entry may be a catch-all
            for region in &regions[..regions.len() - 1] {
                assert_ne!(region.matcher, RegionMatcher::Any, "{}", profile.province);
            }
        }
    }

    #[test]
    fn test_rural_sizes_not_smaller_than_urban() {
        for profile in all_profiles() {
            assert!(profile.house_size.rural >= profile.house_size.urban);
            assert!(profile.window_ratio.rural >= profile.window_ratio.urban);
            assert!(profile.rural_window_floor >= DEFAULT_RURAL_WINDOW_FLOOR);
        }
    }

    #[test]
    fn test_region_matcher() {
        let toronto = PostalCode::normalize("M5V2T6");
        assert!(RegionMatcher::Prefixes(&["M", "L"]).matches(&toronto));
        assert!(!RegionMatcher::Prefixes(&["P"]).matches(&toronto));
        assert!(RegionMatcher::Any.matches(&toronto));
    }
}

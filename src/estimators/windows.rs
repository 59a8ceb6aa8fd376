// 🪟 Window Estimator
// Window density per 1000 sq ft with urban/rural floors

use crate::profiles::{profile_for, ProvinceProfile, URBAN_WINDOW_FLOOR};
use crate::region::Province;
use serde::{Deserialize, Serialize};

/// Window count for a house. Provinces without a profile (or no province at
/// all) use Ontario's ratios.
pub fn estimate_windows(house_size: u32, is_rural: bool, province: Option<&str>) -> u32 {
    let profile = province
        .and_then(Province::from_name)
        .and_then(profile_for)
        .unwrap_or_else(ProvinceProfile::ontario);

    windows_for(profile, house_size, is_rural)
}

pub fn windows_for(profile: &ProvinceProfile, house_size: u32, is_rural: bool) -> u32 {
    let ratio = profile.window_ratio.pick(is_rural);
    let raw = (f64::from(house_size) / 1000.0 * ratio).round() as u32;
    let floor = if is_rural {
        profile.rural_window_floor
    } else {
        URBAN_WINDOW_FLOOR
    };

    raw.max(floor)
}

// ============================================================================
// DISPLAY SPLIT
// ============================================================================

/// Standard/large breakdown shown next to the total.
///
/// Both parts are rounded on their own; nothing forces them to add up to
/// the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSplit {
    pub standard: u32,
    pub large: u32,
}

impl WindowSplit {
    pub fn from_total(total: u32) -> Self {
        WindowSplit {
            standard: (f64::from(total) * 0.6).round() as u32,
            large: (f64::from(total) * 0.4).round() as u32,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

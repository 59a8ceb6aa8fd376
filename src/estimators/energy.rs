// ⚡ Energy Estimator
// Annual electricity (kWh) and total energy (GJ) from floor area
//
// usage = size × intensity × climate × rural × seasonal

use crate::estimators::climate::resolve_climate_region;
use crate::postal::PostalCode;
use crate::profiles::{ProvinceProfile, RURAL_ENERGY_FACTOR};
use crate::region::resolve_province;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyUsage {
    /// kWh per year
    pub electricity: u64,
    /// GJ per year, two decimals
    pub total: f64,
}

/// Usage plus the multipliers that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyEstimate {
    pub usage: EnergyUsage,
    pub climate_region: &'static str,
    pub climate_factor: f64,
    pub rural_factor: f64,
    pub seasonal_factor: f64,
}

/// Annual energy use for a house of `house_size` sq ft.
///
/// The per-sq-ft intensities come from the resolved province. When the
/// province is missing or unknown and the postal code does not point at a
/// profiled province, Ontario's intensities are used; callers get Ontario's
/// numbers, not an error.
pub fn estimate_energy_usage(
    house_size: u32,
    code: &PostalCode,
    province: Option<&str>,
) -> EnergyUsage {
    energy_for(resolve_province(code, province), house_size, code).usage
}

pub fn energy_for(
    profile: &'static ProvinceProfile,
    house_size: u32,
    code: &PostalCode,
) -> EnergyEstimate {
    let region = resolve_climate_region(profile, code);
    let rural_factor = if profile.is_rural(code) {
        RURAL_ENERGY_FACTOR
    } else {
        1.0
    };
    let seasonal_factor = profile.seasonal_factor;

    let size = f64::from(house_size);
    let electricity =
        size * profile.energy.electricity * region.factor * rural_factor * seasonal_factor;
    let total = size * profile.energy.total * region.factor * rural_factor * seasonal_factor;

    EnergyEstimate {
        usage: EnergyUsage {
            electricity: electricity.round() as u64,
            total: round_to_hundredths(total),
        },
        climate_region: region.name,
        climate_factor: region.factor,
        rural_factor,
        seasonal_factor,
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============================================================================
// TESTS
// ============================================================================

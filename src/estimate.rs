// 🧮 Estimate Pipeline - one request, all figures
// Province resolved once, size first, then windows and energy from that size

use crate::estimators::energy::{energy_for, EnergyUsage};
use crate::estimators::size::house_size_for;
use crate::estimators::windows::{windows_for, WindowSplit};
use crate::postal::PostalCode;
use crate::region::{resolve_province, Province};
use serde::Serialize;

/// Manual size adjustments are limited to what the size slider offers
pub const MIN_MANUAL_SIZE: u32 = 500;
pub const MAX_MANUAL_SIZE: u32 = 5000;
pub const MANUAL_SIZE_STEP: u32 = 100;

/// Everything shown for one property.
///
/// Built from scratch on every call; an overridden house size produces a new
/// result rather than patching an old one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateResult {
    pub postal_code: PostalCode,
    pub province: Province,
    pub house_size: u32,
    pub size_overridden: bool,
    pub windows: u32,
    pub window_split: WindowSplit,
    pub energy: EnergyUsage,
    pub climate_region: &'static str,
    pub is_rural: bool,
}

impl EstimateResult {
    pub fn summary(&self) -> String {
        format!(
            "{} ({}, {}): {} sq ft{}, {} windows, {} kWh, {:.2} GJ",
            self.postal_code.formatted(),
            self.province.abbreviation(),
            if self.is_rural { "rural" } else { "urban" },
            self.house_size,
            if self.size_overridden { " (manual)" } else { "" },
            self.windows,
            self.energy.electricity,
            self.energy.total,
        )
    }
}

/// Run every estimator for a postal code.
///
/// `size_override` replaces the estimated house size; windows and energy are
/// then computed from the override.
pub fn estimate(
    code: &PostalCode,
    province: Option<&str>,
    size_override: Option<u32>,
) -> EstimateResult {
    let profile = resolve_province(code, province);
    let is_rural = profile.is_rural(code);

    let house_size = size_override.unwrap_or_else(|| house_size_for(profile, code));
    let windows = windows_for(profile, house_size, is_rural);
    let energy = energy_for(profile, house_size, code);

    tracing::debug!(
        postal_code = %code,
        province = %profile.province,
        house_size,
        overridden = size_override.is_some(),
        "estimate computed"
    );

    EstimateResult {
        postal_code: code.clone(),
        province: profile.province,
        house_size,
        size_overridden: size_override.is_some(),
        windows,
        window_split: WindowSplit::from_total(windows),
        energy: energy.usage,
        climate_region: energy.climate_region,
        is_rural,
    }
}

/// Snap a requested manual size onto the slider: nearest 100 sq ft within
/// 500..=5000
pub fn clamp_manual_size(requested: u32) -> u32 {
    let snapped = (requested.saturating_add(MANUAL_SIZE_STEP / 2) / MANUAL_SIZE_STEP) * MANUAL_SIZE_STEP;
    snapped.clamp(MIN_MANUAL_SIZE, MAX_MANUAL_SIZE)
}

// ============================================================================
// TESTS
// ============================================================================

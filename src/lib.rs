// House Estimator - Core Library
// Exposes the estimation engine for use in CLI, TUI, API server, and tests

pub mod config;
pub mod estimate;
pub mod estimators;
pub mod geocode;
pub mod postal;
pub mod profiles;
pub mod region;

// Re-export commonly used types
pub use config::{init_logging, Config, ConfigError};
pub use estimate::{
    clamp_manual_size, estimate, EstimateResult,
    MANUAL_SIZE_STEP, MAX_MANUAL_SIZE, MIN_MANUAL_SIZE,
};
pub use estimators::{
    estimate_energy_usage, estimate_house_size, estimate_windows,
    resolve_climate_region, seasonal_factor,
    EnergyEstimate, EnergyUsage, WindowSplit,
};
pub use geocode::{
    estimate_for_resolution, interpret_response,
    AddressComponent, AddressResolution, GeocodeError, SearchQuery,
};
#[cfg(feature = "geocode")]
pub use geocode::{lookup, AddressResolver, GoogleGeocoder};
pub use postal::{PostalCode, PostalCodeError};
pub use profiles::{all_profiles, profile_for, ClimateRegion, ProvinceProfile};
pub use region::{is_rural, resolve_province, Province, RuralRule};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

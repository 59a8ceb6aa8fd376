// Estimators - house size, windows, energy
//
// Each public estimator takes plain values and resolves its own province, so
// it can be called on its own. The `*_for` variants take an already resolved
// profile and are what the estimate pipeline uses.

pub mod climate;
pub mod energy;
pub mod size;
pub mod windows;

pub use climate::{resolve_climate_region, seasonal_factor};
pub use energy::{estimate_energy_usage, EnergyEstimate, EnergyUsage};
pub use size::{estimate_house_size, local_variation_factor};
pub use windows::{estimate_windows, WindowSplit};

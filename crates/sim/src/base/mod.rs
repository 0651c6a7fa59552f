//! Physical constants and unit conversions shared by the grid readers, the
//! population loop and the stellar kernels.

pub mod constants;
pub mod units;

pub use units::{
    orbital_velocity_kms, period_days_to_separation_au, rsol_to_au, separation_au_to_period_days,
};

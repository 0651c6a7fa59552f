//! Unit conversions for binary orbits.

use super::constants::{DAYS_PER_YEAR, G_AU_MSOL_YR, ORBITAL_VELOCITY_1AU_1MSOL_KMS, RSOL_IN_AU};
use std::f64::consts::PI;

/// Semi-major axis in AU of an orbit with the given masses (Msol) and period
/// (days), from Kepler's third law.
///
/// ```
/// use popsynth_sim::base::period_days_to_separation_au;
///
/// // One solar mass split over two bodies, one year: 1 AU.
/// let a = period_days_to_separation_au(0.5, 0.5, 365.25);
/// assert!((a - 1.0).abs() < 1e-12);
/// ```
pub fn period_days_to_separation_au(mass_1: f64, mass_2: f64, period_days: f64) -> f64 {
    let period_years = period_days / DAYS_PER_YEAR;
    (G_AU_MSOL_YR * (mass_1 + mass_2) * period_years * period_years / (4.0 * PI * PI)).cbrt()
}

/// Orbital period in days for a separation in AU; inverse of
/// [`period_days_to_separation_au`].
pub fn separation_au_to_period_days(mass_1: f64, mass_2: f64, separation_au: f64) -> f64 {
    let years = (4.0 * PI * PI * separation_au.powi(3) / (G_AU_MSOL_YR * (mass_1 + mass_2))).sqrt();
    years * DAYS_PER_YEAR
}

/// Relative circular orbital velocity in km/s.
pub fn orbital_velocity_kms(total_mass: f64, separation_au: f64) -> f64 {
    ORBITAL_VELOCITY_1AU_1MSOL_KMS * (total_mass / separation_au).sqrt()
}

pub fn rsol_to_au(radius_rsol: f64) -> f64 {
    radius_rsol * RSOL_IN_AU
}

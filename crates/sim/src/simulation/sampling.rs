//! Random initial conditions for binaries.

use rand::Rng;

use super::configs::{EccentricityDistribution, SamplingConfig};
use crate::grid::BinaryRow;

/// Draw from p(x) ∝ x^alpha on [x_min, x_max] by inverse transform.
/// `alpha = -1` is the log-uniform case.
pub fn sample_power_law<R: Rng + ?Sized>(x_min: f64, x_max: f64, alpha: f64, rng: &mut R) -> f64 {
    let u: f64 = rng.random();
    let alpha1 = alpha + 1.0;
    if alpha1.abs() < f64::EPSILON {
        return x_min * (x_max / x_min).powf(u);
    }
    (u * (x_max.powf(alpha1) - x_min.powf(alpha1)) + x_min.powf(alpha1)).powf(1.0 / alpha1)
}

/// Samples binaries from the configured distributions.
#[derive(Debug, Clone)]
pub struct BinarySampler {
    config: SamplingConfig,
    metallicity: f64,
}

impl BinarySampler {
    pub fn new(config: SamplingConfig, metallicity: f64) -> Self {
        Self {
            config,
            metallicity,
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> BinaryRow {
        let c = &self.config;
        let mass_1 = sample_power_law(c.mass_min, c.mass_max, c.imf_slope, rng);
        let q = rng.random_range(c.mass_ratio_min..=1.0);
        let separation = sample_power_law(c.separation_min, c.separation_max, -1.0, rng);
        let eccentricity = match c.eccentricity {
            EccentricityDistribution::Zero => 0.0,
            EccentricityDistribution::Thermal => rng.random::<f64>().sqrt(),
        };

        BinaryRow {
            mass_1,
            mass_2: q * mass_1,
            metallicity_1: self.metallicity,
            metallicity_2: self.metallicity,
            separation,
            eccentricity,
            kick_1: None,
            kick_2: None,
        }
    }
}

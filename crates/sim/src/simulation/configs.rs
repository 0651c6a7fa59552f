//! Run configuration.
//!
//! The whole configuration is one serde value. It can be written to and read
//! back from JSON to reproduce a run, and is passed by reference into every
//! component that needs it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::base::period_days_to_separation_au;
use crate::errors::ConfigError;
use crate::grid::{BinaryRow, GridContext};

/// Solar metallicity (Asplund et al. 2009).
pub const DEFAULT_METALLICITY: f64 = 0.0142;

/// The master configuration struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Evolve single stars or binaries.
    pub mode: RunMode,
    /// Grid file with initial conditions; overrides the sweep/sampling.
    pub grid_file: Option<PathBuf>,
    /// Metallicity used when a grid row or the sweep does not give one.
    pub metallicity: f64,
    /// Fixed base seed. A time-based seed is used when absent.
    pub random_seed: Option<u64>,
    /// Suppress per-object status lines and banners.
    pub quiet: bool,
    pub single_star: SweepConfig,
    pub binary: BinaryConfig,
    pub ais: AisConfig,
    pub output: OutputConfig,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            mode: RunMode::Binary,
            grid_file: None,
            metallicity: DEFAULT_METALLICITY,
            random_seed: None,
            quiet: false,
            single_star: SweepConfig::default(),
            binary: BinaryConfig::default(),
            ais: AisConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Single,
    Binary,
}

/// Uniform single-star mass sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub mass_min: f64,
    pub mass_max: f64,
    pub mass_steps: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            mass_min: 5.0,
            mass_max: 100.0,
            mass_steps: 100,
        }
    }
}

impl SweepConfig {
    pub fn increment(&self) -> f64 {
        (self.mass_max - self.mass_min) / self.mass_steps as f64
    }

    /// Mass of the `index`-th star of the sweep. The upper bound itself is
    /// never reached.
    pub fn mass_at(&self, index: usize) -> f64 {
        self.mass_min + index as f64 * self.increment()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinaryConfig {
    /// Number of binaries to evolve without a grid file.
    pub n_binaries: usize,
    /// Evolve this exact system `n_binaries` times instead of sampling.
    pub individual: Option<IndividualSystem>,
    pub sampling: SamplingConfig,
}

impl Default for BinaryConfig {
    fn default() -> Self {
        Self {
            n_binaries: 10,
            individual: None,
            sampling: SamplingConfig::default(),
        }
    }
}

/// A user-specified binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualSystem {
    pub mass_1: f64,
    pub mass_2: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metallicity_1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metallicity_2: Option<f64>,
    /// Semi-major axis in AU. Takes precedence over the period.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separation: Option<f64>,
    /// Orbital period in days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<f64>,
    #[serde(default)]
    pub eccentricity: f64,
}

impl IndividualSystem {
    /// Initial conditions for this system. A positive separation wins over
    /// the period; otherwise the separation comes from Kepler's third law.
    pub fn to_row(&self, default_metallicity: f64) -> BinaryRow {
        let separation = self.separation.filter(|&a| a > 0.0);
        let period = self.period.filter(|&p| p > 0.0);
        let separation = match (separation, period) {
            (Some(a), Some(_)) => {
                warn!(separation = a, "Both separation and period given, using separation");
                a
            }
            (Some(a), None) => a,
            (None, Some(p)) => period_days_to_separation_au(self.mass_1, self.mass_2, p),
            (None, None) => {
                warn!("Neither separation nor period given for the individual system");
                0.0
            }
        };

        BinaryRow {
            mass_1: self.mass_1,
            mass_2: self.mass_2,
            metallicity_1: self.metallicity_1.unwrap_or(default_metallicity),
            metallicity_2: self.metallicity_2.unwrap_or(default_metallicity),
            separation,
            eccentricity: self.eccentricity,
            kick_1: None,
            kick_2: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EccentricityDistribution {
    /// Circular orbits.
    Zero,
    /// f(e) = 2e.
    Thermal,
}

/// Distributions for randomly sampled binaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub mass_min: f64,
    pub mass_max: f64,
    /// Power-law slope of the primary mass function.
    pub imf_slope: f64,
    /// Lower bound of the flat mass ratio distribution.
    pub mass_ratio_min: f64,
    pub separation_min: f64,
    pub separation_max: f64,
    pub eccentricity: EccentricityDistribution,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            mass_min: 5.0,
            mass_max: 150.0,
            imf_slope: -2.3,
            mass_ratio_min: 0.01,
            separation_min: 0.1,
            separation_max: 1000.0,
            eccentricity: EccentricityDistribution::Zero,
        }
    }
}

/// Adaptive importance sampling switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AisConfig {
    /// Run the exploratory phase and stop once enough target systems formed.
    pub exploratory: bool,
    /// Double compact objects needed to end the exploratory phase.
    pub target_hits: usize,
}

impl Default for AisConfig {
    fn default() -> Self {
        Self {
            exploratory: false,
            target_hits: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory; nothing is written when absent.
    pub directory: Option<PathBuf>,
    /// Write one detailed history file per object.
    pub detailed: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: None,
            detailed: true,
        }
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidParameter(message.into())
}

fn check_range(name: &str, min: f64, max: f64) -> Result<(), ConfigError> {
    if !(min > 0.0 && min < max) {
        return Err(invalid(format!(
            "{name} range must satisfy 0 < min < max, got [{min}, {max}]"
        )));
    }
    Ok(())
}

impl Configuration {
    /// Load a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Write the configuration as pretty JSON.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Values the grid readers need.
    pub fn grid_context(&self) -> GridContext {
        GridContext {
            default_metallicity: self.metallicity,
        }
    }

    /// Reject non-physical parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.metallicity > 0.0 && self.metallicity < 1.0) {
            return Err(invalid(format!(
                "metallicity must be in (0, 1), got {}",
                self.metallicity
            )));
        }

        let sweep = &self.single_star;
        if sweep.mass_steps == 0 {
            return Err(invalid("single_star.mass_steps must be at least 1"));
        }
        if !(sweep.mass_min >= 0.0 && sweep.mass_min <= sweep.mass_max) {
            return Err(invalid(format!(
                "single_star mass range is inverted: [{}, {}]",
                sweep.mass_min, sweep.mass_max
            )));
        }

        let sampling = &self.binary.sampling;
        check_range("binary.sampling mass", sampling.mass_min, sampling.mass_max)?;
        check_range(
            "binary.sampling separation",
            sampling.separation_min,
            sampling.separation_max,
        )?;
        if !(sampling.mass_ratio_min > 0.0 && sampling.mass_ratio_min <= 1.0) {
            return Err(invalid("binary.sampling.mass_ratio_min must be in (0, 1]"));
        }

        if let Some(system) = &self.binary.individual {
            if system.mass_1 <= 0.0 || system.mass_2 <= 0.0 {
                return Err(invalid("individual system masses must be positive"));
            }
            let has_orbit = system.separation.is_some_and(|a| a > 0.0)
                || system.period.is_some_and(|p| p > 0.0);
            if !has_orbit {
                return Err(invalid(
                    "individual system needs a positive separation or period",
                ));
            }
            if !(0.0..1.0).contains(&system.eccentricity) {
                return Err(invalid(format!(
                    "eccentricity must be in [0, 1), got {}",
                    system.eccentricity
                )));
            }
        }

        if self.ais.exploratory && self.ais.target_hits == 0 {
            return Err(invalid("ais.target_hits must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::tempdir;

    #[test]
    fn test_default_is_valid() {
        let config = Configuration::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.metallicity, DEFAULT_METALLICITY);
        assert_eq!(config.binary.n_binaries, 10);
    }

    #[test]
    fn test_sweep_masses() {
        let sweep = SweepConfig {
            mass_min: 1.0,
            mass_max: 3.0,
            mass_steps: 3,
        };
        assert_relative_eq!(sweep.mass_at(0), 1.0);
        assert_relative_eq!(sweep.mass_at(1), 1.0 + 2.0 / 3.0);
        assert_relative_eq!(sweep.mass_at(2), 1.0 + 4.0 / 3.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Configuration =
            serde_json::from_str(r#"{"mode": "single", "single_star": {"mass_steps": 3}}"#)
                .unwrap();
        assert_eq!(config.mode, RunMode::Single);
        assert_eq!(config.single_star.mass_steps, 3);
        assert_eq!(config.single_star.mass_min, 5.0);
        assert!(config.output.detailed);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Configuration::default();
        config.random_seed = Some(42);
        config.binary.individual = Some(IndividualSystem {
            mass_1: 10.0,
            mass_2: 8.0,
            metallicity_1: None,
            metallicity_2: Some(0.02),
            separation: None,
            period: Some(100.0),
            eccentricity: 0.1,
        });
        config.to_file(&path).unwrap();

        assert_eq!(Configuration::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_validation_failures() {
        let mut config = Configuration::default();
        config.metallicity = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidParameter(_))));

        let mut config = Configuration::default();
        config.single_star.mass_steps = 0;
        assert!(config.validate().is_err());

        let mut config = Configuration::default();
        config.binary.sampling.separation_min = 2000.0;
        assert!(config.validate().is_err());

        let mut config = Configuration::default();
        config.binary.individual = Some(IndividualSystem {
            mass_1: 10.0,
            mass_2: 8.0,
            metallicity_1: None,
            metallicity_2: None,
            separation: None,
            period: None,
            eccentricity: 0.0,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_individual_system_orbit() {
        let mut system = IndividualSystem {
            mass_1: 10.0,
            mass_2: 8.0,
            metallicity_1: None,
            metallicity_2: None,
            separation: Some(3.0),
            period: Some(100.0),
            eccentricity: 0.0,
        };
        let row = system.to_row(0.0142);
        assert_eq!(row.separation, 3.0);
        assert_eq!(row.metallicity_1, 0.0142);

        system.separation = None;
        let row = system.to_row(0.0142);
        assert_relative_eq!(
            row.separation,
            period_days_to_separation_au(10.0, 8.0, 100.0),
            max_relative = 1e-12
        );
    }
}

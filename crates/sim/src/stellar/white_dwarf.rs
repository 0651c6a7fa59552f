//! White dwarf accretion kernel.
//!
//! Accretion efficiencies follow Claeys et al. (2014, appendix B) with the
//! hydrogen limits replaced by quadratic fits to Nomoto et al. (2007) and
//! the helium limits and flash efficiencies taken from Piersanti et al.
//! (2014). Rates are log10 of the mass transfer rate in Msol/yr.

use tracing::warn;

use super::accretion::{AccretionRegime, Shell};
use super::types::StellarType;
use crate::base::constants::*;

/// Hydrogen accretion rate limits for a white dwarf mass, log10(Msol/yr).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HydrogenRateLimits {
    /// Above this rate the envelope expands and the excess is blown away.
    pub critical: f64,
    /// Lower edge of steady burning.
    pub stable: f64,
}

impl HydrogenRateLimits {
    pub fn for_mass(mass: f64) -> Self {
        Self {
            critical: MT_LIMIT_CRIT_NOMOTO_0
                + MT_LIMIT_CRIT_NOMOTO_1 * mass
                + MT_LIMIT_CRIT_NOMOTO_2 * mass * mass,
            stable: MT_LIMIT_STABLE_NOMOTO_0
                + MT_LIMIT_STABLE_NOMOTO_1 * mass
                + MT_LIMIT_STABLE_NOMOTO_2 * mass * mass,
        }
    }
}

/// Helium accretion rate limits for a white dwarf mass, log10(Msol/yr).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeliumRateLimits {
    pub critical: f64,
    pub stable: f64,
    /// Below this rate helium accumulates until it detonates.
    pub accumulation: f64,
}

impl HeliumRateLimits {
    pub fn for_mass(mass: f64) -> Self {
        Self {
            critical: MT_LIMIT_CRIT_PIERSANTI_0 + MT_LIMIT_CRIT_PIERSANTI_1 * mass,
            stable: MT_LIMIT_STABLE_PIERSANTI_0 + MT_LIMIT_STABLE_PIERSANTI_1 * mass,
            accumulation: MT_LIMIT_DET_PIERSANTI_0 + MT_LIMIT_DET_PIERSANTI_1 * mass,
        }
    }
}

/// Hydrogen accretion efficiency of a white dwarf of `mass`.
pub fn hydrogen_efficiency(mass: f64, log_rate: f64) -> f64 {
    let limits = HydrogenRateLimits::for_mass(mass);
    let eta = if log_rate >= limits.critical {
        10f64.powf(limits.critical - log_rate)
    } else if log_rate >= limits.stable {
        1.0
    } else {
        0.0
    };
    eta.clamp(0.0, 1.0)
}

/// Helium accretion efficiency of a white dwarf of `mass`.
///
/// Below the accumulation limit the efficiency is 1 so that the shell can
/// grow towards a double detonation.
pub fn helium_efficiency(mass: f64, log_rate: f64) -> f64 {
    let limits = HeliumRateLimits::for_mass(mass);
    let eta = if log_rate >= limits.critical {
        10f64.powf(limits.critical - log_rate)
    } else if log_rate >= limits.stable {
        1.0
    } else if log_rate >= limits.accumulation {
        helium_flash_efficiency(mass, log_rate)
    } else {
        1.0
    };
    eta.clamp(0.0, 1.0)
}

/// Retention during the first strong helium flash (Piersanti et al. 2014,
/// table A3). The fits are cubics in the linear rate, one per model mass.
pub fn helium_flash_efficiency(mass: f64, log_rate: f64) -> f64 {
    let rate = 10f64.powf(log_rate);
    let [c0, c1, c2, c3] = if mass <= 0.6 {
        [6e-3, 5.1e-2, 8.3e-3, -3.317e-4]
    } else if mass <= 0.7 {
        [-3.5e-2, 7.5e-2, -1.8e-3, 3.266e-5]
    } else if mass <= 0.81 {
        [9.3e-2, 1.8e-2, 1.6e-3, -4.111e-5]
    } else if mass <= 0.92 {
        [-7.59e-2, 1.54e-2, 4e-4, -5.905e-6]
    } else {
        [-0.323, 4.1e-2, -7e-4, 4.733e-6]
    };
    c0 + rate * (c1 + rate * (c2 + rate * c3))
}

/// A white dwarf remnant with separate hydrogen and helium shells.
#[derive(Debug, Clone, PartialEq)]
pub struct WhiteDwarf {
    stellar_type: StellarType,
    mass: f64,
    metallicity: f64,
    /// Time since formation in Myr.
    age: f64,
    h_shell: f64,
    he_shell: f64,
    regime: AccretionRegime,
}

impl WhiteDwarf {
    /// A freshly formed white dwarf. `None` unless `stellar_type` is one of
    /// the white dwarf types.
    pub fn new(stellar_type: StellarType, mass: f64, metallicity: f64) -> Option<Self> {
        if !stellar_type.is_white_dwarf() {
            return None;
        }
        Some(Self {
            stellar_type,
            mass,
            metallicity,
            age: 0.0,
            h_shell: 0.0,
            he_shell: 0.0,
            regime: AccretionRegime::Unset,
        })
    }

    pub fn stellar_type(&self) -> StellarType {
        self.stellar_type
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn metallicity(&self) -> f64 {
        self.metallicity
    }

    pub fn age(&self) -> f64 {
        self.age
    }

    pub fn h_shell(&self) -> f64 {
        self.h_shell
    }

    pub fn he_shell(&self) -> f64 {
        self.he_shell
    }

    pub fn regime(&self) -> AccretionRegime {
        self.regime
    }

    pub fn set_regime(&mut self, regime: AccretionRegime) {
        self.regime = regime;
    }

    pub fn advance_age(&mut self, dt_myr: f64) {
        self.age += dt_myr;
    }

    pub fn baryon_number(&self) -> f64 {
        self.stellar_type
            .baryon_number()
            .unwrap_or(CO_WD_BARYON_NUMBER)
    }

    pub fn eta_h(&self, log_rate: f64) -> f64 {
        hydrogen_efficiency(self.mass, log_rate)
    }

    pub fn eta_he(&self, log_rate: f64) -> f64 {
        helium_efficiency(self.mass, log_rate)
    }

    pub fn eta_pty(&self, log_rate: f64) -> f64 {
        helium_flash_efficiency(self.mass, log_rate)
    }

    /// Cooling luminosity in Lsol (Hurley et al. 2000, eq. 90). `time` is
    /// the age in Myr.
    pub fn luminosity_on_phase(mass: f64, time: f64, metallicity: f64, baryon_number: f64) -> f64 {
        635.0 * mass * metallicity.powf(0.4) / (baryon_number * (time + 0.1)).powf(1.4)
    }

    /// Radius in Rsol (Hurley et al. 2000, eq. 91), never smaller than a
    /// neutron star.
    pub fn radius_on_phase(mass: f64) -> f64 {
        let ratio_two_thirds = (MCH / mass).cbrt().powi(2);
        let radius = 0.0115 * (ratio_two_thirds - 1.0 / ratio_two_thirds).sqrt();
        // NaN above MCH falls through to the floor
        NEUTRON_STAR_RADIUS.max(radius)
    }

    pub fn luminosity(&self) -> f64 {
        Self::luminosity_on_phase(self.mass, self.age, self.metallicity, self.baryon_number())
    }

    pub fn radius(&self) -> f64 {
        Self::radius_on_phase(self.mass)
    }

    /// Add `accreted` mass to the shell fed by the current regime and
    /// return that shell. With an unset regime nothing changes.
    pub fn resolve_shell_change(&mut self, accreted: f64) -> Option<Shell> {
        let shell = self.regime.shell();
        match shell {
            Some(Shell::Hydrogen) => self.h_shell += accreted,
            Some(Shell::Helium) => self.he_shell += accreted,
            None => {
                warn!(accreted, "Accretion regime not set for white dwarf, no mass added to shell");
            }
        }
        shell
    }

    /// Grow the white dwarf by `accreted` and book it on the current shell.
    pub fn accrete(&mut self, accreted: f64) -> Option<Shell> {
        self.mass += accreted;
        self.resolve_shell_change(accreted)
    }

    pub fn reached_chandrasekhar_mass(&self) -> bool {
        self.mass >= MCH
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn co_wd(mass: f64) -> WhiteDwarf {
        WhiteDwarf::new(StellarType::CarbonOxygenWhiteDwarf, mass, 0.02).unwrap()
    }

    #[test]
    fn test_only_white_dwarf_types_construct() {
        assert!(WhiteDwarf::new(StellarType::NeutronStar, 1.3, 0.02).is_none());
        assert!(WhiteDwarf::new(StellarType::HeliumWhiteDwarf, 0.3, 0.02).is_some());
    }

    #[test]
    fn test_eta_h_regimes() {
        let wd = co_wd(1.0);
        let limits = HydrogenRateLimits::for_mass(1.0);
        assert_relative_eq!(limits.critical, -6.332_165_91, epsilon = 1e-8);
        assert_relative_eq!(limits.stable, -7.095_683_2, epsilon = 1e-8);

        assert_eq!(wd.eta_h(-6.7), 1.0);
        assert_eq!(wd.eta_h(-8.0), 0.0);
        assert_relative_eq!(wd.eta_h(-6.0), 10f64.powf(limits.critical + 6.0), epsilon = 1e-12);
        // continuous at the critical limit
        assert_relative_eq!(wd.eta_h(limits.critical), 1.0);
    }

    #[test]
    fn test_eta_he_regimes() {
        let wd = co_wd(0.6);
        let limits = HeliumRateLimits::for_mass(0.6);
        assert!(limits.critical > limits.stable && limits.stable > limits.accumulation);

        assert_eq!(wd.eta_he(-4.85), 1.0);
        assert_eq!(wd.eta_he(-7.5), 1.0);
        assert_relative_eq!(wd.eta_he(-5.5), wd.eta_pty(-5.5), epsilon = 1e-15);
        assert_relative_eq!(wd.eta_he(-5.5), 0.006, max_relative = 1e-3);
        assert!(wd.eta_he(-3.0) < 1.0);
    }

    #[test]
    fn test_full_retention_across_stable_band() {
        for mass in [0.5, 0.6, 0.8, 1.0, 1.2, 1.35] {
            let wd = co_wd(mass);
            let hydrogen = HydrogenRateLimits::for_mass(mass);
            let helium = HeliumRateLimits::for_mass(mass);
            for step in 0..50 {
                let fraction = step as f64 / 50.0;
                let log_rate = hydrogen.stable + fraction * (hydrogen.critical - hydrogen.stable);
                assert_eq!(wd.eta_h(log_rate), 1.0, "mass {mass}, log rate {log_rate}");
                let log_rate = helium.stable + fraction * (helium.critical - helium.stable);
                assert_eq!(wd.eta_he(log_rate), 1.0, "mass {mass}, log rate {log_rate}");
            }
        }
    }

    #[test]
    fn test_flash_efficiency_brackets() {
        let rate = 1e-6_f64.log10();
        assert_relative_eq!(helium_flash_efficiency(0.6, rate), 6e-3, max_relative = 1e-4);
        assert_relative_eq!(helium_flash_efficiency(0.65, rate), -3.5e-2, max_relative = 1e-4);
        assert_relative_eq!(helium_flash_efficiency(0.81, rate), 9.3e-2, max_relative = 1e-4);
        assert_relative_eq!(helium_flash_efficiency(0.9, rate), -7.59e-2, max_relative = 1e-4);
        assert_relative_eq!(helium_flash_efficiency(1.2, rate), -0.323, max_relative = 1e-4);
        // negative fits are clamped once they become an efficiency
        assert_eq!(helium_efficiency(1.2, -5.5), 0.0);
    }

    #[test]
    fn test_efficiencies_are_bounded() {
        for mass in [0.3, 0.55, 0.65, 0.75, 0.85, 1.0, 1.3] {
            let mut log_rate = -12.0;
            while log_rate <= -2.0 {
                let eta_h = hydrogen_efficiency(mass, log_rate);
                let eta_he = helium_efficiency(mass, log_rate);
                assert!((0.0..=1.0).contains(&eta_h), "eta_h({mass}, {log_rate}) = {eta_h}");
                assert!((0.0..=1.0).contains(&eta_he), "eta_he({mass}, {log_rate}) = {eta_he}");
                log_rate += 0.05;
            }
        }
    }

    #[test]
    fn test_luminosity_and_radius() {
        let l = WhiteDwarf::luminosity_on_phase(0.6, 1000.0, 0.02, CO_WD_BARYON_NUMBER);
        let expected = 635.0 * 0.6 * 0.02_f64.powf(0.4) / (15.0 * 1000.1_f64).powf(1.4);
        assert_relative_eq!(l, expected, max_relative = 1e-12);
        assert!(WhiteDwarf::luminosity_on_phase(0.6, 2000.0, 0.02, 15.0) < l);

        assert_relative_eq!(WhiteDwarf::radius_on_phase(0.6), 0.012_78, max_relative = 1e-3);
        assert_eq!(WhiteDwarf::radius_on_phase(MCH), NEUTRON_STAR_RADIUS);
        assert_eq!(WhiteDwarf::radius_on_phase(2.0), NEUTRON_STAR_RADIUS);
    }

    #[test]
    fn test_unset_regime_never_changes_shells() {
        let mut wd = co_wd(0.8);
        for _ in 0..5 {
            assert_eq!(wd.resolve_shell_change(0.01), None);
        }
        assert_eq!(wd.h_shell(), 0.0);
        assert_eq!(wd.he_shell(), 0.0);
    }

    #[test]
    fn test_shell_change_follows_regime() {
        let mut wd = co_wd(0.8);
        wd.set_regime(AccretionRegime::HydrogenStableBurning);
        assert_eq!(wd.resolve_shell_change(0.02), Some(Shell::Hydrogen));
        assert_eq!(wd.h_shell(), 0.02);
        assert_eq!(wd.he_shell(), 0.0);

        wd.set_regime(AccretionRegime::HeliumWhiteDwarfHeliumIgnition);
        assert_eq!(wd.accrete(0.05), Some(Shell::Helium));
        assert_eq!(wd.h_shell(), 0.02);
        assert_eq!(wd.he_shell(), 0.05);
        assert_relative_eq!(wd.mass(), 0.85);
    }
}

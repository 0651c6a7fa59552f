//! Physical constants and fit coefficients.
//!
//! Units follow the grid file conventions: masses in Msol, separations in AU,
//! periods in days, velocities in km/s, times in Myr.

/// Gravitational constant in AU^3 Msol^-1 yr^-2.
pub const G_AU_MSOL_YR: f64 = 4.0 * std::f64::consts::PI * std::f64::consts::PI;

pub const DAYS_PER_YEAR: f64 = 365.25;

/// Solar radius in AU.
pub const RSOL_IN_AU: f64 = 0.004_650_47;

/// Earth orbital speed in km/s; the circular velocity at 1 AU around 1 Msol.
pub const ORBITAL_VELOCITY_1AU_1MSOL_KMS: f64 = 29.7847;

/// Chandrasekhar mass in Msol.
pub const MCH: f64 = 1.44;

/// Neutron star radius (10 km) in Rsol; the floor for white dwarf radii.
pub const NEUTRON_STAR_RADIUS: f64 = (1.0 / 7.0) * 1.0e-4;

/// Hubble time in Myr; the maximum evolution time of any object.
pub const HUBBLE_TIME_MYR: f64 = 13_700.0;

// Baryon numbers used by the white dwarf cooling law.
pub const HE_WD_BARYON_NUMBER: f64 = 4.0;
pub const CO_WD_BARYON_NUMBER: f64 = 15.0;
pub const ONE_WD_BARYON_NUMBER: f64 = 17.0;

// Hydrogen accretion limits: quadratic fits in (mass, log10 Mdot) to
// Nomoto et al. (2007) table 5, extended to the low-mass end.
pub const MT_LIMIT_CRIT_NOMOTO_0: f64 = -8.330_171_55;
pub const MT_LIMIT_CRIT_NOMOTO_1: f64 = 2.963_753_94;
pub const MT_LIMIT_CRIT_NOMOTO_2: f64 = -0.965_748_3;
pub const MT_LIMIT_STABLE_NOMOTO_0: f64 = -8.440_608_01;
pub const MT_LIMIT_STABLE_NOMOTO_1: f64 = 2.018_396_35;
pub const MT_LIMIT_STABLE_NOMOTO_2: f64 = -0.673_471_54;

// Helium accretion limits: linear fits in (mass, log10 Mdot) after
// Piersanti et al. (2014) table A1.
pub const MT_LIMIT_CRIT_PIERSANTI_0: f64 = -5.515;
pub const MT_LIMIT_CRIT_PIERSANTI_1: f64 = 1.303;
pub const MT_LIMIT_STABLE_PIERSANTI_0: f64 = -5.675;
pub const MT_LIMIT_STABLE_PIERSANTI_1: f64 = 1.158;
pub const MT_LIMIT_DET_PIERSANTI_0: f64 = -7.15;
pub const MT_LIMIT_DET_PIERSANTI_1: f64 = 0.5;

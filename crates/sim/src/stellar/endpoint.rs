//! Endpoint evolution engine.
//!
//! Jumps every star from the zero-age main sequence straight to its remnant
//! using a main sequence lifetime scaling and initial-final mass relations.
//! Binaries can merge at birth, be disrupted by mass loss or a natal kick,
//! or go through one hydrogen-rich mass transfer episode onto a white dwarf
//! primary, which runs through the white dwarf accretion kernel.

use tracing::debug;

use super::accretion::AccretionRegime;
use super::status::EvolutionStatus;
use super::traits::{EvolutionEngine, EvolvableBinary, EvolvableStar, PhaseRecord};
use super::types::StellarType;
use super::white_dwarf::{HydrogenRateLimits, WhiteDwarf};
use crate::base::constants::HUBBLE_TIME_MYR;
use crate::base::{orbital_velocity_kms, rsol_to_au};
use crate::grid::BinaryRow;

const MIN_MS_LIFETIME_MYR: f64 = 3.0;
const NEUTRON_STAR_MASS: f64 = 1.35;
const MIN_BLACK_HOLE_MASS: f64 = 3.0;
/// Donors below this mass are stripped before helium ignition.
const HELIUM_WHITE_DWARF_DONOR_LIMIT: f64 = 2.0;
/// Mass transfer lasts this fraction of the donor's main sequence lifetime.
const MASS_TRANSFER_DURATION_FRACTION: f64 = 1.0e-3;
const GIANT_RADIUS_RSOL: f64 = 200.0;

/// Main sequence lifetime in Myr.
pub fn main_sequence_lifetime(mass: f64) -> f64 {
    (1.0e4 * mass.powf(-2.5)).max(MIN_MS_LIFETIME_MYR)
}

/// Zero-age main sequence radius in Rsol.
pub fn main_sequence_radius(mass: f64) -> f64 {
    mass.powf(0.8)
}

/// Largest radius reached on the giant branches, in Rsol.
pub fn giant_radius(mass: f64) -> f64 {
    GIANT_RADIUS_RSOL * mass.sqrt()
}

/// Roche lobe radius over separation for mass ratio `q = donor / accretor`
/// (Eggleton 1983).
pub fn roche_lobe_fraction(q: f64) -> f64 {
    let q13 = q.cbrt();
    let q23 = q13 * q13;
    0.49 * q23 / (0.6 * q23 + (1.0 + q13).ln())
}

/// Remnant type and mass left behind by a star of `initial_mass`.
pub fn remnant_of(initial_mass: f64, metallicity: f64) -> (StellarType, f64) {
    match initial_mass {
        m if m < 6.0 => (StellarType::CarbonOxygenWhiteDwarf, 0.08 * m + 0.489),
        m if m < 8.0 => (StellarType::OxygenNeonWhiteDwarf, 0.08 * m + 0.489),
        m if m < 20.0 => (StellarType::NeutronStar, NEUTRON_STAR_MASS),
        m => (
            StellarType::BlackHole,
            (m * (0.5 - 5.0 * metallicity)).max(MIN_BLACK_HOLE_MASS),
        ),
    }
}

/// Core left when a donor's envelope is stripped.
fn stripped_core(mass: f64, metallicity: f64) -> (StellarType, f64) {
    if mass < HELIUM_WHITE_DWARF_DONOR_LIMIT {
        (StellarType::HeliumWhiteDwarf, 0.1 * mass + 0.2)
    } else {
        remnant_of(mass, metallicity)
    }
}

/// Hydrogen accretion regime for a white dwarf accreting at `log_rate`.
pub fn hydrogen_regime(accretor: StellarType, mass: f64, log_rate: f64) -> AccretionRegime {
    let limits = HydrogenRateLimits::for_mass(mass);
    if accretor == StellarType::HeliumWhiteDwarf {
        return if log_rate >= limits.stable {
            AccretionRegime::HeliumWhiteDwarfHydrogenFlashes
        } else {
            AccretionRegime::HeliumWhiteDwarfHydrogenAccumulation
        };
    }
    if log_rate >= limits.critical {
        AccretionRegime::HydrogenOptThickWinds
    } else if log_rate >= limits.stable {
        AccretionRegime::HydrogenStableBurning
    } else {
        AccretionRegime::HydrogenFlashes
    }
}

/// Reference engine producing [`EndpointStar`]s and [`EndpointBinary`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndpointEngine;

impl EvolutionEngine for EndpointEngine {
    type Star = EndpointStar;
    type Binary = EndpointBinary;

    fn new_star(&self, random_seed: u64, mass: f64, metallicity: f64) -> EndpointStar {
        EndpointStar::new(random_seed, mass, metallicity)
    }

    fn new_binary(&self, random_seed: u64, initial: &BinaryRow) -> EndpointBinary {
        EndpointBinary::new(random_seed, *initial)
    }
}

#[derive(Debug, Clone)]
pub struct EndpointStar {
    random_seed: u64,
    initial_mass: f64,
    metallicity: f64,
    initial_type: StellarType,
    stellar_type: StellarType,
    mass: f64,
    history: Vec<PhaseRecord>,
}

impl EndpointStar {
    pub fn new(random_seed: u64, mass: f64, metallicity: f64) -> Self {
        let initial_type = if mass > 0.0 {
            StellarType::main_sequence(mass)
        } else {
            StellarType::MasslessRemnant
        };
        Self {
            random_seed,
            initial_mass: mass,
            metallicity,
            initial_type,
            stellar_type: initial_type,
            mass,
            history: Vec::new(),
        }
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    fn record(&mut self, time: f64, event: &'static str) {
        self.history.push(PhaseRecord {
            time,
            event,
            mass_1: self.mass,
            type_1: self.stellar_type,
            mass_2: None,
            type_2: None,
            separation: None,
        });
    }
}

impl EvolvableStar for EndpointStar {
    fn random_seed(&self) -> u64 {
        self.random_seed
    }

    fn initial_mass(&self) -> f64 {
        self.initial_mass
    }

    fn metallicity(&self) -> f64 {
        self.metallicity
    }

    fn initial_type(&self) -> StellarType {
        self.initial_type
    }

    fn stellar_type(&self) -> StellarType {
        self.stellar_type
    }

    fn evolve(&mut self, index: usize) -> EvolutionStatus {
        self.history.clear();
        self.record(0.0, "ZAMS");
        if self.initial_type == StellarType::MasslessRemnant {
            return EvolutionStatus::MasslessRemnant;
        }

        let lifetime = main_sequence_lifetime(self.mass);
        if lifetime > HUBBLE_TIME_MYR {
            self.record(HUBBLE_TIME_MYR, "Hubble time");
            return EvolutionStatus::TimesUp;
        }

        let (stellar_type, mass) = remnant_of(self.mass, self.metallicity);
        self.stellar_type = stellar_type;
        self.mass = mass;
        self.record(lifetime, "Remnant formed");
        debug!(index, remnant = stellar_type.abbreviation(), mass, "Star evolved");
        EvolutionStatus::Done
    }

    fn history(&self) -> &[PhaseRecord] {
        &self.history
    }
}

#[derive(Debug, Clone)]
pub struct EndpointBinary {
    random_seed: u64,
    initial: BinaryRow,
    initial_types: [StellarType; 2],
    types: [StellarType; 2],
    masses: [f64; 2],
    separation: f64,
    time: f64,
    accretor: Option<WhiteDwarf>,
    history: Vec<PhaseRecord>,
}

impl EndpointBinary {
    pub fn new(random_seed: u64, initial: BinaryRow) -> Self {
        let zams = |mass: f64| {
            if mass > 0.0 {
                StellarType::main_sequence(mass)
            } else {
                StellarType::MasslessRemnant
            }
        };
        let initial_types = [zams(initial.mass_1), zams(initial.mass_2)];
        Self {
            random_seed,
            initial,
            initial_types,
            types: initial_types,
            masses: [initial.mass_1, initial.mass_2],
            separation: initial.separation,
            time: 0.0,
            accretor: None,
            history: Vec::new(),
        }
    }

    pub fn masses(&self) -> [f64; 2] {
        self.masses
    }

    pub fn separation(&self) -> f64 {
        self.separation
    }

    /// The white dwarf that accreted from its companion, if any.
    pub fn accretor(&self) -> Option<&WhiteDwarf> {
        self.accretor.as_ref()
    }

    fn metallicity(&self, star: usize) -> f64 {
        if star == 0 {
            self.initial.metallicity_1
        } else {
            self.initial.metallicity_2
        }
    }

    fn kick_velocity(&self, star: usize) -> f64 {
        let kick = if star == 0 {
            self.initial.kick_1
        } else {
            self.initial.kick_2
        };
        kick.map_or(0.0, |k| k.velocity.abs())
    }

    fn record(&mut self, event: &'static str, bound: bool) {
        self.history.push(PhaseRecord {
            time: self.time,
            event,
            mass_1: self.masses[0],
            type_1: self.types[0],
            mass_2: Some(self.masses[1]),
            type_2: Some(self.types[1]),
            separation: bound.then_some(self.separation),
        });
    }

    /// Turn `star` into its remnant. Returns `false` if the binary is
    /// disrupted.
    fn form_remnant(&mut self, star: usize, stellar_type: StellarType, mass: f64) -> bool {
        let before = self.masses[0] + self.masses[1];
        self.masses[star] = mass;
        self.types[star] = stellar_type;
        let after = self.masses[0] + self.masses[1];

        if !stellar_type.is_compact() {
            // slow wind mass loss widens the orbit
            self.separation *= before / after;
            return true;
        }

        if after <= 0.5 * before {
            return false;
        }
        let kick = self.kick_velocity(star);
        if kick > orbital_velocity_kms(after, self.separation) {
            return false;
        }
        self.separation *= after / (2.0 * after - before);
        true
    }

    fn overflows_roche_lobe(&self, donor: usize) -> bool {
        let accretor = 1 - donor;
        let q = self.masses[donor] / self.masses[accretor];
        let lobe = roche_lobe_fraction(q) * self.separation * (1.0 - self.initial.eccentricity);
        rsol_to_au(giant_radius(self.masses[donor])) > lobe
    }

    /// Stable hydrogen-rich transfer of the donor envelope onto the white
    /// dwarf `accretor`.
    fn transfer_envelope(&mut self, index: usize, donor: usize, duration_myr: f64) {
        let accretor = 1 - donor;
        let (core_type, core_mass) = stripped_core(self.masses[donor], self.metallicity(donor));
        let envelope = (self.masses[donor] - core_mass).max(0.0);

        let Some(mut wd) = WhiteDwarf::new(
            self.types[accretor],
            self.masses[accretor],
            self.metallicity(accretor),
        ) else {
            return;
        };
        wd.advance_age(self.time - self.history.last().map_or(0.0, |r| r.time));

        let log_rate = (envelope / (duration_myr * 1.0e6)).log10();
        wd.set_regime(hydrogen_regime(wd.stellar_type(), wd.mass(), log_rate));
        let accreted = wd.eta_h(log_rate) * envelope;
        wd.accrete(accreted);
        debug!(
            index,
            log_rate,
            regime = %wd.regime(),
            accreted,
            h_shell = wd.h_shell(),
            "Mass transfer onto white dwarf"
        );

        self.masses[accretor] = wd.mass();
        if wd.reached_chandrasekhar_mass() {
            self.masses[accretor] = 0.0;
            self.types[accretor] = StellarType::MasslessRemnant;
        }
        self.masses[donor] = core_mass;
        self.types[donor] = core_type;
        self.time += duration_myr;
        self.accretor = Some(wd);
    }

    fn final_status(&self) -> EvolutionStatus {
        let [a, b] = self.types;
        if a == StellarType::MasslessRemnant || b == StellarType::MasslessRemnant {
            EvolutionStatus::MasslessRemnant
        } else if a.is_compact() && b.is_compact() {
            EvolutionStatus::DoubleCompactObject
        } else if a.is_white_dwarf() && b.is_white_dwarf() {
            EvolutionStatus::WhiteDwarfWhiteDwarf
        } else {
            EvolutionStatus::Done
        }
    }
}

impl EvolvableBinary for EndpointBinary {
    fn random_seed(&self) -> u64 {
        self.random_seed
    }

    fn initial_conditions(&self) -> &BinaryRow {
        &self.initial
    }

    fn initial_types(&self) -> [StellarType; 2] {
        self.initial_types
    }

    fn stellar_types(&self) -> [StellarType; 2] {
        self.types
    }

    fn evolve(&mut self, index: usize) -> EvolutionStatus {
        self.history.clear();
        self.record("ZAMS", true);
        if self.types.contains(&StellarType::MasslessRemnant) {
            return EvolutionStatus::MasslessRemnant;
        }

        let periastron = self.separation * (1.0 - self.initial.eccentricity);
        let contact = rsol_to_au(
            main_sequence_radius(self.masses[0]) + main_sequence_radius(self.masses[1]),
        );
        if periastron < contact {
            self.record("Merger", false);
            return EvolutionStatus::StellarMerger;
        }

        let primary = if self.masses[0] >= self.masses[1] { 0 } else { 1 };
        let secondary = 1 - primary;
        let lifetimes = [
            main_sequence_lifetime(self.masses[0]),
            main_sequence_lifetime(self.masses[1]),
        ];

        if lifetimes[primary] > HUBBLE_TIME_MYR {
            self.time = HUBBLE_TIME_MYR;
            self.record("Hubble time", true);
            return EvolutionStatus::TimesUp;
        }

        self.time = lifetimes[primary];
        let (remnant, mass) = remnant_of(self.masses[primary], self.metallicity(primary));
        if !self.form_remnant(primary, remnant, mass) {
            self.record("Disrupted", false);
            return EvolutionStatus::Unbound;
        }
        self.record("Primary remnant formed", true);

        if lifetimes[secondary] > HUBBLE_TIME_MYR {
            self.time = HUBBLE_TIME_MYR;
            self.record("Hubble time", true);
            return EvolutionStatus::TimesUp;
        }

        self.time = lifetimes[secondary];
        if self.types[primary].is_white_dwarf() && self.overflows_roche_lobe(secondary) {
            let duration = MASS_TRANSFER_DURATION_FRACTION * lifetimes[secondary];
            self.transfer_envelope(index, secondary, duration);
            self.record("Mass transfer", true);
        } else {
            let (remnant, mass) = remnant_of(self.masses[secondary], self.metallicity(secondary));
            if !self.form_remnant(secondary, remnant, mass) {
                self.record("Disrupted", false);
                return EvolutionStatus::Unbound;
            }
            self.record("Secondary remnant formed", true);
        }

        self.final_status()
    }

    fn history(&self) -> &[PhaseRecord] {
        &self.history
    }
}

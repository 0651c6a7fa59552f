//! Contracts between the population loop and an evolution engine.
//!
//! The loop only ever holds one evolvable object at a time. It constructs the
//! object through an [`EvolutionEngine`], calls `evolve` once and reads the
//! outcome back through the accessors below.

use super::status::EvolutionStatus;
use super::types::StellarType;
use crate::grid::BinaryRow;

/// One line of an object's detailed history.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseRecord {
    /// Time since birth in Myr.
    pub time: f64,
    pub event: &'static str,
    pub mass_1: f64,
    pub type_1: StellarType,
    /// Companion mass, `None` for single stars.
    pub mass_2: Option<f64>,
    pub type_2: Option<StellarType>,
    /// Semi-major axis in AU, `None` for single stars or disrupted binaries.
    pub separation: Option<f64>,
}

pub trait EvolvableStar {
    fn random_seed(&self) -> u64;
    fn initial_mass(&self) -> f64;
    fn metallicity(&self) -> f64;
    fn initial_type(&self) -> StellarType;
    fn stellar_type(&self) -> StellarType;

    /// Evolve to the end of the star's life (or the Hubble time).
    fn evolve(&mut self, index: usize) -> EvolutionStatus;

    fn history(&self) -> &[PhaseRecord];
}

pub trait EvolvableBinary {
    fn random_seed(&self) -> u64;
    fn initial_conditions(&self) -> &BinaryRow;
    fn initial_types(&self) -> [StellarType; 2];
    fn stellar_types(&self) -> [StellarType; 2];

    /// Evolve the system until it ends; the returned status describes how.
    fn evolve(&mut self, index: usize) -> EvolutionStatus;

    fn history(&self) -> &[PhaseRecord];
}

/// Factory for evolvable objects.
pub trait EvolutionEngine {
    type Star: EvolvableStar;
    type Binary: EvolvableBinary;

    fn new_star(&self, random_seed: u64, mass: f64, metallicity: f64) -> Self::Star;

    fn new_binary(&self, random_seed: u64, initial: &BinaryRow) -> Self::Binary;
}

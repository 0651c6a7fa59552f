//! Per-object status lines and the channel they are sent to.

use std::fmt;

use crate::grid::BinaryRow;
use crate::stellar::{EvolutionStatus, StellarType};

/// Outcome of one evolved single star.
#[derive(Debug, Clone, PartialEq)]
pub struct StarReport {
    pub index: usize,
    pub random_seed: u64,
    pub initial_mass: f64,
    pub metallicity: f64,
    pub initial_type: StellarType,
    pub stellar_type: StellarType,
    pub status: EvolutionStatus,
    /// Warnings raised while this star was built and evolved.
    pub diagnostics: Vec<String>,
}

/// Outcome of one evolved binary.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryReport {
    pub index: usize,
    pub random_seed: u64,
    pub status: EvolutionStatus,
    pub initial: BinaryRow,
    pub initial_types: [StellarType; 2],
    pub stellar_types: [StellarType; 2],
    pub diagnostics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectReport {
    Star(StarReport),
    Binary(BinaryReport),
}

impl ObjectReport {
    pub fn index(&self) -> usize {
        match self {
            Self::Star(r) => r.index,
            Self::Binary(r) => r.index,
        }
    }

    pub fn random_seed(&self) -> u64 {
        match self {
            Self::Star(r) => r.random_seed,
            Self::Binary(r) => r.random_seed,
        }
    }

    pub fn status(&self) -> EvolutionStatus {
        match self {
            Self::Star(r) => r.status,
            Self::Binary(r) => r.status,
        }
    }

    pub fn diagnostics(&self) -> &[String] {
        match self {
            Self::Star(r) => &r.diagnostics,
            Self::Binary(r) => &r.diagnostics,
        }
    }

    /// Column names of [`ObjectReport::csv_row`].
    pub fn csv_header(&self) -> &'static str {
        match self {
            Self::Star(_) => "index,random_seed,initial_mass,metallicity,initial_type,final_type,status,diagnostics",
            Self::Binary(_) => {
                "index,random_seed,mass_1,mass_2,metallicity_1,metallicity_2,separation,eccentricity,\
                 initial_type_1,initial_type_2,final_type_1,final_type_2,status,diagnostics"
            }
        }
    }

    pub fn csv_row(&self) -> String {
        match self {
            Self::Star(r) => format!(
                "{},{},{},{},{},{},{},{}",
                r.index,
                r.random_seed,
                r.initial_mass,
                r.metallicity,
                r.initial_type.abbreviation(),
                r.stellar_type.abbreviation(),
                r.status.label(),
                r.diagnostics.len()
            ),
            Self::Binary(r) => format!(
                "{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
                r.index,
                r.random_seed,
                r.initial.mass_1,
                r.initial.mass_2,
                r.initial.metallicity_1,
                r.initial.metallicity_2,
                r.initial.separation,
                r.initial.eccentricity,
                r.initial_types[0].abbreviation(),
                r.initial_types[1].abbreviation(),
                r.stellar_types[0].abbreviation(),
                r.stellar_types[1].abbreviation(),
                r.status.label(),
                r.diagnostics.len()
            ),
        }
    }
}

struct TypeChange(StellarType, StellarType);

impl fmt::Display for TypeChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == self.1 {
            write!(f, "{}", self.1)
        } else {
            write!(f, "({} -> {})", self.0, self.1)
        }
    }
}

impl fmt::Display for ObjectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Star(r) => write!(
                f,
                "{}: RandomSeed = {}, Initial Mass = {}, Metallicity = {}, {}",
                r.index, r.random_seed, r.initial_mass, r.metallicity, r.stellar_type
            ),
            Self::Binary(r) => write!(
                f,
                "{}: {}: {} + {}",
                r.index,
                r.status,
                TypeChange(r.initial_types[0], r.stellar_types[0]),
                TypeChange(r.initial_types[1], r.stellar_types[1])
            ),
        }
    }
}

/// Receiver of per-object status lines.
pub trait StatusChannel {
    fn report(&mut self, report: &ObjectReport);
}

/// Discards every report.
impl StatusChannel for () {
    fn report(&mut self, _report: &ObjectReport) {}
}

/// Collects reports in memory.
impl StatusChannel for Vec<ObjectReport> {
    fn report(&mut self, report: &ObjectReport) {
        self.push(report.clone());
    }
}

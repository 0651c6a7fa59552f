//! # Population Synthesis Crate
//!
//! The `popsynth-sim` crate provides the core of a stellar population
//! synthesis run. It reads initial conditions from self-describing grid files
//! (or synthesizes them from a sweep or random sampling), drives one
//! evolvable star or binary per set of initial conditions through an
//! evolution engine, and records the outcome. It also carries the
//! white-dwarf accretion kernel used by the engine during mass transfer.

pub mod base;
pub mod errors;
pub mod grid;
pub mod prelude;
pub mod simulation;
pub mod stellar;
pub mod storage;

pub use simulation::{Configuration, RunSummary, Simulation};
pub use stellar::EvolutionStatus;

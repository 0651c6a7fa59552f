//! Population runs.
//!
//! - `Configuration`: the serde configuration passed into every component.
//! - `Simulation`: the population loop over single stars or binaries.
//! - `RandomService`: per-object seeding.
//! - `ObjectReport` / `StatusChannel`: per-object status lines.

pub mod ais;
pub mod configs;
pub mod engine;
pub mod report;
pub mod sampling;
pub mod seed;

pub use ais::{AdaptiveSampler, ExploratoryPhase, NoAdaptiveSampling};
pub use configs::{
    AisConfig, BinaryConfig, Configuration, DEFAULT_METALLICITY, EccentricityDistribution,
    IndividualSystem, OutputConfig, RunMode, SamplingConfig, SweepConfig,
};
pub use engine::{RunSummary, Simulation};
pub use report::{BinaryReport, ObjectReport, StarReport, StatusChannel};
pub use sampling::BinarySampler;
pub use seed::RandomService;

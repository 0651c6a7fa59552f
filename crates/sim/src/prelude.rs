//! Commonly used imports for convenience.
//!
//! # Example
//!
//! ```
//! use popsynth_sim::prelude::*;
//!
//! let config = Configuration::default();
//! assert_eq!(config.mode, RunMode::Binary);
//! ```

pub use crate::errors::{self, DiagnosticCatalog, GridError, GridWarning};
pub use crate::grid::{BinaryRow, BinaryStarSchema, GridReader, SingleStarRow, SingleStarSchema};
pub use crate::simulation::{
    Configuration, ObjectReport, RandomService, RunMode, RunSummary, Simulation, StatusChannel,
};
pub use crate::stellar::{
    AccretionRegime, EndpointEngine, EvolutionEngine, EvolutionStatus, StellarType, WhiteDwarf,
};
pub use crate::storage::{CsvOutput, NullOutput, OutputSink};

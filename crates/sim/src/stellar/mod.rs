//! Stellar objects: evolution statuses, stellar types, the white dwarf
//! accretion kernel and the contracts an evolution engine implements.

pub mod accretion;
pub mod endpoint;
pub mod status;
pub mod traits;
pub mod types;
pub mod white_dwarf;

pub use accretion::{AccretionRegime, Shell};
pub use endpoint::{EndpointBinary, EndpointEngine, EndpointStar};
pub use status::EvolutionStatus;
pub use traits::{EvolutionEngine, EvolvableBinary, EvolvableStar, PhaseRecord};
pub use types::StellarType;
pub use white_dwarf::{HeliumRateLimits, HydrogenRateLimits, WhiteDwarf};

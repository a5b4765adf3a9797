//! Railway data models, types, and traits.

pub mod traits;
pub mod types;

// Re-exports for convenience
pub use traits::RailNetwork;
pub use types::{
    NextStationRecord, RailwayLine, Result, StationFeature, TopologyError, TopologyKind,
};

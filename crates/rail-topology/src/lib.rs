//! # rail-topology
//!
//! Offline reconstruction of railway line shapes from station adjacency.
//!
//! ## Features
//!
//! - **Station grouping**: Greedy, order-dependent clustering of same-named station features
//! - **Topology classification**: Lines, loops, lollipops and branching networks from degree counts
//! - **Path tracing**: One drawable coordinate sequence per connected component
//! - **Persistence rows**: Paths flattened to `(railway, path_id, ord)` keyed rows
//! - **Parallel tracing**: Railways traced concurrently with the `parallel` feature
//!
//! ## Example
//!
//! ```
//! use rail_topology::prelude::*;
//! use geo::Point;
//!
//! let station = |name: &str, lng: f64| {
//!     StationFeature::new(name, Point::new(lng, 35.0), RailwayCode::new("loop"), CompanyCode::new("c"))
//! };
//! let stations = vec![station("a", 139.0), station("b", 139.1), station("c", 139.05)];
//!
//! // a - b - c - a
//! let records = vec![
//!     NextStationRecord::new(0, vec![2], vec![1]),
//!     NextStationRecord::new(1, vec![0], vec![2]),
//! ];
//!
//! let network = StaticRailNetwork::from_records(&stations, &records).unwrap();
//! let service = RailPathService::new(network);
//!
//! let paths = service.paths_for(&RailwayCode::new("loop")).unwrap();
//! assert_eq!(paths.paths.len(), 1);
//! assert_eq!(paths.paths[0].kind, TopologyKind::Circle);
//! assert_eq!(paths.paths[0].stations, vec![0, 2, 1, 0]);
//! ```

pub mod clustering;
pub mod graph;
pub mod identifiers;
pub mod models;
pub mod provider;
pub mod service;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::clustering::{ClusterConfig, Clustering, StationClusterer, StationGroup};
    pub use crate::graph::{AdjacencyGraph, Component, ComponentPath};
    pub use crate::identifiers::*;
    pub use crate::models::{traits::*, types::*};
    pub use crate::provider::StaticRailNetwork;
    pub use crate::service::{PathRow, RailPath, RailPathService, RailwayPaths};
    pub use crate::spatial::spherical_distance_km;
}

pub use prelude::*;

//! Core data types and enums for railway topology data.

use std::sync::Arc;

use geo::{LineString, Point};
use strum::{AsRefStr, Display, EnumIter};

use crate::graph::AdjacencyGraph;
use crate::identifiers::*;
use crate::spatial::segment_centroid;

// ============================================================================
// Enums
// ============================================================================

/// Classified shape of one connected component of a railway's station graph
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum TopologyKind {
    /// Single station without edges
    None,
    /// Simple open chain
    LinearList,
    /// Simple closed loop
    Circle,
    /// Open chain ending in exactly one loop
    WithLoop,
    /// Everything else (trees with 3+ leaves, several loops, degree 4+ nodes)
    WithBranches,
}

// ============================================================================
// Data Structures
// ============================================================================

/// A raw station record, before clustering
///
/// `location` follows the `geo` convention: x is longitude, y is latitude.
#[derive(Clone, Debug, PartialEq)]
pub struct StationFeature {
    pub name: Arc<str>,
    pub location: Point,
    pub railway: RailwayCode,
    pub company: CompanyCode,
}

impl StationFeature {
    pub fn new(
        name: impl Into<Arc<str>>,
        location: Point,
        railway: RailwayCode,
        company: CompanyCode,
    ) -> Self {
        Self {
            name: name.into(),
            location,
            railway,
            company,
        }
    }

    /// Build a station from the line segments that make up its platform geometry.
    ///
    /// The location is the average of the segment midpoints.
    pub fn from_segments(
        name: impl Into<Arc<str>>,
        segments: &[LineString],
        railway: RailwayCode,
        company: CompanyCode,
    ) -> Result<Self> {
        let name = name.into();
        let location = segment_centroid(segments)
            .ok_or_else(|| TopologyError::EmptyGeometry(name.to_string()))?;

        Ok(Self {
            name,
            location,
            railway,
            company,
        })
    }

    pub fn lat(&self) -> f64 {
        self.location.y()
    }

    pub fn lng(&self) -> f64 {
        self.location.x()
    }
}

/// "Next station" links for one station, as produced by the segment
/// geometry matcher. Indices refer to the global station list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NextStationRecord {
    pub station: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub left: Vec<usize>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub right: Vec<usize>,
}

impl NextStationRecord {
    pub fn new(station: usize, left: Vec<usize>, right: Vec<usize>) -> Self {
        Self {
            station,
            left,
            right,
        }
    }

    /// Union of both directions, left first, without duplicates
    pub fn neighbors(&self) -> Vec<usize> {
        let mut out: Vec<usize> = Vec::with_capacity(self.left.len() + self.right.len());
        for &n in self.left.iter().chain(self.right.iter()) {
            if !out.contains(&n) {
                out.push(n);
            }
        }
        out
    }
}

/// Stations and adjacency of one railway, indexed railway-locally.
///
/// Positions, global station indices and graph slots always agree in length.
#[derive(Clone, Debug, PartialEq)]
pub struct RailwayLine {
    code: RailwayCode,
    /// Global station index for each local index
    stations: Vec<usize>,
    /// Position for each local index
    positions: Vec<Point>,
    graph: AdjacencyGraph,
}

impl RailwayLine {
    /// A line whose local indices are also its global ones
    pub fn new(code: RailwayCode, positions: Vec<Point>, graph: AdjacencyGraph) -> Result<Self> {
        let stations = (0..positions.len()).collect();
        Self::with_stations(code, stations, positions, graph)
    }

    /// A line whose local index `i` stands for global station `stations[i]`
    pub fn with_stations(
        code: RailwayCode,
        stations: Vec<usize>,
        positions: Vec<Point>,
        graph: AdjacencyGraph,
    ) -> Result<Self> {
        let expected = graph.station_count();
        if positions.len() != expected || stations.len() != expected {
            return Err(TopologyError::StationCountMismatch {
                railway: code,
                graph: expected,
                positions: positions.len(),
                stations: stations.len(),
            });
        }
        Ok(Self {
            code,
            stations,
            positions,
            graph,
        })
    }

    pub fn code(&self) -> &RailwayCode {
        &self.code
    }

    pub fn stations(&self) -> &[usize] {
        &self.stations
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    pub fn graph(&self) -> &AdjacencyGraph {
        &self.graph
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("Railway not found: {0}")]
    RailwayNotFound(RailwayCode),

    #[error("Next-station record for unknown station {index} ({station_count} stations)")]
    UnknownStation { index: usize, station_count: usize },

    #[error("Station {station} references station {neighbor}, but only {station_count} stations exist")]
    DanglingStation {
        station: usize,
        neighbor: usize,
        station_count: usize,
    },

    #[error("Station {station} ({railway}) lists station {neighbor} ({neighbor_railway}) as next station")]
    CrossRailwayNeighbor {
        station: usize,
        railway: RailwayCode,
        neighbor: usize,
        neighbor_railway: RailwayCode,
    },

    #[error("Station {0} lists itself as next station")]
    SelfLoop(usize),

    #[error("Railway {railway} has {graph} graph slots but {positions} positions and {stations} station indices")]
    StationCountMismatch {
        railway: RailwayCode,
        graph: usize,
        positions: usize,
        stations: usize,
    },

    #[error("Station {0} has no segment geometry")]
    EmptyGeometry(String),
}

pub type Result<T> = std::result::Result<T, TopologyError>;

//! In-memory rail network built from decoded station and next-station data.
//!
//! Stations are split by railway code. Each railway numbers its stations
//! locally in input order, and next-station links are translated into
//! that numbering.

use std::collections::HashMap;

use geo::Point;

use crate::graph::AdjacencyGraph;
use crate::identifiers::*;
use crate::models::{traits::*, types::*};

/// In-memory rail network with one [`RailwayLine`] per railway code
#[derive(Clone, Debug, Default)]
pub struct StaticRailNetwork {
    lines: Vec<RailwayLine>,
    line_map: HashMap<RailwayCode, usize>,
}

impl StaticRailNetwork {
    /// Create a new empty network
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from already separated lines. A later line with a repeated code replaces the earlier one.
    pub fn from_lines(lines: Vec<RailwayLine>) -> Self {
        let mut network = Self::new();
        for line in lines {
            match network.line_map.get(line.code()) {
                Some(&slot) => network.lines[slot] = line,
                None => {
                    network.line_map.insert(line.code().clone(), network.lines.len());
                    network.lines.push(line);
                }
            }
        }
        network
    }

    /// Build from the station list and next-station records that reference it.
    ///
    /// Railways are ordered by first appearance in `stations`. Each station's
    /// neighbour order is taken from its own record; links it only receives
    /// from other records are appended after those. Links to a missing
    /// station, to a station on another railway, or to the station itself
    /// are rejected.
    pub fn from_records(
        stations: &[StationFeature],
        records: &[NextStationRecord],
    ) -> Result<Self> {
        let mut drafts: Vec<LineDraft> = Vec::new();
        let mut line_map: HashMap<RailwayCode, usize> = HashMap::new();
        // (line slot, local index) for each global station
        let mut local: Vec<(usize, usize)> = Vec::with_capacity(stations.len());

        for (index, station) in stations.iter().enumerate() {
            let slot = *line_map.entry(station.railway.clone()).or_insert_with(|| {
                drafts.push(LineDraft::new(station.railway.clone()));
                drafts.len() - 1
            });

            let draft = &mut drafts[slot];
            local.push((slot, draft.stations.len()));
            draft.stations.push(index);
            draft.positions.push(station.location);
        }

        let station_count = stations.len();
        for record in records {
            let &(slot, from) = local.get(record.station).ok_or(TopologyError::UnknownStation {
                index: record.station,
                station_count,
            })?;

            let mut neighbors = Vec::new();
            for neighbor in record.neighbors() {
                let &(neighbor_slot, to) =
                    local
                        .get(neighbor)
                        .ok_or(TopologyError::DanglingStation {
                            station: record.station,
                            neighbor,
                            station_count,
                        })?;

                if neighbor == record.station {
                    return Err(TopologyError::SelfLoop(record.station));
                }
                if neighbor_slot != slot {
                    return Err(TopologyError::CrossRailwayNeighbor {
                        station: record.station,
                        railway: stations[record.station].railway.clone(),
                        neighbor,
                        neighbor_railway: stations[neighbor].railway.clone(),
                    });
                }
                neighbors.push(to);
            }

            drafts[slot].lists.push((from, neighbors));
        }

        let lines = drafts
            .into_iter()
            .map(LineDraft::build)
            .collect::<Result<Vec<_>>>()?;

        log::debug!(
            "Built {} railway lines from {} stations and {} next-station records",
            lines.len(),
            stations.len(),
            records.len()
        );

        for line in &lines {
            if line.len() > 1 && line.graph().edge_count() == 0 {
                log::warn!(
                    "Railway {} has {} stations but no next-station links",
                    line.code(),
                    line.len()
                );
            }
        }

        Ok(Self { lines, line_map })
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// One railway's stations and validated local links, before the graph is built
struct LineDraft {
    code: RailwayCode,
    stations: Vec<usize>,
    positions: Vec<Point>,
    lists: Vec<(usize, Vec<usize>)>,
}

impl LineDraft {
    fn new(code: RailwayCode) -> Self {
        Self {
            code,
            stations: Vec::new(),
            positions: Vec::new(),
            lists: Vec::new(),
        }
    }

    fn build(self) -> Result<RailwayLine> {
        let graph = AdjacencyGraph::from_lists(self.stations.len(), self.lists)?;
        RailwayLine::with_stations(self.code, self.stations, self.positions, graph)
    }
}

impl RailNetwork for StaticRailNetwork {
    fn railway_codes(&self) -> Vec<RailwayCode> {
        self.lines.iter().map(|l| l.code().clone()).collect()
    }

    fn line(&self, code: &RailwayCode) -> Option<&RailwayLine> {
        self.line_map.get(code).map(|&slot| &self.lines[slot])
    }

    fn lines(&self) -> Vec<&RailwayLine> {
        self.lines.iter().collect()
    }
}

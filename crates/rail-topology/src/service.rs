//! Per-railway path generation.
//!
//! For each railway the station graph is split into connected components,
//! each component is classified, and one path is traced per component.
//! Paths are returned in component order (by smallest station index), which
//! makes a path's position its stable `path_id`.

use geo::{Coord, LineString};

use crate::graph::{generate_path, Component};
use crate::identifiers::RailwayCode;
use crate::models::{traits::RailNetwork, types::*};

/// One drawable path, for one connected component
#[derive(Clone, Debug, PartialEq)]
pub struct RailPath {
    pub path_id: usize,
    pub kind: TopologyKind,
    /// Railway-local station indices in drawing order
    pub stations: Vec<usize>,
    /// Positions of `stations` (x = lng, y = lat)
    pub coordinates: LineString,
}

impl RailPath {
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Coordinates as `(lat, lng)` pairs
    pub fn lat_lngs(&self) -> Vec<(f64, f64)> {
        self.coordinates.0.iter().map(|c| (c.y, c.x)).collect()
    }
}

/// All paths for one railway
#[derive(Clone, Debug, PartialEq)]
pub struct RailwayPaths {
    pub railway: RailwayCode,
    pub paths: Vec<RailPath>,
}

impl RailwayPaths {
    /// Flatten into persistence rows keyed by `(railway, path_id, ord)`.
    ///
    /// Paths of isolated stations are empty and contribute no rows.
    pub fn rows(&self) -> Vec<PathRow> {
        self.paths
            .iter()
            .flat_map(|path| {
                path.coordinates.0.iter().enumerate().map(|(ord, c)| PathRow {
                    railway_code: self.railway.clone(),
                    path_id: path.path_id,
                    ord,
                    lat: c.y,
                    lng: c.x,
                })
            })
            .collect()
    }

    pub fn non_empty(&self) -> impl Iterator<Item = &RailPath> {
        self.paths.iter().filter(|p| !p.is_empty())
    }
}

/// A single stored path coordinate
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PathRow {
    pub railway_code: RailwayCode,
    pub path_id: usize,
    pub ord: usize,
    pub lat: f64,
    pub lng: f64,
}

/// Trace every component of one railway line
pub fn trace_line(line: &RailwayLine) -> RailwayPaths {
    let positions = line.positions();
    let paths: Vec<RailPath> = Component::partition(line.graph())
        .iter()
        .enumerate()
        .map(|(path_id, component)| {
            let traced = generate_path(component);
            let coordinates: LineString = traced
                .stations
                .iter()
                .map(|&s| {
                    let p = positions[s];
                    Coord { x: p.x(), y: p.y() }
                })
                .collect();

            log::trace!(
                "Railway {} component {}: {} stations, {} -> {} path points",
                line.code(),
                path_id,
                component.len(),
                traced.kind,
                traced.stations.len()
            );

            RailPath {
                path_id,
                kind: traced.kind,
                stations: traced.stations,
                coordinates,
            }
        })
        .collect();

    log::debug!(
        "Railway {}: {} stations, {} edges, {} paths",
        line.code(),
        line.len(),
        line.graph().edge_count(),
        paths.len()
    );

    RailwayPaths {
        railway: line.code().clone(),
        paths,
    }
}

/// Path generation over a [`RailNetwork`]
#[derive(Clone, Debug)]
pub struct RailPathService<N> {
    network: N,
}

impl<N: RailNetwork> RailPathService<N> {
    pub fn new(network: N) -> Self {
        Self { network }
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn paths_for(&self, code: &RailwayCode) -> Result<RailwayPaths> {
        self.network
            .line(code)
            .map(trace_line)
            .ok_or_else(|| TopologyError::RailwayNotFound(code.clone()))
    }

    /// Paths for every railway, in network order
    pub fn all_paths(&self) -> Vec<RailwayPaths> {
        self.network.lines().into_iter().map(trace_line).collect()
    }

    /// Like [`Self::all_paths`], with railways traced concurrently
    #[cfg(feature = "parallel")]
    pub fn par_all_paths(&self) -> Vec<RailwayPaths> {
        use rayon::prelude::*;

        self.network.lines().into_par_iter().map(trace_line).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AdjacencyGraph;
    use crate::provider::StaticRailNetwork;
    use geo::Point;

    /// Main line 0-1-2-3, loop 4-5-6, isolated 7
    fn sample_line() -> RailwayLine {
        sample_line_named("JR-X")
    }

    fn sample_line_named(code: &str) -> RailwayLine {
        let positions: Vec<Point> = (0..8).map(|i| Point::new(135.0 + i as f64 * 0.01, 35.0)).collect();
        let graph = AdjacencyGraph::from_lists(
            8,
            vec![
                (0, vec![1]),
                (1, vec![2]),
                (2, vec![3]),
                (4, vec![5]),
                (5, vec![6]),
                (6, vec![4]),
            ],
        )
        .unwrap();
        RailwayLine::new(RailwayCode::new(code), positions, graph).unwrap()
    }

    #[test]
    fn test_heterogeneous_components() {
        let paths = trace_line(&sample_line());

        let kinds: Vec<TopologyKind> = paths.paths.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![TopologyKind::LinearList, TopologyKind::Circle, TopologyKind::None]
        );

        assert_eq!(paths.paths[0].stations, vec![0, 1, 2, 3]);
        assert_eq!(paths.paths[1].stations, vec![4, 5, 6, 4]);
        assert!(paths.paths[2].is_empty());
        assert_eq!(paths.non_empty().count(), 2);
    }

    #[test]
    fn test_coordinates_follow_stations() {
        let paths = trace_line(&sample_line());
        let main = &paths.paths[0];

        assert_eq!(main.coordinates.0.len(), 4);
        assert_eq!(main.lat_lngs()[0], (35.0, 135.0));
        assert_eq!(main.lat_lngs()[3], (35.0, 135.03));
    }

    #[test]
    fn test_rows() {
        let rows = trace_line(&sample_line()).rows();

        // 4 main-line points + 4 loop points, nothing for the isolated station
        assert_eq!(rows.len(), 8);
        assert_eq!((rows[0].path_id, rows[0].ord), (0, 0));
        assert_eq!((rows[4].path_id, rows[4].ord), (1, 0));
        assert_eq!((rows[7].path_id, rows[7].ord), (1, 3));
        assert_eq!(rows[7].lat, rows[4].lat);
        assert_eq!(rows[7].lng, rows[4].lng);
        assert!(rows.iter().all(|r| r.railway_code.as_str() == "JR-X"));
    }

    #[test]
    fn test_short_positions_are_rejected_before_tracing() {
        let graph = AdjacencyGraph::from_lists(2, vec![(0, vec![1])]).unwrap();
        let line = RailwayLine::new(RailwayCode::new("JR-X"), vec![Point::new(135.0, 35.0)], graph);
        assert!(matches!(line, Err(TopologyError::StationCountMismatch { .. })));
    }

    #[test]
    fn test_service_lookup() {
        let service = RailPathService::new(StaticRailNetwork::from_lines(vec![sample_line()]));

        let paths = service.paths_for(&RailwayCode::new("JR-X")).unwrap();
        assert_eq!(paths.paths.len(), 3);

        let missing = service.paths_for(&RailwayCode::new("nope"));
        assert!(matches!(missing, Err(TopologyError::RailwayNotFound(_))));

        assert_eq!(service.all_paths(), vec![paths]);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let lines: Vec<RailwayLine> = (0..16)
            .map(|i| sample_line_named(&format!("line-{i}")))
            .collect();
        let service = RailPathService::new(StaticRailNetwork::from_lines(lines));

        assert_eq!(service.par_all_paths(), service.all_paths());
    }
}

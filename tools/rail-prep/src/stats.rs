use hashbrown::HashMap;
use rail_topology::prelude::{RailwayPaths, TopologyKind};
use strum::IntoEnumIterator;

/// Statistics about one preparation run
#[derive(Default)]
pub struct PrepStats {
    pub station_count: usize,
    pub group_count: usize,
    pub railway_count: usize,
    pub paths_by_kind: HashMap<TopologyKind, usize>,
    pub feature_count: usize,
    pub row_count: usize,
}

impl PrepStats {
    pub fn record_paths(&mut self, railways: &[RailwayPaths]) {
        self.railway_count += railways.len();
        for path in railways.iter().flat_map(|r| r.paths.iter()) {
            *self.paths_by_kind.entry(path.kind).or_default() += 1;
        }
    }

    pub fn path_count(&self) -> usize {
        self.paths_by_kind.values().sum()
    }

    pub fn log_summary(&self) {
        log::info!("=== Preparation Statistics ===");
        log::info!("Station features: {}", self.station_count);
        log::info!("Station groups: {}", self.group_count);
        log::info!("Railways: {}", self.railway_count);
        log::info!("Components: {}", self.path_count());
        for kind in TopologyKind::iter() {
            log::info!(
                "  {}: {}",
                kind,
                self.paths_by_kind.get(&kind).copied().unwrap_or(0)
            );
        }
        log::info!("Path features written: {}", self.feature_count);
        if self.row_count > 0 {
            log::info!("Path rows written: {}", self.row_count);
        }
        if let Some(&branching) = self.paths_by_kind.get(&TopologyKind::WithBranches) {
            if branching > 0 {
                log::warn!(
                    "{} branching components use a budgeted tour and may not cover every branch",
                    branching
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;
    use rail_topology::prelude::*;

    #[test]
    fn test_record_paths() {
        // Line 0-1, isolated 2, star around 3
        let graph = AdjacencyGraph::from_lists(
            7,
            vec![(0, vec![1]), (3, vec![4, 5, 6])],
        )
        .unwrap();
        let line = RailwayLine::new(RailwayCode::new("R"), vec![Point::new(0.0, 0.0); 7], graph)
            .unwrap();
        let paths = RailPathService::new(StaticRailNetwork::from_lines(vec![line])).all_paths();

        let mut stats = PrepStats::default();
        stats.record_paths(&paths);

        assert_eq!(stats.railway_count, 1);
        assert_eq!(stats.path_count(), 3);
        assert_eq!(stats.paths_by_kind.get(&TopologyKind::LinearList), Some(&1));
        assert_eq!(stats.paths_by_kind.get(&TopologyKind::None), Some(&1));
        assert_eq!(stats.paths_by_kind.get(&TopologyKind::WithBranches), Some(&1));
        assert_eq!(stats.paths_by_kind.get(&TopologyKind::Circle), None);
    }
}

//! Undirected station adjacency for a single railway.

use crate::models::types::{Result, TopologyError};

/// Per-station ordered neighbour lists, indexed by railway-local station index.
///
/// Edges are stored on both endpoints. Neighbour order drives traversal
/// tie-breaks: a station's own links come first, in the order it lists them,
/// followed by stations that name it without being named back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdjacencyGraph {
    neighbors: Vec<Vec<usize>>,
}

impl AdjacencyGraph {
    pub fn new(station_count: usize) -> Self {
        Self {
            neighbors: vec![Vec::new(); station_count],
        }
    }

    /// Build from `(station, neighbours)` lists, e.g. decoded next-station records.
    ///
    /// Every station is first seeded with its own list. Reverse links that a
    /// list leaves out are appended afterwards, in list order.
    pub fn from_lists<I, N>(station_count: usize, lists: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, N)>,
        N: IntoIterator<Item = usize>,
    {
        let mut graph = Self::new(station_count);
        let mut links = Vec::new();
        for (station, neighbors) in lists {
            for neighbor in neighbors {
                graph.push_neighbor(station, neighbor)?;
                links.push((station, neighbor));
            }
        }
        for (station, neighbor) in links {
            graph.push_neighbor(neighbor, station)?;
        }
        Ok(graph)
    }

    pub fn station_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Insert the undirected edge `a - b`; an existing edge is left in place
    pub fn add_edge(&mut self, a: usize, b: usize) -> Result<()> {
        self.push_neighbor(a, b)?;
        self.push_neighbor(b, a)
    }

    /// Append `neighbor` to one side only, unless already listed
    fn push_neighbor(&mut self, station: usize, neighbor: usize) -> Result<()> {
        let station_count = self.station_count();
        for (station, neighbor) in [(station, neighbor), (neighbor, station)] {
            if neighbor >= station_count {
                return Err(TopologyError::DanglingStation {
                    station,
                    neighbor,
                    station_count,
                });
            }
        }
        if station == neighbor {
            return Err(TopologyError::SelfLoop(station));
        }

        let list = &mut self.neighbors[station];
        if !list.contains(&neighbor) {
            list.push(neighbor);
        }
        Ok(())
    }

    pub fn neighbors(&self, station: usize) -> &[usize] {
        self.neighbors.get(station).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn degree(&self, station: usize) -> usize {
        self.neighbors(station).len()
    }

    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Iterate each undirected edge once, as `(low, high)`
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.neighbors.iter().enumerate().flat_map(|(a, list)| {
            list.iter().filter(move |&&b| a < b).map(move |&b| (a, b))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_are_symmetric() {
        // Only one side of each link is recorded
        let graph = AdjacencyGraph::from_lists(3, vec![(0, vec![1]), (2, vec![1])]).unwrap();

        assert_eq!(graph.neighbors(0), &[1]);
        assert_eq!(graph.neighbors(1), &[0, 2]);
        assert_eq!(graph.neighbors(2), &[1]);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edges().collect::<Vec<_>>(), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn test_own_list_order_wins() {
        // Leaves name the centre before the centre's own list is seen
        let graph = AdjacencyGraph::from_lists(
            4,
            vec![(0, vec![3]), (1, vec![3]), (2, vec![3]), (3, vec![2, 0, 1])],
        )
        .unwrap();

        assert_eq!(graph.neighbors(3), &[2, 0, 1]);
        assert_eq!(graph.neighbors(0), &[3]);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_reverse_links_follow_own_list() {
        let graph =
            AdjacencyGraph::from_lists(4, vec![(1, vec![2]), (3, vec![1]), (0, vec![1])]).unwrap();

        assert_eq!(graph.neighbors(1), &[2, 3, 0]);
    }

    #[test]
    fn test_duplicate_links_collapse() {
        let graph =
            AdjacencyGraph::from_lists(2, vec![(0, vec![1, 1]), (1, vec![0])]).unwrap();
        assert_eq!(graph.degree(0), 1);
        assert_eq!(graph.degree(1), 1);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_dangling_reference_is_fatal() {
        let err = AdjacencyGraph::from_lists(2, vec![(0, vec![5])]).unwrap_err();
        assert!(matches!(
            err,
            TopologyError::DanglingStation { station: 0, neighbor: 5, station_count: 2 }
        ));

        let err = AdjacencyGraph::from_lists(2, vec![(7, vec![0])]).unwrap_err();
        assert!(matches!(err, TopologyError::DanglingStation { neighbor: 7, .. }));
    }

    #[test]
    fn test_self_loop_is_fatal() {
        let mut graph = AdjacencyGraph::new(2);
        assert!(matches!(graph.add_edge(1, 1), Err(TopologyError::SelfLoop(1))));
    }

    #[test]
    fn test_out_of_range_lookup() {
        let graph = AdjacencyGraph::new(1);
        assert!(graph.neighbors(3).is_empty());
        assert_eq!(graph.degree(0), 0);
    }
}

//! Connected components of a railway's station graph.

use crate::graph::adjacency::AdjacencyGraph;
use crate::graph::classify::{classify, DegreeHistogram};
use crate::graph::union_find::UnionFind;
use crate::models::types::TopologyKind;

/// One station within a [`Component`].
///
/// `neighbors` holds slot positions inside the owning component, in the
/// graph's neighbour order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentNode {
    pub station: usize,
    pub neighbors: Vec<usize>,
    pub degree: usize,
}

/// A maximal connected set of stations, slots ordered by ascending station index
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Component {
    nodes: Vec<ComponentNode>,
}

impl Component {
    /// Induced subgraph of `graph` over `members` (ascending station indices)
    pub fn new(graph: &AdjacencyGraph, members: &[usize]) -> Self {
        let nodes = members
            .iter()
            .map(|&station| {
                let neighbors: Vec<usize> = graph
                    .neighbors(station)
                    .iter()
                    .filter_map(|n| members.binary_search(n).ok())
                    .collect();
                ComponentNode {
                    station,
                    degree: neighbors.len(),
                    neighbors,
                }
            })
            .collect();

        Self { nodes }
    }

    /// Split a graph into its connected components, ordered by smallest station index
    pub fn partition(graph: &AdjacencyGraph) -> Vec<Self> {
        let mut sets = UnionFind::new(graph.station_count());
        for (a, b) in graph.edges() {
            sets.union(a, b);
        }

        sets.components()
            .iter()
            .map(|members| Self::new(graph, members))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[ComponentNode] {
        &self.nodes
    }

    pub fn node(&self, slot: usize) -> &ComponentNode {
        &self.nodes[slot]
    }

    pub fn stations(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes.iter().map(|n| n.station)
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.degree).sum::<usize>() / 2
    }

    pub fn degree_histogram(&self) -> DegreeHistogram {
        DegreeHistogram::from_degrees(self.nodes.iter().map(|n| n.degree))
    }

    pub fn kind(&self) -> TopologyKind {
        classify(&self.degree_histogram())
    }

    /// First slot, scanning in ascending order, whose degree is the component minimum
    pub fn pick_start(&self) -> Option<usize> {
        let min_degree = self.nodes.iter().map(|n| n.degree).min()?;
        self.nodes.iter().position(|n| n.degree == min_degree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(n: usize, edges: &[(usize, usize)]) -> AdjacencyGraph {
        let mut g = AdjacencyGraph::new(n);
        for &(a, b) in edges {
            g.add_edge(a, b).unwrap();
        }
        g
    }

    #[test]
    fn test_partition() {
        // Main line 0-2-4, siding 1-3, isolated 5
        let g = graph(6, &[(0, 2), (2, 4), (3, 1)]);
        let components = Component::partition(&g);

        let stations: Vec<Vec<usize>> = components.iter().map(|c| c.stations().collect()).collect();
        assert_eq!(stations, vec![vec![0, 2, 4], vec![1, 3], vec![5]]);
    }

    #[test]
    fn test_slots_follow_neighbor_order() {
        let g = graph(5, &[(4, 2), (2, 0)]);
        let components = Component::partition(&g);
        let line = &components[0];

        // Slots: 0 -> station 0, 1 -> station 2, 2 -> station 4
        assert_eq!(line.node(1).station, 2);
        assert_eq!(line.node(1).neighbors, vec![2, 0]);
        assert_eq!(line.node(1).degree, 2);
        assert_eq!(line.edge_count(), 2);
    }

    #[test]
    fn test_pick_start_prefers_lowest_slot() {
        let g = graph(4, &[(1, 2), (2, 3), (3, 0)]);
        let component = &Component::partition(&g)[0];

        // Degree-1 stations are 0 and 1; the scan meets station 0 first
        assert_eq!(component.pick_start(), Some(0));
    }

    #[test]
    fn test_pick_start_on_cycle() {
        let g = graph(3, &[(2, 1), (1, 0), (0, 2)]);
        let component = &Component::partition(&g)[0];
        assert_eq!(component.pick_start(), Some(0));
    }

    #[test]
    fn test_empty_component() {
        let component = Component::new(&AdjacencyGraph::new(0), &[]);
        assert!(component.is_empty());
        assert_eq!(component.pick_start(), None);
        assert_eq!(component.kind(), TopologyKind::None);
    }
}

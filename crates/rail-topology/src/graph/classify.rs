//! Shape classification from a component's degree distribution.

use crate::models::types::TopologyKind;

/// Counts of nodes with degree exactly one, two, and three.
///
/// Nodes of degree four or more are only reflected in `nodes`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DegreeHistogram {
    pub nodes: usize,
    pub degree_one: usize,
    pub degree_two: usize,
    pub degree_three: usize,
}

impl DegreeHistogram {
    pub fn from_degrees(degrees: impl IntoIterator<Item = usize>) -> Self {
        degrees.into_iter().fold(Self::default(), |mut h, degree| {
            h.nodes += 1;
            match degree {
                1 => h.degree_one += 1,
                2 => h.degree_two += 1,
                3 => h.degree_three += 1,
                _ => {}
            }
            h
        })
    }
}

/// Classify a connected component. Rules are checked in order; the first match wins.
pub fn classify(h: &DegreeHistogram) -> TopologyKind {
    let n = h.nodes;

    if n <= 1 {
        TopologyKind::None
    } else if h.degree_one == 2 && h.degree_two == n - 2 {
        TopologyKind::LinearList
    } else if h.degree_one == 0 && h.degree_two == n {
        TopologyKind::Circle
    } else if h.degree_one == 1 && h.degree_three == 1 && h.degree_two == n - 2 {
        TopologyKind::WithLoop
    } else {
        TopologyKind::WithBranches
    }
}

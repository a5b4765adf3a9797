//! Disjoint sets over station indices, backed by petgraph's union-find.

use petgraph::unionfind::UnionFind as Sets;

/// Station sets merged edge by edge, listed in a stable order
#[derive(Clone, Debug)]
pub struct UnionFind {
    sets: Sets<usize>,
    len: usize,
}

impl UnionFind {
    pub fn new(size: usize) -> Self {
        Self {
            sets: Sets::new(size),
            len: size,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Representative of the set containing `x`
    pub fn find(&mut self, x: usize) -> usize {
        self.sets.find_mut(x)
    }

    /// Merge the sets containing `a` and `b`. Returns false if already merged.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        self.sets.union(a, b)
    }

    /// All sets, members ascending, sets ordered by their smallest member
    pub fn components(&mut self) -> Vec<Vec<usize>> {
        let mut slot_of_root: Vec<Option<usize>> = vec![None; self.len];
        let mut components: Vec<Vec<usize>> = Vec::new();

        for x in 0..self.len {
            let root = self.sets.find_mut(x);
            let slot = *slot_of_root[root].get_or_insert_with(|| {
                components.push(Vec::new());
                components.len() - 1
            });
            components[slot].push(x);
        }

        components
    }
}

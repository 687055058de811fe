//! Maximum cardinality bipartite matching.
//!
//! The solver works in phases.  Each phase layers the graph breadth-first
//! from every unsaturated left node, recording for each right node the first
//! left node that reached it and for each matched left node the right node
//! that led back to it, and then tries to rewrite one augmenting path ending
//! at every unmatched right node.  Phases repeat until one finds nothing.
use std::collections::HashMap;

use bitvec::vec::BitVec;

use crate::{
    adjacency::{AdjacencyMap, Node},
    tracing_support::{debug, info_span, trace},
};

/// An unweighted bipartite graph with left nodes `0..n` and right nodes
/// `0..m`.
///
/// Edges run from left to right.  Duplicate edges are allowed and add
/// nothing to the matching.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BipartiteMatching {
    num_right: usize,
    edges: Vec<Vec<usize>>,
}

impl BipartiteMatching {
    pub fn new(num_left: usize, num_right: usize) -> Self {
        Self {
            num_right,
            edges: vec![Vec::new(); num_left],
        }
    }

    pub fn num_left(&self) -> usize {
        self.edges.len()
    }

    pub fn num_right(&self) -> usize {
        self.num_right
    }

    /// Gets the total number of edges, counting duplicates.
    pub fn num_edges(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// Gets the right nodes adjacent to `left`, in insertion order.
    pub fn edges_from(&self, left: usize) -> &[usize] {
        &self.edges[left]
    }

    /// Adds the edge `left -> right`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn add_edge(&mut self, left: usize, right: usize) {
        assert!(
            left < self.num_left(),
            "left index {left} out of range 0..{}",
            self.num_left()
        );
        assert!(
            right < self.num_right,
            "right index {right} out of range 0..{}",
            self.num_right
        );
        self.edges[left].push(right);
    }

    /// Computes a maximum cardinality matching.
    ///
    /// Each phase layers the graph from the unmatched left nodes and then
    /// augments along the recorded predecessors.  On dense inputs, where most
    /// right nodes share the same predecessor, a phase may add a single pair,
    /// so the worst case is O(V * E).
    pub fn maximum_matching(&self) -> Matching {
        let _span = info_span!(
            "maximum_matching",
            left = self.num_left(),
            right = self.num_right,
            edges = self.num_edges()
        )
        .entered();
        let mut solver = Solver::new(self);
        let mut phases = 0usize;
        while solver.phase() {
            phases += 1;
        }
        let matching = Matching::from_right(solver.matched, self.num_left());
        debug!(phases, size = matching.len(), "matching finished");
        matching
    }
}

/// Working state of one [`BipartiteMatching::maximum_matching`] call.
struct Solver<'a> {
    edges: &'a [Vec<usize>],
    // For each left node, the right node whose match led to it this phase.
    uprev: Vec<Option<usize>>,
    // For each right node, the first left node that reached it this phase.
    vprev: Vec<Option<usize>>,
    matched: Vec<Option<usize>>,
    unsaturated: BitVec,
    queue: Vec<usize>,
}

impl<'a> Solver<'a> {
    fn new(problem: &'a BipartiteMatching) -> Self {
        let num_left = problem.num_left();
        Self {
            edges: &problem.edges,
            uprev: vec![None; num_left],
            vprev: vec![None; problem.num_right],
            matched: vec![None; problem.num_right],
            unsaturated: BitVec::repeat(true, num_left),
            queue: Vec::with_capacity(num_left),
        }
    }

    /// Runs one layering and augmentation phase, returning whether any
    /// augmenting path was found.
    fn phase(&mut self) -> bool {
        self.uprev.fill(None);
        self.vprev.fill(None);
        self.queue.clear();
        self.queue.extend(self.unsaturated.iter_ones());

        let mut head = 0;
        while let Some(&x) = self.queue.get(head) {
            head += 1;
            for &y in &self.edges[x] {
                if self.vprev[y].is_none() {
                    self.vprev[y] = Some(x);
                }
                if let Some(w) = self.matched[y] {
                    if self.uprev[w].is_none() {
                        self.uprev[w] = Some(y);
                        self.queue.push(w);
                    }
                }
            }
        }

        let mut augmented = 0usize;
        for y in 0..self.matched.len() {
            if self.matched[y].is_none() && self.augment(y) {
                augmented += 1;
            }
        }
        trace!(layered = self.queue.len(), augmented, "phase finished");
        augmented > 0
    }

    /// Follows the `vprev`/`uprev` links from the unmatched right node `y`,
    /// consuming them as it goes, until it reaches an unsaturated left node,
    /// then flips every link on the way.  Fails when it reaches a saturated
    /// left node with no way back, leaving the matching unchanged.
    fn augment(&mut self, y: usize) -> bool {
        let mut chain = Vec::new();
        let mut y = y;
        loop {
            let Some(x) = self.vprev[y].take() else {
                return false;
            };
            let w = self.uprev[x].take();
            chain.push((y, x));
            if self.unsaturated[x] {
                break;
            }
            match w {
                Some(w) => y = w,
                None => return false,
            }
        }
        for (y, x) in chain.into_iter().rev() {
            self.matched[y] = Some(x);
            self.unsaturated.set(x, false);
        }
        true
    }
}

/// A matching between left nodes `0..n` and right nodes `0..m`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matching {
    right_to_left: Vec<Option<usize>>,
    left_to_right: Vec<Option<usize>>,
    len: usize,
}

impl Matching {
    fn from_right(right_to_left: Vec<Option<usize>>, num_left: usize) -> Self {
        let mut left_to_right = vec![None; num_left];
        let mut len = 0;
        for (right, left) in right_to_left.iter().enumerate() {
            if let Some(left) = *left {
                left_to_right[left] = Some(right);
                len += 1;
            }
        }
        Self {
            right_to_left,
            left_to_right,
            len,
        }
    }

    /// Gets the number of matched pairs.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Gets the left node matched to `right`, if any.
    pub fn left_of(&self, right: usize) -> Option<usize> {
        self.right_to_left.get(right).copied().flatten()
    }

    /// Gets the right node matched to `left`, if any.
    pub fn right_of(&self, left: usize) -> Option<usize> {
        self.left_to_right.get(left).copied().flatten()
    }

    /// Gets the matched `(left, right)` pairs in order of right index.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.right_to_left
            .iter()
            .enumerate()
            .filter_map(|(right, left)| left.map(|left| (left, right)))
    }

    /// Gets the matched left node of every right node, indexed by right
    /// node.
    pub fn as_slice(&self) -> &[Option<usize>] {
        &self.right_to_left
    }
}

impl<N, W> AdjacencyMap<N, W>
where
    N: Node,
{
    /// Computes a maximum matching between the keys and the nodes they list
    /// as neighbors, treated as two separate sides even when a value occurs
    /// on both.  Returns the matched right node of each matched key.
    pub fn bipartite_matching(&self) -> HashMap<N, N> {
        let mut right_index = HashMap::new();
        let mut right_nodes = Vec::new();
        for (_, neighbors) in self.iter() {
            for (neighbor, _) in neighbors {
                right_index.entry(neighbor).or_insert_with(|| {
                    right_nodes.push(neighbor);
                    right_nodes.len() - 1
                });
            }
        }

        let left_nodes: Vec<&N> = self.nodes().collect();
        let mut problem = BipartiteMatching::new(left_nodes.len(), right_nodes.len());
        for (left, (_, neighbors)) in self.iter().enumerate() {
            for (neighbor, _) in neighbors {
                problem.add_edge(left, right_index[neighbor]);
            }
        }

        problem
            .maximum_matching()
            .pairs()
            .map(|(left, right)| (left_nodes[left].clone(), right_nodes[right].clone()))
            .collect()
    }
}

#![allow(dead_code)]
//! Arbitrary inputs and brute-force reference solvers shared by the
//! integration tests.
use std::collections::HashMap;

use puzzlegraph::{AdjacencyMap, BipartiteMatching};
use quickcheck::{Arbitrary, Gen};

/// A small directed graph that may contain cycles, self-loops and
/// duplicate edges.  Some nodes only appear as neighbors.
#[derive(Clone, Debug)]
pub struct ArbGraph {
    pub graph: AdjacencyMap<u8>,
}

impl Arbitrary for ArbGraph {
    fn arbitrary(g: &mut Gen) -> Self {
        let num_nodes = 1 + u8::arbitrary(g) % 12;
        let num_edges = usize::arbitrary(g) % 30;
        let mut graph = AdjacencyMap::new();
        for node in 0..num_nodes {
            if bool::arbitrary(g) {
                graph.add_node(node);
            }
        }
        for _ in 0..num_edges {
            let from = u8::arbitrary(g) % num_nodes;
            let to = u8::arbitrary(g) % num_nodes;
            graph.add_edge(from, to);
        }
        Self { graph }
    }
}

/// A small directed acyclic graph: every edge goes from a smaller to a
/// larger node, but edges are added in random order.
#[derive(Clone, Debug)]
pub struct ArbDag {
    pub graph: AdjacencyMap<u8>,
}

impl Arbitrary for ArbDag {
    fn arbitrary(g: &mut Gen) -> Self {
        let num_nodes = 2 + u8::arbitrary(g) % 12;
        let num_edges = usize::arbitrary(g) % 30;
        let mut graph = AdjacencyMap::new();
        for _ in 0..num_edges {
            let a = u8::arbitrary(g) % num_nodes;
            let b = u8::arbitrary(g) % num_nodes;
            if a != b {
                graph.add_edge(a.min(b), a.max(b));
            }
        }
        Self { graph }
    }
}

/// A small weighted directed graph on nodes `0..n`, every node a key.
#[derive(Clone, Debug)]
pub struct ArbWeighted {
    pub graph: AdjacencyMap<u8, u32>,
}

impl Arbitrary for ArbWeighted {
    fn arbitrary(g: &mut Gen) -> Self {
        let num_nodes = 2 + u8::arbitrary(g) % 10;
        let num_edges = usize::arbitrary(g) % 40;
        let mut graph = AdjacencyMap::new();
        for node in 0..num_nodes {
            graph.add_node(node);
        }
        for _ in 0..num_edges {
            let from = u8::arbitrary(g) % num_nodes;
            let to = u8::arbitrary(g) % num_nodes;
            graph.add_weighted_edge(from, to, u32::arbitrary(g) % 10);
        }
        Self { graph }
    }
}

/// A small symmetric weighted graph on nodes `0..n` without self-loops,
/// shaped to contain corridors.
#[derive(Clone, Debug)]
pub struct ArbSymmetric {
    pub graph: AdjacencyMap<u8, u32>,
}

impl Arbitrary for ArbSymmetric {
    fn arbitrary(g: &mut Gen) -> Self {
        let num_nodes = 2 + u8::arbitrary(g) % 14;
        let mut graph = AdjacencyMap::new();
        for node in 0..num_nodes {
            graph.add_node(node);
        }
        // A random chain plus a few chords.
        for node in 1..num_nodes {
            if u8::arbitrary(g) % 4 != 0 {
                graph.add_undirected_edge(node - 1, node, 1 + u32::arbitrary(g) % 9);
            }
        }
        for _ in 0..usize::arbitrary(g) % 4 {
            let a = u8::arbitrary(g) % num_nodes;
            let b = u8::arbitrary(g) % num_nodes;
            if a != b {
                graph.add_undirected_edge(a, b, 1 + u32::arbitrary(g) % 9);
            }
        }
        Self { graph }
    }
}

/// A bipartite instance with at most six nodes per side.
#[derive(Clone, Debug)]
pub struct ArbBipartite {
    pub problem: BipartiteMatching,
}

impl Arbitrary for ArbBipartite {
    fn arbitrary(g: &mut Gen) -> Self {
        let num_left = usize::arbitrary(g) % 7;
        let num_right = usize::arbitrary(g) % 7;
        let density = 1 + u8::arbitrary(g) % 4;
        let mut problem = BipartiteMatching::new(num_left, num_right);
        for left in 0..num_left {
            for right in 0..num_right {
                if u8::arbitrary(g) % 4 < density {
                    problem.add_edge(left, right);
                }
            }
        }
        Self { problem }
    }
}

/// A flow network on nodes `0..n` with source `0` and sink `n - 1`.
#[derive(Clone, Debug)]
pub struct ArbNetwork {
    pub graph: AdjacencyMap<u8, u32>,
    pub sink: u8,
}

impl Arbitrary for ArbNetwork {
    fn arbitrary(g: &mut Gen) -> Self {
        let num_nodes = 2 + u8::arbitrary(g) % 6;
        let num_edges = usize::arbitrary(g) % 25;
        let mut graph = AdjacencyMap::new();
        for _ in 0..num_edges {
            let from = u8::arbitrary(g) % num_nodes;
            let to = u8::arbitrary(g) % num_nodes;
            graph.add_weighted_edge(from, to, u32::arbitrary(g) % 10);
        }
        Self {
            graph,
            sink: num_nodes - 1,
        }
    }
}

/// Hop counts from the nearest start, by repeated relaxation.
pub fn reference_hops(graph: &AdjacencyMap<u8>, starts: &[u8]) -> HashMap<u8, usize> {
    let mut distances: HashMap<u8, usize> = starts.iter().map(|&start| (start, 0)).collect();
    loop {
        let mut changed = false;
        for (node, neighbors) in graph.iter() {
            let Some(&distance) = distances.get(node) else {
                continue;
            };
            for &(neighbor, ()) in neighbors {
                let entry = distances.entry(neighbor).or_insert(usize::MAX);
                if distance + 1 < *entry {
                    *entry = distance + 1;
                    changed = true;
                }
            }
        }
        if !changed {
            return distances;
        }
    }
}

/// The largest matching, by trying every assignment.
pub fn brute_force_matching(problem: &BipartiteMatching) -> usize {
    fn go(problem: &BipartiteMatching, left: usize, used: u64) -> usize {
        if left == problem.num_left() {
            return 0;
        }
        let mut best = go(problem, left + 1, used);
        for &right in problem.edges_from(left) {
            if used & (1 << right) == 0 {
                best = best.max(1 + go(problem, left + 1, used | (1 << right)));
            }
        }
        best
    }
    go(problem, 0, 0)
}

/// The capacity of the smallest cut separating `source` from `sink`, by
/// enumerating every source side.  Nodes must be below 16.
pub fn brute_force_min_cut(graph: &AdjacencyMap<u8, u32>, source: u8, sink: u8) -> u32 {
    let nodes = graph.all_nodes();
    if source == sink || !nodes.contains(&source) {
        return 0;
    }
    let others: Vec<u8> = nodes.into_iter().filter(|&n| n != source && n != sink).collect();
    (0u32..1 << others.len())
        .map(|mask| {
            let in_source_side = |node: u8| {
                node == source
                    || others
                        .iter()
                        .position(|&other| other == node)
                        .is_some_and(|i| mask & (1 << i) != 0)
            };
            graph
                .iter()
                .filter(|&(&from, _)| in_source_side(from))
                .flat_map(|(_, neighbors)| neighbors.iter())
                .filter(|&&(to, _)| !in_source_side(to))
                .map(|&(_, capacity)| capacity)
                .sum::<u32>()
        })
        .min()
        .unwrap_or(0)
}

//! Maximum flow by repeated depth-first augmenting paths (Ford-Fulkerson).
//!
//! Nodes are re-indexed into a dense arena.  Each unordered node pair that
//! has at least one input edge gets two paired arcs, one per direction, and
//! the capacities of repeated input entries accumulate on them.  The residual
//! capacity of an arc is its unused capacity plus the flow currently running
//! the other way, and augmenting along an arc first cancels that opposing
//! flow, so at most one arc of a pair ever carries flow.
use std::{collections::HashMap, ops::Sub};

use bitvec::vec::BitVec;
use pathfinding::num_traits::Zero;

use crate::{
    adjacency::{AdjacencyMap, Node},
    tracing_support::{debug, info_span, trace},
};

#[derive(Clone, Debug)]
struct Arc<C> {
    from: usize,
    to: usize,
    capacity: C,
    flow: C,
}

/// A directed graph with nonnegative edge capacities.
#[derive(Clone, Debug)]
pub struct FlowNetwork<N, C> {
    nodes: Vec<N>,
    index: HashMap<N, usize>,
    // Arcs `2k` and `2k + 1` are the two directions of one node pair.
    arcs: Vec<Arc<C>>,
    pairs: HashMap<(usize, usize), usize>,
    out: Vec<Vec<usize>>,
    max_capacity: C,
}

struct Frame<C> {
    node: usize,
    next: usize,
    bottleneck: C,
    via: Option<usize>,
}

impl<N, C> FlowNetwork<N, C>
where
    N: Node,
    C: Zero + Ord + Copy + Sub<Output = C>,
{
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            arcs: Vec::new(),
            pairs: HashMap::new(),
            out: Vec::new(),
            max_capacity: C::zero(),
        }
    }

    /// Builds a network from `(neighbor, capacity)` lists.
    pub fn from_adjacency(graph: &AdjacencyMap<N, C>) -> Self {
        let mut network = Self::new();
        for (node, neighbors) in graph.iter() {
            network.intern(node.clone());
            for (neighbor, capacity) in neighbors {
                network.add_edge(node.clone(), neighbor.clone(), *capacity);
            }
        }
        network
    }

    /// Gets the number of distinct nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn intern(&mut self, node: N) -> usize {
        if let Some(&id) = self.index.get(&node) {
            return id;
        }
        let id = self.nodes.len();
        self.index.insert(node.clone(), id);
        self.nodes.push(node);
        self.out.push(Vec::new());
        id
    }

    fn arc_between(&self, from: usize, to: usize) -> Option<usize> {
        let first = *self.pairs.get(&(from.min(to), from.max(to)))?;
        Some(if from < to { first } else { first ^ 1 })
    }

    /// Adds `capacity` to the edge `from -> to`.  Self-loops never carry
    /// flow and are ignored apart from registering the node.
    pub fn add_edge(&mut self, from: N, to: N, capacity: C) {
        let u = self.intern(from);
        let v = self.intern(to);
        if u == v {
            return;
        }
        let arc = match self.arc_between(u, v) {
            Some(arc) => arc,
            None => {
                let (low, high) = (u.min(v), u.max(v));
                let first = self.arcs.len();
                for (from, to) in [(low, high), (high, low)] {
                    self.arcs.push(Arc {
                        from,
                        to,
                        capacity: C::zero(),
                        flow: C::zero(),
                    });
                }
                self.out[low].push(first);
                self.out[high].push(first + 1);
                self.pairs.insert((low, high), first);
                if u < v { first } else { first + 1 }
            }
        };
        let capacity = self.arcs[arc].capacity + capacity;
        self.arcs[arc].capacity = capacity;
        self.max_capacity = self.max_capacity.max(capacity);
    }

    fn residual(&self, arc: usize) -> C {
        let arc_ref = &self.arcs[arc];
        arc_ref.capacity - arc_ref.flow + self.arcs[arc ^ 1].flow
    }

    fn push(&mut self, arc: usize, amount: C) {
        let cancelled = amount.min(self.arcs[arc ^ 1].flow);
        self.arcs[arc ^ 1].flow = self.arcs[arc ^ 1].flow - cancelled;
        self.arcs[arc].flow = self.arcs[arc].flow + (amount - cancelled);
    }

    /// Finds one augmenting path and pushes its bottleneck along it,
    /// returning the amount pushed (zero when no path exists).
    fn augment(&mut self, source: usize, sink: usize, visited: &mut BitVec) -> C {
        visited.fill(false);
        visited.set(source, true);
        let mut stack = vec![Frame {
            node: source,
            next: 0,
            bottleneck: self.max_capacity,
            via: None,
        }];
        while let Some(frame) = stack.last_mut() {
            let Some(&arc) = self.out[frame.node].get(frame.next) else {
                stack.pop();
                continue;
            };
            frame.next += 1;
            let to = self.arcs[arc].to;
            let bottleneck = frame.bottleneck.min(self.residual(arc));
            if bottleneck == C::zero() || visited[to] {
                continue;
            }
            if to == sink {
                let path: Vec<usize> = stack.iter().filter_map(|frame| frame.via).collect();
                for step in path.into_iter().chain([arc]) {
                    self.push(step, bottleneck);
                }
                return bottleneck;
            }
            visited.set(to, true);
            stack.push(Frame {
                node: to,
                next: 0,
                bottleneck,
                via: Some(arc),
            });
        }
        C::zero()
    }

    /// Computes the maximum flow from `source` to `sink`, discarding any
    /// flow from an earlier call.
    ///
    /// The flow is zero when `source == sink` or either end is not part of
    /// the network.
    pub fn solve(&mut self, source: &N, sink: &N) -> C {
        let _span = info_span!("max_flow", nodes = self.nodes.len(), arcs = self.arcs.len()).entered();
        for arc in &mut self.arcs {
            arc.flow = C::zero();
        }
        let (Some(&source), Some(&sink)) = (self.index.get(source), self.index.get(sink)) else {
            return C::zero();
        };
        if source == sink {
            return C::zero();
        }

        let mut visited = BitVec::repeat(false, self.nodes.len());
        let mut total = C::zero();
        let mut rounds = 0usize;
        loop {
            let added = self.augment(source, sink, &mut visited);
            if added == C::zero() {
                break;
            }
            total = total + added;
            rounds += 1;
            trace!(rounds, "augmented");
        }
        debug!(rounds, "max flow found");
        total
    }

    /// Gets the capacity of the edge `from -> to`, zero when there is none.
    pub fn capacity(&self, from: &N, to: &N) -> C {
        self.find_arc(from, to)
            .map_or(C::zero(), |arc| self.arcs[arc].capacity)
    }

    /// Gets the flow on the edge `from -> to` after [`Self::solve`].
    pub fn flow_on(&self, from: &N, to: &N) -> C {
        self.find_arc(from, to).map_or(C::zero(), |arc| self.arcs[arc].flow)
    }

    fn find_arc(&self, from: &N, to: &N) -> Option<usize> {
        self.arc_between(*self.index.get(from)?, *self.index.get(to)?)
    }

    /// Gets every edge carrying flow as `(from, to, flow)`.
    pub fn edge_flows(&self) -> impl Iterator<Item = (&N, &N, C)> {
        self.arcs
            .iter()
            .filter(|arc| arc.flow > C::zero())
            .map(|arc| (&self.nodes[arc.from], &self.nodes[arc.to], arc.flow))
    }
}

impl<N, C> Default for FlowNetwork<N, C>
where
    N: Node,
    C: Zero + Ord + Copy + Sub<Output = C>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N, C> AdjacencyMap<N, C>
where
    N: Node,
    C: Zero + Ord + Copy + Sub<Output = C>,
{
    /// Computes the maximum flow from `source` to `sink`, treating edge
    /// weights as capacities.
    pub fn max_flow(&self, source: &N, sink: &N) -> C {
        FlowNetwork::from_adjacency(self).solve(source, sink)
    }
}

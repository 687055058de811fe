//! The adjacency representation shared by every algorithm in this crate.
//!
//! An [`AdjacencyMap`] maps each node to an ordered list of `(neighbor,
//! weight)` pairs.  Unweighted graphs use `W = ()`.  Keys are kept in
//! insertion order, which makes component numbering and tie-breaking
//! deterministic for identical input.  A node that only ever appears as a
//! neighbor is not a key and is treated as having no outgoing edges.
use std::{
    collections::{HashMap, HashSet},
    fmt::Debug,
    hash::Hash,
};

use derivative::Derivative;

/// A trait representing a node identifier.
///
/// Blanket-implemented for every `Eq + Hash + Clone` type, so integers,
/// strings, coordinates and tuples can all be used directly.
pub trait Node: Eq + Hash + Clone {}

impl<T> Node for T where T: Eq + Hash + Clone {}

/// Insertion-ordered mapping from nodes to neighbor lists.
///
/// Removed keys leave a vacant slot behind so that the relative order of the
/// remaining keys never changes; vacant slots are reclaimed once they
/// outnumber the live ones.
#[derive(Derivative)]
#[derivative(
    Clone(bound = "N: Clone, W: Clone"),
    Debug(bound = "N: Debug, W: Debug"),
    Default(bound = "")
)]
pub struct AdjacencyMap<N, W = ()> {
    index: HashMap<N, usize>,
    slots: Vec<Option<(N, Vec<(N, W)>)>>,
}

impl<N, W> AdjacencyMap<N, W> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            slots: Vec::new(),
        }
    }

    /// Gets the number of keys.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Gets the total number of neighbor entries, counting duplicates.
    pub fn num_edges(&self) -> usize {
        self.iter().map(|(_, neighbors)| neighbors.len()).sum()
    }

    /// Gets an iterator over the keys in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.iter().map(|(node, _)| node)
    }

    /// Gets an iterator over the keys and their neighbor lists in insertion
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (&N, &[(N, W)])> {
        self.slots
            .iter()
            .flatten()
            .map(|(node, neighbors)| (node, neighbors.as_slice()))
    }
}

impl<N, W> AdjacencyMap<N, W>
where
    N: Node,
{
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
        }
    }

    pub fn contains_node(&self, node: &N) -> bool {
        self.index.contains_key(node)
    }

    /// Adds `node` as a key with no neighbors.  Returns false if it was
    /// already present, in which case its neighbor list is left untouched.
    pub fn add_node(&mut self, node: N) -> bool {
        if self.index.contains_key(&node) {
            return false;
        }
        self.index.insert(node.clone(), self.slots.len());
        self.slots.push(Some((node, Vec::new())));
        true
    }

    fn list_mut(&mut self, node: N) -> &mut Vec<(N, W)> {
        let slot = match self.index.get(&node) {
            Some(&slot) => slot,
            None => {
                let slot = self.slots.len();
                self.index.insert(node.clone(), slot);
                self.slots.push(Some((node, Vec::new())));
                slot
            }
        };
        match &mut self.slots[slot] {
            Some((_, neighbors)) => neighbors,
            None => unreachable!("index points at a vacant slot"),
        }
    }

    /// Appends `(to, weight)` to the neighbor list of `from`, adding `from`
    /// as a key if needed.  `to` is not added as a key.
    pub fn add_weighted_edge(&mut self, from: N, to: N, weight: W) {
        self.list_mut(from).push((to, weight));
    }

    /// Adds the edge in both directions, making both ends keys.
    pub fn add_undirected_edge(&mut self, a: N, b: N, weight: W)
    where
        W: Clone,
    {
        self.list_mut(a.clone()).push((b.clone(), weight.clone()));
        self.list_mut(b).push((a, weight));
    }

    /// Gets the neighbor list of `node`, which is empty when `node` is not a
    /// key.
    pub fn neighbors(&self, node: &N) -> &[(N, W)] {
        self.index
            .get(node)
            .and_then(|&slot| self.slots[slot].as_ref())
            .map_or(&[][..], |(_, neighbors)| neighbors.as_slice())
    }

    /// Gets an iterator over the neighbor nodes of `node`, without weights.
    pub fn neighbor_nodes(&self, node: &N) -> impl Iterator<Item = &N> {
        self.neighbors(node).iter().map(|(neighbor, _)| neighbor)
    }

    pub fn neighbors_mut(&mut self, node: &N) -> Option<&mut Vec<(N, W)>> {
        let slot = *self.index.get(node)?;
        self.slots[slot].as_mut().map(|(_, neighbors)| neighbors)
    }

    /// Removes a key, returning its neighbor list.  Edges from other nodes
    /// into `node` are left in place.
    pub fn remove_node(&mut self, node: &N) -> Option<Vec<(N, W)>> {
        let slot = self.index.remove(node)?;
        let (_, neighbors) = self.slots[slot].take()?;
        if self.slots.len() > 2 * self.index.len() + 8 {
            self.reclaim_vacant_slots();
        }
        Some(neighbors)
    }

    fn reclaim_vacant_slots(&mut self) {
        self.slots.retain(Option::is_some);
        for (slot, entry) in self.slots.iter().enumerate() {
            if let Some((node, _)) = entry {
                self.index.insert(node.clone(), slot);
            }
        }
    }

    /// Gets every node mentioned by the map, keys and neighbor-only nodes
    /// alike, in order of first appearance.
    pub fn all_nodes(&self) -> Vec<N> {
        let mut seen = HashSet::with_capacity(self.len());
        let mut nodes = Vec::with_capacity(self.len());
        for (node, neighbors) in self.iter() {
            for candidate in std::iter::once(node).chain(neighbors.iter().map(|(n, _)| n)) {
                if seen.insert(candidate) {
                    nodes.push(candidate.clone());
                }
            }
        }
        nodes
    }

    /// Creates the edge-reversed graph.  Every node of this map becomes a key,
    /// in [`Self::all_nodes`] order.
    pub fn reversed(&self) -> Self
    where
        W: Clone,
    {
        let mut reversed = Self::with_capacity(self.len());
        for node in self.all_nodes() {
            reversed.add_node(node);
        }
        for (node, neighbors) in self.iter() {
            for (neighbor, weight) in neighbors {
                reversed.add_weighted_edge(neighbor.clone(), node.clone(), weight.clone());
            }
        }
        reversed
    }

    /// Creates a copy in which every edge also appears reversed, so the
    /// graph can be treated as undirected.
    pub fn symmetric(&self) -> Self
    where
        W: Clone,
    {
        let mut symmetric = self.clone();
        for (node, neighbors) in self.iter() {
            for (neighbor, weight) in neighbors {
                symmetric.add_weighted_edge(neighbor.clone(), node.clone(), weight.clone());
            }
        }
        symmetric
    }

    /// Creates an unweighted copy with the same keys and neighbor order.
    pub fn without_weights(&self) -> AdjacencyMap<N, ()> {
        self.iter()
            .map(|(node, neighbors)| {
                (
                    node.clone(),
                    neighbors.iter().map(|(n, _)| (n.clone(), ())).collect::<Vec<_>>(),
                )
            })
            .collect()
    }
}

impl<N> AdjacencyMap<N, ()>
where
    N: Node,
{
    /// Builds an unweighted map from `(node, neighbors)` lists.  Repeated keys
    /// extend the earlier list.
    pub fn from_lists<I, L>(lists: I) -> Self
    where
        I: IntoIterator<Item = (N, L)>,
        L: IntoIterator<Item = N>,
    {
        let mut map = Self::new();
        for (node, neighbors) in lists {
            map.list_mut(node)
                .extend(neighbors.into_iter().map(|neighbor| (neighbor, ())));
        }
        map
    }

    /// Appends `to` to the neighbor list of `from`.
    pub fn add_edge(&mut self, from: N, to: N) {
        self.add_weighted_edge(from, to, ());
    }
}

impl<N, W, L> FromIterator<(N, L)> for AdjacencyMap<N, W>
where
    N: Node,
    L: IntoIterator<Item = (N, W)>,
{
    fn from_iter<T: IntoIterator<Item = (N, L)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (node, neighbors) in iter {
            map.list_mut(node).extend(neighbors);
        }
        map
    }
}

impl<N, W> PartialEq for AdjacencyMap<N, W>
where
    N: PartialEq,
    W: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<N, W> Eq for AdjacencyMap<N, W>
where
    N: Eq,
    W: Eq,
{
}

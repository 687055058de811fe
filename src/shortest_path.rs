//! Dijkstra's algorithm over an [`AdjacencyMap`], and a lazy variant over
//! implicit state spaces that doubles as A*.
//!
//! Weights must be nonnegative.  This is a precondition and is not checked;
//! negative weights give meaningless results.
use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap, hash_map::Entry},
    hash::Hash,
    marker::PhantomData,
    ops::ControlFlow,
};

use pathfinding::num_traits::Zero;

use crate::{
    adjacency::{AdjacencyMap, Node},
    tracing_support::{debug, info_span},
};

/// A priority queue entry, ordered so that [`BinaryHeap`] pops the smallest
/// priority first, breaking ties by the smallest accumulated cost.
struct QueueEntry<S, W> {
    priority: W,
    cost: W,
    state: S,
}

impl<S, W: Ord> PartialEq for QueueEntry<S, W> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S, W: Ord> Eq for QueueEntry<S, W> {}

impl<S, W: Ord> PartialOrd for QueueEntry<S, W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S, W: Ord> Ord for QueueEntry<S, W> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.cost.cmp(&self.cost))
    }
}

/// Shortest-path search over a state space whose edges are produced on
/// demand by a successor function.
///
/// Created with [`LazySearch::new`] and configured with
/// [`LazySearch::key_by`] and [`LazySearch::heuristic`] before running one
/// of the terminal operations.  By default states are their own keys and
/// the heuristic is zero, which makes this plain Dijkstra.
///
/// A state is settled (reported, and its successors expanded) only when it
/// is popped with a cost equal to the best cost recorded for its key; stale
/// queue entries are skipped.  With a heuristic the queue is ordered by cost
/// plus estimate.  The heuristic must be admissible, i.e. never overestimate
/// the remaining cost, for early-terminating searches to return optimal
/// costs.
pub struct LazySearch<S, W, FN, FK, FH> {
    start: S,
    neighbors: FN,
    key: FK,
    heuristic: FH,
    weight: PhantomData<W>,
}

impl<S, W, FN> LazySearch<S, W, FN, fn(&S) -> S, fn(&S) -> W>
where
    S: Clone,
    W: Zero,
{
    /// Creates a search starting at `start`, where `neighbors(state)`
    /// returns the `(successor, step cost)` pairs of a state.
    pub fn new(start: S, neighbors: FN) -> Self {
        Self {
            start,
            neighbors,
            key: S::clone,
            heuristic: |_| W::zero(),
            weight: PhantomData,
        }
    }
}

impl<S, W, FN, FK, FH> LazySearch<S, W, FN, FK, FH> {
    /// Identifies states by `key(state)` rather than by the state itself.
    /// Useful when states carry data that should not affect identity, or are
    /// not hashable at all.
    pub fn key_by<K, FK2>(self, key: FK2) -> LazySearch<S, W, FN, FK2, FH>
    where
        FK2: FnMut(&S) -> K,
    {
        LazySearch {
            start: self.start,
            neighbors: self.neighbors,
            key,
            heuristic: self.heuristic,
            weight: PhantomData,
        }
    }

    /// Turns the search into A* using `heuristic(state)` as the estimate of
    /// the remaining cost.
    pub fn heuristic<FH2>(self, heuristic: FH2) -> LazySearch<S, W, FN, FK, FH2>
    where
        FH2: FnMut(&S) -> W,
    {
        LazySearch {
            start: self.start,
            neighbors: self.neighbors,
            key: self.key,
            heuristic,
            weight: PhantomData,
        }
    }
}

impl<S, W, K, IN, FN, FK, FH> LazySearch<S, W, FN, FK, FH>
where
    W: Zero + Ord + Copy,
    K: Eq + Hash,
    FN: FnMut(&S) -> IN,
    IN: IntoIterator<Item = (S, W)>,
    FK: FnMut(&S) -> K,
    FH: FnMut(&S) -> W,
{
    /// Explores every reachable state, returning the best cost per key.
    pub fn run(self) -> HashMap<K, W> {
        self.run_with(|_, _| {})
    }

    /// Like [`Self::run`], calling `visit(state, cost)` as each state is
    /// settled.
    pub fn run_with(self, mut visit: impl FnMut(&S, W)) -> HashMap<K, W> {
        self.drive(|state, cost| {
            visit(state, cost);
            ControlFlow::Continue(())
        })
        .0
    }

    /// Searches until a settled state satisfies `done`, returning its cost,
    /// or `None` when no reachable state does.
    pub fn run_until(self, done: impl FnMut(&S) -> bool) -> Option<W> {
        self.find(done).map(|(_, cost)| cost)
    }

    /// Like [`Self::run_until`], also returning the state that satisfied
    /// `done`.
    pub fn find(self, mut done: impl FnMut(&S) -> bool) -> Option<(S, W)> {
        self.drive(|state, _| {
            if done(state) {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .1
    }

    fn drive(
        self,
        mut settle: impl FnMut(&S, W) -> ControlFlow<()>,
    ) -> (HashMap<K, W>, Option<(S, W)>) {
        let _span = info_span!("lazy_search").entered();
        let Self {
            start,
            mut neighbors,
            mut key,
            mut heuristic,
            ..
        } = self;
        let mut best = HashMap::new();
        let mut queue = BinaryHeap::new();
        let start_key = key(&start);
        offer(&mut best, &mut queue, &mut heuristic, start_key, start, W::zero());

        let mut settled = 0usize;
        while let Some(QueueEntry { cost, state, .. }) = queue.pop() {
            if best.get(&key(&state)) != Some(&cost) {
                continue;
            }
            settled += 1;
            if settle(&state, cost).is_break() {
                debug!(settled, "search terminated early");
                return (best, Some((state, cost)));
            }
            for (next, step) in neighbors(&state) {
                let next_key = key(&next);
                offer(&mut best, &mut queue, &mut heuristic, next_key, next, cost + step);
            }
        }
        debug!(settled, "search exhausted");
        (best, None)
    }
}

/// Records `cost` for `key` and queues `state` if it improves on the best
/// cost known so far.
fn offer<S, W, K>(
    best: &mut HashMap<K, W>,
    queue: &mut BinaryHeap<QueueEntry<S, W>>,
    heuristic: &mut impl FnMut(&S) -> W,
    key: K,
    state: S,
    cost: W,
) where
    W: Zero + Ord + Copy,
    K: Eq + Hash,
{
    match best.entry(key) {
        Entry::Occupied(mut entry) => {
            if cost >= *entry.get() {
                return;
            }
            entry.insert(cost);
        }
        Entry::Vacant(entry) => {
            entry.insert(cost);
        }
    }
    let priority = cost + heuristic(&state);
    queue.push(QueueEntry {
        priority,
        cost,
        state,
    });
}

impl<N, W> AdjacencyMap<N, W>
where
    N: Node,
    W: Zero + Ord + Copy,
{
    /// Computes the shortest distance from `start` to every reachable node.
    pub fn dijkstra(&self, start: N) -> HashMap<N, W> {
        self.dijkstra_with(start, |_, _| {})
    }

    /// Like [`Self::dijkstra`], calling `visit(node, distance)` once per node
    /// as it is settled, in order of nondecreasing distance.
    pub fn dijkstra_with(&self, start: N, visit: impl FnMut(&N, W)) -> HashMap<N, W> {
        let _span = info_span!("dijkstra", nodes = self.len()).entered();
        LazySearch::new(start, |node: &N| self.neighbors(node).iter().cloned()).run_with(visit)
    }
}

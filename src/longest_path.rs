use std::collections::HashSet;

use pathfinding::num_traits::Zero;

use crate::{
    adjacency::{AdjacencyMap, Node},
    tracing_support::{debug, info_span},
};

struct Frame<W> {
    next: usize,
    distance: W,
}

impl<N, W> AdjacencyMap<N, W>
where
    N: Node,
    W: Zero + Ord + Copy,
{
    /// Finds the heaviest simple path from `start` to `goal` by exhaustive
    /// backtracking.  Exponential in the worst case, so only suitable for
    /// small graphs.
    ///
    /// Returns the total weight and the path, `start` and `goal` included.
    /// Only totals above zero are recorded, so an unreachable goal (or one
    /// reachable only through zero-weight paths) gives `(0, [])`.
    ///
    /// # Panics
    ///
    /// Panics if `start == goal`.
    pub fn longest_path(&self, start: N, goal: N) -> (W, Vec<N>) {
        assert!(start != goal, "longest_path requires distinct start and goal");
        let _span = info_span!("longest_path").entered();

        let mut best = W::zero();
        let mut best_path = Vec::new();
        let mut on_path = HashSet::from([start.clone()]);
        let mut path = vec![start];
        let mut stack = vec![Frame {
            next: 0,
            distance: W::zero(),
        }];
        let mut explored = 0usize;
        while let Some(frame) = stack.last_mut() {
            let Some(node) = path.last() else {
                break;
            };
            let Some((neighbor, weight)) = self.neighbors(node).get(frame.next) else {
                stack.pop();
                if let Some(node) = path.pop() {
                    on_path.remove(&node);
                }
                continue;
            };
            frame.next += 1;
            explored += 1;
            let distance = frame.distance + *weight;
            if *neighbor == goal {
                if distance > best {
                    best = distance;
                    best_path = path.clone();
                    best_path.push(goal.clone());
                }
                continue;
            }
            if on_path.insert(neighbor.clone()) {
                path.push(neighbor.clone());
                stack.push(Frame { next: 0, distance });
            }
        }
        debug!(explored, found = !best_path.is_empty(), "longest_path finished");
        (best, best_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> AdjacencyMap<char, u32> {
        [
            ('a', vec![('b', 1), ('c', 5)]),
            ('b', vec![('c', 10), ('d', 1)]),
            ('c', vec![('d', 1)]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_longest_path_prefers_detour() {
        assert_eq!(diamond().longest_path('a', 'd'), (12, vec!['a', 'b', 'c', 'd']));
        assert_eq!(diamond().longest_path('b', 'd'), (11, vec!['b', 'c', 'd']));
    }

    #[test]
    fn test_longest_path_no_revisits_on_undirected_graph() {
        let mut graph = AdjacencyMap::new();
        graph.add_undirected_edge(0, 1, 1);
        graph.add_undirected_edge(1, 2, 1);
        graph.add_undirected_edge(2, 3, 1);
        graph.add_undirected_edge(3, 0, 1);
        graph.add_undirected_edge(1, 3, 4);
        // 0-3-1-2 weighs the same but is found later.
        assert_eq!(graph.longest_path(0, 2), (6, vec![0, 1, 3, 2]));
    }

    #[test]
    fn test_longest_path_unreachable() {
        assert_eq!(diamond().longest_path('d', 'a'), (0, vec![]));
        assert_eq!(diamond().longest_path('a', 'z'), (0, vec![]));
    }

    #[test]
    #[should_panic(expected = "distinct start and goal")]
    fn test_longest_path_same_start_and_goal() {
        diamond().longest_path('a', 'a');
    }
}

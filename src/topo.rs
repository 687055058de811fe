use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashMap},
};

use crate::{
    adjacency::{AdjacencyMap, Node},
    tracing_support::{debug, info_span},
};

/// Error returned when a graph cannot be ordered because it has a cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Cycle detected: only {ordered} of {total} nodes could be ordered")]
pub struct CycleError {
    /// Number of nodes output before the queue ran dry.
    pub ordered: usize,
    /// Number of distinct nodes in the graph.
    pub total: usize,
}

impl<N, W> AdjacencyMap<N, W>
where
    N: Node + Ord,
{
    /// Orders every node so that for each edge `u -> v`, `u` comes before
    /// `v`.
    ///
    /// Uses Kahn's algorithm with a min-heap of ready nodes, so among nodes
    /// that could go next the smallest one always does.  Nodes that only
    /// appear as neighbors are included.
    pub fn topological_sort(&self) -> Result<Vec<N>, CycleError> {
        let _span = info_span!("topological_sort", keys = self.len()).entered();
        let nodes = self.all_nodes();
        let mut indegree: HashMap<&N, usize> = nodes.iter().map(|node| (node, 0)).collect();
        for (_, neighbors) in self.iter() {
            for (neighbor, _) in neighbors {
                if let Some(degree) = indegree.get_mut(neighbor) {
                    *degree += 1;
                }
            }
        }

        let mut ready: BinaryHeap<Reverse<&N>> = indegree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(node, _)| Reverse(*node))
            .collect();
        let mut order = Vec::with_capacity(nodes.len());
        while let Some(Reverse(node)) = ready.pop() {
            order.push(node.clone());
            for neighbor in self.neighbor_nodes(node) {
                if let Some(degree) = indegree.get_mut(neighbor) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(Reverse(neighbor));
                    }
                }
            }
        }

        if order.len() < nodes.len() {
            debug!(ordered = order.len(), total = nodes.len(), "cycle detected");
            return Err(CycleError {
                ordered: order.len(),
                total: nodes.len(),
            });
        }
        Ok(order)
    }

    /// Orders every node after all of its dependencies, where the neighbor
    /// list of a node holds the nodes it depends on.
    ///
    /// This is [`Self::topological_sort`] applied to the reversed graph.
    pub fn dependency_order(&self) -> Result<Vec<N>, CycleError> {
        self.without_weights().reversed().topological_sort()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topological_sort_breaks_ties_by_smallest() {
        let graph = AdjacencyMap::from_lists([(5, vec![2, 0]), (4, vec![0, 1]), (2, vec![3]), (3, vec![1])]);
        assert_eq!(graph.topological_sort(), Ok(vec![4, 5, 0, 2, 3, 1]));
    }

    #[test]
    fn test_topological_sort_includes_neighbor_only_nodes() {
        let graph = AdjacencyMap::from_lists([("b", vec!["z"]), ("a", vec!["b"])]);
        assert_eq!(graph.topological_sort(), Ok(vec!["a", "b", "z"]));
    }

    #[test]
    fn test_topological_sort_duplicate_edges() {
        let graph = AdjacencyMap::from_lists([(1, vec![2, 2]), (2, vec![])]);
        assert_eq!(graph.topological_sort(), Ok(vec![1, 2]));
    }

    #[test]
    fn test_topological_sort_cycle() {
        let graph = AdjacencyMap::from_lists([(0, vec![1]), (1, vec![2]), (2, vec![1])]);
        let error = graph.topological_sort().unwrap_err();
        assert_eq!(error, CycleError { ordered: 1, total: 3 });
        assert_eq!(error.to_string(), "Cycle detected: only 1 of 3 nodes could be ordered");
    }

    #[test]
    fn test_topological_sort_self_loop() {
        let graph = AdjacencyMap::from_lists([('a', vec!['a'])]);
        assert!(graph.topological_sort().is_err());
    }

    #[test]
    fn test_dependency_order() {
        // Each node lists what it depends on.
        let graph = AdjacencyMap::from_lists([
            ("app", vec!["lib", "log"]),
            ("lib", vec!["core"]),
            ("log", vec!["core"]),
        ]);
        assert_eq!(graph.dependency_order(), Ok(vec!["core", "lib", "log", "app"]));
        assert_eq!(graph.topological_sort(), Ok(vec!["app", "lib", "log", "core"]));
    }

    #[test]
    fn test_empty_graph() {
        assert_eq!(AdjacencyMap::<u8>::new().topological_sort(), Ok(vec![]));
    }
}

use std::collections::{HashMap, HashSet, VecDeque};

use crate::{
    adjacency::{AdjacencyMap, Node},
    tracing_support::{debug, info_span},
};

/// Breadth-first traversal yielding each reached node with its hop count
/// from the nearest start node.
///
/// Every start node has distance 0.  A node is assigned a distance and
/// queued the first time it is discovered and never again, so the distance
/// reported for it is minimal.
pub struct Bfs<'g, N, W> {
    graph: &'g AdjacencyMap<N, W>,
    distances: HashMap<N, usize>,
    queue: VecDeque<N>,
}

impl<'g, N, W> Bfs<'g, N, W>
where
    N: Node,
{
    pub fn new(graph: &'g AdjacencyMap<N, W>, starts: impl IntoIterator<Item = N>) -> Self {
        let mut distances = HashMap::new();
        let mut queue = VecDeque::new();
        for start in starts {
            if !distances.contains_key(&start) {
                distances.insert(start.clone(), 0);
                queue.push_back(start);
            }
        }
        Self {
            graph,
            distances,
            queue,
        }
    }

    /// Gets the distances of every node discovered so far, including nodes
    /// that are queued but not yet yielded.
    pub fn distances(&self) -> &HashMap<N, usize> {
        &self.distances
    }

    /// Consumes the traversal, returning the distances discovered so far.
    pub fn into_distances(self) -> HashMap<N, usize> {
        self.distances
    }
}

impl<'g, N, W> Iterator for Bfs<'g, N, W>
where
    N: Node,
{
    type Item = (N, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        let steps = self.distances[&node];
        for neighbor in self.graph.neighbor_nodes(&node) {
            if !self.distances.contains_key(neighbor) {
                self.distances.insert(neighbor.clone(), steps + 1);
                self.queue.push_back(neighbor.clone());
            }
        }
        Some((node, steps))
    }
}

/// Depth-first preorder traversal from a single start node.
///
/// Uses an explicit stack but yields nodes in the same order as the
/// recursive formulation that visits neighbors in list order.
pub struct Dfs<'g, N, W> {
    graph: &'g AdjacencyMap<N, W>,
    visited: HashSet<N>,
    stack: Vec<N>,
}

impl<'g, N, W> Dfs<'g, N, W>
where
    N: Node,
{
    pub fn new(graph: &'g AdjacencyMap<N, W>, start: N) -> Self {
        Self {
            graph,
            visited: HashSet::new(),
            stack: vec![start],
        }
    }

    /// Consumes the traversal, returning the set of nodes yielded so far.
    pub fn into_visited(self) -> HashSet<N> {
        self.visited
    }
}

impl<'g, N, W> Iterator for Dfs<'g, N, W>
where
    N: Node,
{
    type Item = N;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if self.visited.insert(node.clone()) {
                let visited = &self.visited;
                self.stack.extend(
                    self.graph
                        .neighbors(&node)
                        .iter()
                        .rev()
                        .map(|(neighbor, _)| neighbor)
                        .filter(|neighbor| !visited.contains(*neighbor))
                        .cloned(),
                );
                return Some(node);
            }
        }
        None
    }
}

impl<N, W> AdjacencyMap<N, W>
where
    N: Node,
{
    /// Computes the hop count from the nearest of `starts` to every
    /// reachable node.
    pub fn bfs(&self, starts: impl IntoIterator<Item = N>) -> HashMap<N, usize> {
        self.bfs_with(starts, |_, _| {})
    }

    /// Like [`Self::bfs`], calling `visit(node, distance)` as each node is
    /// taken off the queue.
    pub fn bfs_with(
        &self,
        starts: impl IntoIterator<Item = N>,
        mut visit: impl FnMut(&N, usize),
    ) -> HashMap<N, usize> {
        let _span = info_span!("bfs").entered();
        let mut bfs = Bfs::new(self, starts);
        for (node, steps) in bfs.by_ref() {
            visit(&node, steps);
        }
        let distances = bfs.into_distances();
        debug!(reached = distances.len(), "bfs finished");
        distances
    }

    /// Gets the nodes reachable from `start` in depth-first preorder.
    pub fn dfs(&self, start: N) -> Vec<N> {
        self.dfs_with(start, |_| {})
    }

    /// Like [`Self::dfs`], calling `visit(node)` as each node is discovered.
    pub fn dfs_with(&self, start: N, mut visit: impl FnMut(&N)) -> Vec<N> {
        let _span = info_span!("dfs").entered();
        Dfs::new(self, start)
            .inspect(|node| visit(node))
            .collect()
    }

    /// Runs a BFS from every key not covered by an earlier search, in key
    /// order, returning one distance map per component.
    pub fn bfs_all(&self) -> Vec<HashMap<N, usize>> {
        self.bfs_all_with(|_, _, _| {})
    }

    /// Like [`Self::bfs_all`], calling `visit(component, node, distance)`
    /// for each visited node.
    pub fn bfs_all_with(
        &self,
        mut visit: impl FnMut(usize, &N, usize),
    ) -> Vec<HashMap<N, usize>> {
        self.search_all(
            |component, start| {
                self.bfs_with([start], |node, steps| visit(component, node, steps))
            },
            |distances, covered| covered.extend(distances.keys().cloned()),
        )
    }

    /// Runs a DFS from every key not covered by an earlier search, in key
    /// order, returning the nodes of each component in discovery order.
    pub fn dfs_all(&self) -> Vec<Vec<N>> {
        self.dfs_all_with(|_, _| {})
    }

    /// Like [`Self::dfs_all`], calling `visit(component, node)` for each
    /// visited node.
    pub fn dfs_all_with(&self, mut visit: impl FnMut(usize, &N)) -> Vec<Vec<N>> {
        self.search_all(
            |component, start| self.dfs_with(start, |node| visit(component, node)),
            |nodes, covered| covered.extend(nodes.iter().cloned()),
        )
    }

    fn search_all<R>(
        &self,
        mut search: impl FnMut(usize, N) -> R,
        mut cover: impl FnMut(&R, &mut HashSet<N>),
    ) -> Vec<R> {
        let mut covered = HashSet::with_capacity(self.len());
        let mut results = Vec::new();
        for node in self.nodes() {
            if covered.contains(node) {
                continue;
            }
            let result = search(results.len(), node.clone());
            cover(&result, &mut covered);
            results.push(result);
        }
        debug!(components = results.len(), "search_all finished");
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_simple_graph() -> AdjacencyMap<usize> {
        AdjacencyMap::from_lists([(0, vec![1, 2]), (1, vec![3]), (2, vec![]), (3, vec![])])
    }

    fn create_cyclic_graph() -> AdjacencyMap<usize> {
        AdjacencyMap::from_lists([(0, vec![1]), (1, vec![2]), (2, vec![0])])
    }

    fn create_two_component_graph() -> AdjacencyMap<usize> {
        AdjacencyMap::from_lists([
            (0, vec![1, 2, 8]),
            (1, vec![2, 3]),
            (2, vec![4]),
            (3, vec![5]),
            (4, vec![1, 3, 5]),
            (6, vec![7]),
        ])
        .symmetric()
    }

    #[test]
    fn test_bfs_simple_graph() {
        let graph = create_simple_graph();
        let visited: Vec<_> = Bfs::new(&graph, [0]).collect();
        assert_eq!(visited, [(0, 0), (1, 1), (2, 1), (3, 2)]);

        // Neighbors of a yielded node are discovered before they are yielded.
        let mut bfs = Bfs::new(&graph, [0]);
        assert_eq!(bfs.next(), Some((0, 0)));
        assert_eq!(bfs.distances(), &HashMap::from([(0, 0), (1, 1), (2, 1)]));
    }

    #[test]
    fn test_bfs_empty_start() {
        let graph = create_simple_graph();
        assert_eq!(Bfs::new(&graph, []).count(), 0);
        assert!(graph.bfs([]).is_empty());
    }

    #[test]
    fn test_bfs_multiple_start_nodes() {
        let graph = AdjacencyMap::from_lists([
            ('a', vec!['b']),
            ('b', vec!['c']),
            ('c', vec!['d']),
            ('e', vec!['d']),
        ]);
        let distances = graph.bfs(['a', 'e']);
        assert_eq!(
            distances,
            HashMap::from([('a', 0), ('e', 0), ('b', 1), ('d', 1), ('c', 2)])
        );
    }

    #[test]
    fn test_bfs_duplicate_starts_visit_once() {
        let graph = create_simple_graph();
        let mut visits = Vec::new();
        graph.bfs_with([0, 0, 1], |node, steps| visits.push((*node, steps)));
        assert_eq!(visits, [(0, 0), (1, 0), (2, 1), (3, 1)]);
    }

    #[test]
    fn test_bfs_handles_cycles() {
        let graph = create_cyclic_graph();
        assert_eq!(graph.bfs([0]), HashMap::from([(0, 0), (1, 1), (2, 2)]));
    }

    #[test]
    fn test_bfs_reaches_neighbor_only_nodes() {
        let graph = AdjacencyMap::from_lists([("start", vec!["leaf"])]);
        assert_eq!(graph.bfs(["start"]), HashMap::from([("start", 0), ("leaf", 1)]));
        assert_eq!(graph.bfs(["nowhere"]), HashMap::from([("nowhere", 0)]));
    }

    #[test]
    fn test_dfs_simple_graph() {
        let graph = create_simple_graph();
        assert_eq!(graph.dfs(0), [0, 1, 3, 2]);
    }

    #[test]
    fn test_dfs_matches_recursive_order() {
        // 0 -> 1 -> 2 and 0 -> 2: the recursive order reaches 2 through 1.
        let graph = AdjacencyMap::from_lists([(0, vec![1, 2]), (1, vec![2]), (2, vec![0])]);
        assert_eq!(graph.dfs(0), [0, 1, 2]);
    }

    #[test]
    fn test_dfs_handles_cycles() {
        let graph = create_cyclic_graph();
        let mut seen = Vec::new();
        let visited = graph.dfs_with(1, |node| seen.push(*node));
        assert_eq!(visited, [1, 2, 0]);
        assert_eq!(seen, visited);
    }

    #[test]
    fn test_dfs_into_visited() {
        let graph = create_simple_graph();
        let mut dfs = Dfs::new(&graph, 1);
        assert_eq!(dfs.next(), Some(1));
        assert_eq!(dfs.into_visited(), HashSet::from([1]));
    }

    #[test]
    fn test_bfs_dfs_visit_same_nodes() {
        let graph = create_simple_graph();
        let bfs_visited: HashSet<_> = graph.bfs([0]).into_keys().collect();
        let dfs_visited: HashSet<_> = graph.dfs(0).into_iter().collect();
        assert_eq!(bfs_visited, dfs_visited);
    }

    #[test]
    fn test_search_all_components() {
        let graph = create_two_component_graph();

        let components = graph.dfs_all();
        assert_eq!(components.len(), 2);
        assert_eq!(
            components[1].iter().copied().collect::<HashSet<_>>(),
            HashSet::from([6, 7])
        );

        let mut labels = HashMap::new();
        let distances = graph.bfs_all_with(|component, node, _| {
            labels.insert(*node, component);
        });
        assert_eq!(distances.len(), 2);
        assert_eq!(distances[0].len(), 7);
        assert_eq!(distances[1], HashMap::from([(6, 0), (7, 1)]));
        assert_eq!(labels[&8], 0);
        assert_eq!(labels[&7], 1);
    }

    #[test]
    fn test_dfs_all_with_reports_component_index() {
        let graph = create_two_component_graph();
        let mut visits = Vec::new();
        let components = graph.dfs_all_with(|component, node| visits.push((component, *node)));
        assert_eq!(components, [vec![0, 1, 2, 4, 3, 5, 8], vec![6, 7]]);
        assert_eq!(
            visits,
            [(0, 0), (0, 1), (0, 2), (0, 4), (0, 3), (0, 5), (0, 8), (1, 6), (1, 7)]
        );
    }

    #[test]
    fn test_search_all_directed_covers_every_key() {
        // 1 is reachable from 0 but 0 is not reachable from 1.
        let graph = AdjacencyMap::from_lists([(1, vec![]), (0, vec![1]), (2, vec![])]);
        let components = graph.dfs_all();
        assert_eq!(components, [vec![1], vec![0, 1], vec![2]]);
        assert_eq!(graph.bfs_all(), graph.bfs_all());
    }

    #[test]
    fn test_search_all_empty_graph() {
        let graph = AdjacencyMap::<u8>::new();
        assert!(graph.bfs_all().is_empty());
        assert!(graph.dfs_all().is_empty());
    }
}

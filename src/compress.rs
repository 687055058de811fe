use std::{collections::HashSet, ops::Add};

use crate::{
    adjacency::{AdjacencyMap, Node},
    tracing_support::{debug, info_span},
};

impl<N, W> AdjacencyMap<N, W>
where
    N: Node,
    W: Add<Output = W> + Copy + PartialEq,
{
    /// Removes every node outside `fixed` that sits in the middle of a
    /// corridor, joining its two neighbors directly with the summed weight.
    ///
    /// A node qualifies when it has exactly two neighbor entries `a` and `b`,
    /// both distinct from each other and from the node, and both list the
    /// node back.  Nodes are examined once each, in key order, against the
    /// graph as it stands at that point.  Returns the number of nodes
    /// removed.
    ///
    /// The graph is expected to be symmetric; on a directed graph the result
    /// is unlikely to be meaningful.
    pub fn compress_paths(&mut self, fixed: impl IntoIterator<Item = N>) -> usize {
        let _span = info_span!("compress_paths", keys = self.len()).entered();
        let fixed: HashSet<N> = fixed.into_iter().collect();
        let candidates: Vec<N> = self.nodes().filter(|node| !fixed.contains(*node)).cloned().collect();

        let mut removed = 0;
        for node in candidates {
            let [(a, wa), (b, wb)] = self.neighbors(&node) else {
                continue;
            };
            let (a, wa, b, wb) = (a.clone(), *wa, b.clone(), *wb);
            if a == b || a == node || b == node {
                continue;
            }
            let (Some(ixa), Some(ixb)) = (self.back_reference(&a, &node), self.back_reference(&b, &node))
            else {
                continue;
            };

            let joined = wa + wb;
            if let Some(list) = self.neighbors_mut(&a) {
                debug_assert!(list[ixa].1 == wa, "asymmetric weight between corridor nodes");
                list[ixa] = (b.clone(), joined);
            }
            if let Some(list) = self.neighbors_mut(&b) {
                debug_assert!(list[ixb].1 == wb, "asymmetric weight between corridor nodes");
                list[ixb] = (a, joined);
            }
            self.remove_node(&node);
            removed += 1;
        }
        debug!(removed, "compress_paths finished");
        removed
    }

    fn back_reference(&self, from: &N, to: &N) -> Option<usize> {
        self.neighbors(from).iter().position(|(neighbor, _)| neighbor == to)
    }
}

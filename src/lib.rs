//! Graph search, flow and matching building blocks for puzzle-style
//! problems.
//!
//! Graphs are plain [`AdjacencyMap`]s keyed by any hashable value.  The
//! algorithms are methods on the map (or, for the lazy search and the integer
//! matching engine, small standalone types) and return fresh results on every
//! call.

pub mod adjacency;
pub mod compress;
pub mod flow;
pub mod grid;
pub mod longest_path;
pub mod matching;
pub mod matching_input;
pub mod search;
pub mod shortest_path;
pub mod topo;
pub mod tracing_support;

pub use adjacency::{AdjacencyMap, Node};
pub use flow::FlowNetwork;
pub use grid::{Connectivity, GridGraphConfig, Point, grid_graph, node_chars};
pub use matching::{BipartiteMatching, Matching};
pub use search::{Bfs, Dfs};
pub use shortest_path::LazySearch;
pub use topo::CycleError;

//! Building an [`AdjacencyMap`] from a character grid.
use std::ops::Add;

use pathfinding::num_traits::One;

use crate::{adjacency::AdjacencyMap, tracing_support::info_span};

/// A grid coordinate.  `y` grows downward, so north is `(0, -1)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Gets the Manhattan distance to another point.
    pub fn manhattan(self, other: Point) -> u64 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl From<(i64, i64)> for Point {
    fn from((x, y): (i64, i64)) -> Self {
        Point::new(x, y)
    }
}

const FOUR_WAY: [Point; 4] = [
    Point::new(0, -1),
    Point::new(1, 0),
    Point::new(0, 1),
    Point::new(-1, 0),
];

const EIGHT_WAY: [Point; 8] = [
    Point::new(0, -1),
    Point::new(1, -1),
    Point::new(1, 0),
    Point::new(1, 1),
    Point::new(0, 1),
    Point::new(-1, 1),
    Point::new(-1, 0),
    Point::new(-1, -1),
];

/// Which neighboring cells are adjacent to a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Connectivity {
    /// North, east, south and west.
    #[default]
    FourWay,
    /// The four-way neighbors plus the diagonals.
    EightWay,
}

impl Connectivity {
    /// Gets the neighbor offsets, clockwise starting from north.
    pub fn directions(self) -> &'static [Point] {
        match self {
            Connectivity::FourWay => &FOUR_WAY,
            Connectivity::EightWay => &EIGHT_WAY,
        }
    }
}

/// Configuration for [`grid_graph`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GridGraphConfig {
    pub connectivity: Connectivity,
    /// When false every edge gets unit weight regardless of the weight the
    /// edge function returns.
    pub weighted: bool,
}

impl GridGraphConfig {
    pub fn four_way() -> Self {
        Self::default()
    }

    pub fn eight_way() -> Self {
        Self {
            connectivity: Connectivity::EightWay,
            ..Self::default()
        }
    }

    pub fn weighted(self) -> Self {
        Self {
            weighted: true,
            ..self
        }
    }
}

/// Converts a grid of characters into a graph.
///
/// Every cell accepted by `is_node(point, char)` becomes a key, in row-major
/// order.  For each accepted cell, `get_edge(point, char, neighbor_point,
/// neighbor_char)` is called for every in-bounds accepted neighbor in
/// [`Connectivity::directions`] order; `Some(weight)` adds an edge and
/// `None` omits it.  Rows may have different lengths.
pub fn grid_graph<S, W>(
    grid: &[S],
    config: GridGraphConfig,
    mut is_node: impl FnMut(Point, char) -> bool,
    mut get_edge: impl FnMut(Point, char, Point, char) -> Option<W>,
) -> AdjacencyMap<Point, W>
where
    S: AsRef<str>,
    W: One,
{
    let _span = info_span!("grid_graph", rows = grid.len()).entered();
    let rows: Vec<Vec<char>> = grid.iter().map(|row| row.as_ref().chars().collect()).collect();
    let cell = |p: Point| -> Option<char> {
        let row = rows.get(usize::try_from(p.y).ok()?)?;
        row.get(usize::try_from(p.x).ok()?).copied()
    };

    let mut graph = AdjacencyMap::new();
    for (y, row) in rows.iter().enumerate() {
        for (x, &c) in row.iter().enumerate() {
            let p = Point::new(x as i64, y as i64);
            if !is_node(p, c) {
                continue;
            }
            graph.add_node(p);
            for &d in config.connectivity.directions() {
                let np = p + d;
                let Some(nc) = cell(np) else {
                    continue;
                };
                if !is_node(np, nc) {
                    continue;
                }
                if let Some(weight) = get_edge(p, c, np, nc) {
                    let weight = if config.weighted { weight } else { W::one() };
                    graph.add_weighted_edge(p, np, weight);
                }
            }
        }
    }
    graph
}

/// Gets a node predicate accepting the cells whose character is in `chars`.
pub fn node_chars(chars: &str) -> impl Fn(Point, char) -> bool + '_ {
    move |_, c| chars.contains(c)
}

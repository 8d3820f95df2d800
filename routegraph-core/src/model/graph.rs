use std::collections::BTreeSet;

use geo::Point;

use super::GraphNode;
use crate::geometry::haversine_distance;

/// Undirected navigation graph stored as an arena.
///
/// Nodes are addressed by their 0-based position. Neighbor sets are kept
/// symmetric and free of self references by every mutating method, and
/// iterate in ascending order so that all derived output is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteGraph {
    coords: Vec<Point<f64>>,
    neighbors: Vec<BTreeSet<usize>>,
}

impl RouteGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            coords: Vec::with_capacity(nodes),
            neighbors: Vec::with_capacity(nodes),
        }
    }

    /// Appends an isolated node and returns its index.
    pub fn add_node(&mut self, location: Point<f64>) -> usize {
        self.coords.push(location);
        self.neighbors.push(BTreeSet::new());
        self.coords.len() - 1
    }

    /// Inserts the undirected edge `u - v`.
    ///
    /// Returns `false` for self-loops and for edges that already exist.
    ///
    /// # Panics
    ///
    /// If either index is out of bounds.
    pub fn add_edge(&mut self, u: usize, v: usize) -> bool {
        if u == v {
            return false;
        }
        let inserted = self.neighbors[u].insert(v);
        self.neighbors[v].insert(u);
        inserted
    }

    /// Removes the undirected edge `u - v`, returning whether it existed.
    pub fn remove_edge(&mut self, u: usize, v: usize) -> bool {
        let removed = self.neighbors[u].remove(&v);
        self.neighbors[v].remove(&u);
        removed
    }

    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.neighbors.get(u).is_some_and(|set| set.contains(&v))
    }

    pub fn node(&self, idx: usize) -> Point<f64> {
        self.coords[idx]
    }

    pub fn coords(&self) -> &[Point<f64>] {
        &self.coords
    }

    pub fn neighbors(&self, idx: usize) -> &BTreeSet<usize> {
        &self.neighbors[idx]
    }

    pub fn node_count(&self) -> usize {
        self.coords.len()
    }

    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(BTreeSet::len).sum::<usize>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Every undirected edge once as `(u, v)` with `u < v`, ascending.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.neighbors.iter().enumerate().flat_map(|(u, set)| {
            set.range(u + 1..).map(move |&v| (u, v))
        })
    }

    /// Great-circle length of the segment between two nodes, meters.
    pub fn edge_length(&self, u: usize, v: usize) -> f64 {
        haversine_distance(self.coords[u], self.coords[v])
    }

    /// Exports nodes in arena order with identifiers `index + 1`.
    pub fn to_nodes(&self) -> Vec<GraphNode> {
        self.coords
            .iter()
            .zip(&self.neighbors)
            .enumerate()
            .map(|(idx, (p, set))| GraphNode {
                id: idx + 1,
                lat: p.y(),
                lon: p.x(),
                connected_to: set.iter().map(|&v| v + 1).collect(),
            })
            .collect()
    }

    /// Reads an exported node list back into an arena.
    ///
    /// Nodes are taken in list order; a neighbor id `k` refers to the `k`-th
    /// node of the list. Out-of-range and self references are dropped and
    /// one-sided references are made symmetric.
    pub fn from_nodes(nodes: &[GraphNode]) -> Self {
        let mut graph = Self::with_capacity(nodes.len());
        for node in nodes {
            graph.add_node(node.location());
        }
        for (idx, node) in nodes.iter().enumerate() {
            for &neighbor_id in &node.connected_to {
                if let Some(j) = neighbor_id.checked_sub(1)
                    && j < nodes.len()
                {
                    graph.add_edge(idx, j);
                }
            }
        }
        graph
    }
}

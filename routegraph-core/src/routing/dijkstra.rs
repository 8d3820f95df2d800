use std::{cmp::Ordering, collections::BinaryHeap};

use hashbrown::HashMap;

use crate::{
    Error, NodeId,
    model::{GraphNode, RouteGraph},
};

#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    node: usize,
}

impl Eq for State {}

// Implement Ord for State to use in BinaryHeap
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by cost (reversed from standard Rust BinaryHeap)
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Node sequence and length of a shortest path
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath {
    pub nodes: Vec<usize>,
    pub length_m: f64,
}

/// Dijkstra's algorithm with haversine edge lengths as weights.
/// Returns `None` if `target` is unreachable from `start`.
pub fn shortest_path(graph: &RouteGraph, start: usize, target: usize) -> Option<ShortestPath> {
    if start >= graph.node_count() || target >= graph.node_count() {
        return None;
    }

    let mut distances: HashMap<usize, f64> = HashMap::new();
    let mut predecessors: HashMap<usize, usize> = HashMap::new();
    let mut heap = BinaryHeap::new();

    // Start node has distance 0
    heap.push(State {
        cost: 0.0,
        node: start,
    });
    distances.insert(start, 0.0);

    while let Some(State { cost, node }) = heap.pop() {
        if node == target {
            break;
        }

        // Skip if we've found a better path
        if distances.get(&node).is_some_and(|&best| cost > best) {
            continue;
        }

        for &next in graph.neighbors(node) {
            let next_cost = cost + graph.edge_length(node, next);

            match distances.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    heap.push(State {
                        cost: next_cost,
                        node: next,
                    });
                    predecessors.insert(next, node);
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        heap.push(State {
                            cost: next_cost,
                            node: next,
                        });
                        predecessors.insert(next, node);
                    }
                }
            }
        }
    }

    let length_m = *distances.get(&target)?;
    let mut nodes = vec![target];
    let mut current = target;
    while let Some(&prev) = predecessors.get(&current) {
        nodes.push(prev);
        current = prev;
    }
    nodes.reverse();

    Some(ShortestPath { nodes, length_m })
}

/// Shortest path between two identifiers of an exported node list.
///
/// The returned path lists identifiers rather than arena indices.
///
/// # Errors
///
/// Returns [`Error::UnknownNode`] if either identifier is outside `1..=nodes.len()`.
pub fn shortest_path_by_id(
    nodes: &[GraphNode],
    from: NodeId,
    to: NodeId,
) -> Result<Option<ShortestPath>, Error> {
    for id in [from, to] {
        if id == 0 || id > nodes.len() {
            return Err(Error::UnknownNode(id));
        }
    }

    let graph = RouteGraph::from_nodes(nodes);
    Ok(shortest_path(&graph, from - 1, to - 1).map(|path| ShortestPath {
        nodes: path.nodes.into_iter().map(|idx| idx + 1).collect(),
        length_m: path.length_m,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::point;

    /// Square with one diagonal: 0 (0,0), 1 (east), 2 (north-east), 3 (north)
    fn square() -> RouteGraph {
        let mut graph = RouteGraph::new();
        graph.add_node(point!(x: 0.0, y: 0.0));
        graph.add_node(point!(x: 0.001, y: 0.0));
        graph.add_node(point!(x: 0.001, y: 0.001));
        graph.add_node(point!(x: 0.0, y: 0.001));
        graph.add_node(point!(x: 1.0, y: 1.0));
        for (u, v) in [(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)] {
            graph.add_edge(u, v);
        }
        graph
    }

    #[test]
    fn prefers_geometrically_shorter_path() {
        let graph = square();
        let path = shortest_path(&graph, 1, 3).unwrap();
        assert_eq!(path.nodes.len(), 3);
        let direct = shortest_path(&graph, 0, 2).unwrap();
        assert_eq!(direct.nodes, vec![0, 2]);
        assert!((direct.length_m - graph.edge_length(0, 2)).abs() < 1e-9);
    }

    #[test]
    fn unreachable_and_trivial() {
        let graph = square();
        assert_eq!(shortest_path(&graph, 0, 4), None);
        let trivial = shortest_path(&graph, 2, 2).unwrap();
        assert_eq!(trivial.nodes, vec![2]);
        assert_eq!(trivial.length_m, 0.0);
    }

    #[test]
    fn identifiers_are_validated_and_translated() {
        let nodes = square().to_nodes();
        let path = shortest_path_by_id(&nodes, 1, 3).unwrap().unwrap();
        assert_eq!(path.nodes, vec![1, 3]);
        assert!(matches!(
            shortest_path_by_id(&nodes, 0, 3),
            Err(Error::UnknownNode(0))
        ));
        assert!(matches!(
            shortest_path_by_id(&nodes, 1, 6),
            Err(Error::UnknownNode(6))
        ));
    }
}

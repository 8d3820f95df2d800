use crate::{model::RouteGraph, spatial::pairs_within};

/// Adds an edge between every pair of nodes within `connect_dist_m`.
/// Returns the number of edges that did not exist before.
pub fn connect_close_nodes(graph: &mut RouteGraph, connect_dist_m: f64) -> usize {
    pairs_within(graph.coords(), connect_dist_m)
        .into_iter()
        .filter(|&(i, j)| graph.add_edge(i, j))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::point;

    #[test]
    fn links_only_nearby_pairs() {
        let mut graph = RouteGraph::new();
        graph.add_node(point!(x: 0.0, y: 0.0));
        graph.add_node(point!(x: 0.000_2, y: 0.0)); // 22 m
        graph.add_node(point!(x: 0.000_4, y: 0.0)); // 44 m from the first
        graph.add_edge(0, 1);

        let added = connect_close_nodes(&mut graph, 25.0);
        assert_eq!(added, 1);
        assert!(graph.has_edge(1, 2));
        assert!(!graph.has_edge(0, 2));
    }
}

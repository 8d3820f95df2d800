use itertools::Itertools;

use crate::{algo::connected_components, model::RouteGraph};

/// Joins disconnected fragments through their closest node pairs.
///
/// Components are computed once. For every pair of components the single
/// closest pair of nodes is linked if it is within `max_dist_m`; components
/// that are farther apart stay disconnected. Returns the number of bridges.
pub fn bridge_components(graph: &mut RouteGraph, max_dist_m: f64) -> usize {
    let components = connected_components(graph);
    if components.len() <= 1 {
        return 0;
    }

    let bridges: Vec<(usize, usize)> = components
        .iter()
        .tuple_combinations()
        .filter_map(|(a, b)| closest_pair(graph, a, b))
        .filter(|&(_, _, d)| d <= max_dist_m)
        .map(|(i, j, _)| (i, j))
        .collect();

    bridges
        .into_iter()
        .filter(|&(i, j)| graph.add_edge(i, j))
        .count()
}

/// Closest `(node in a, node in b, meters)`; the first pair found wins ties.
fn closest_pair(graph: &RouteGraph, a: &[usize], b: &[usize]) -> Option<(usize, usize, f64)> {
    let mut best: Option<(usize, usize, f64)> = None;
    for &i in a {
        for &j in b {
            let d = graph.edge_length(i, j);
            if best.is_none_or(|(_, _, best_d)| d < best_d) {
                best = Some((i, j, d));
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::point;

    #[test]
    fn bridges_near_fragments_only() {
        let mut graph = RouteGraph::new();
        // Fragment A
        graph.add_node(point!(x: 0.0, y: 0.0));
        graph.add_node(point!(x: 0.000_3, y: 0.0));
        // Fragment B, 30 m east of A's end
        graph.add_node(point!(x: 0.000_57, y: 0.0));
        graph.add_node(point!(x: 0.000_9, y: 0.0));
        // Fragment C, far away
        graph.add_node(point!(x: 0.01, y: 0.0));
        graph.add_edge(0, 1);
        graph.add_edge(2, 3);

        let added = bridge_components(&mut graph, 35.0);
        assert_eq!(added, 1);
        assert!(graph.has_edge(1, 2));
        assert!(graph.neighbors(4).is_empty());
        assert_eq!(connected_components(&graph).len(), 2);
    }

    #[test]
    fn connected_graph_is_untouched() {
        let mut graph = RouteGraph::new();
        graph.add_node(point!(x: 0.0, y: 0.0));
        graph.add_node(point!(x: 0.01, y: 0.0));
        graph.add_edge(0, 1);
        assert_eq!(bridge_components(&mut graph, 35.0), 0);
        assert_eq!(graph.edge_count(), 1);
    }
}

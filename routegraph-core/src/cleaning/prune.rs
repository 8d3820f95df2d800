use itertools::Itertools;
use log::trace;

use crate::{
    algo::bfs_path,
    geometry::{SegmentFrame, haversine_distance},
    model::RouteGraph,
};

/// Removes edges that shortcut an existing near-collinear path.
///
/// Each edge present when the pass starts is taken out and the fewest-hop
/// path between its endpoints is searched. The edge stays removed only if such
/// a path exists, is at most `max_extra_ratio` longer than the edge, and every
/// intermediate node lies within `max_perp_dist_m` of the straight segment.
/// Otherwise it is restored, so reachability never changes. Returns the number
/// of edges removed.
pub fn prune_skip_edges(
    graph: &mut RouteGraph,
    max_extra_ratio: f64,
    max_perp_dist_m: f64,
) -> usize {
    let edges: Vec<(usize, usize)> = graph.edges().collect();
    let mut pruned = 0;

    for (u, v) in edges {
        if !graph.has_edge(u, v) {
            continue;
        }

        graph.remove_edge(u, v);
        if is_skip_edge(graph, u, v, max_extra_ratio, max_perp_dist_m) {
            trace!("Pruned skip edge {u} - {v}");
            pruned += 1;
        } else {
            graph.add_edge(u, v);
        }
    }

    pruned
}

/// Checks the detour between `u` and `v` with their direct edge already removed.
fn is_skip_edge(
    graph: &RouteGraph,
    u: usize,
    v: usize,
    max_extra_ratio: f64,
    max_perp_dist_m: f64,
) -> bool {
    let Some(path) = bfs_path(graph, u, v) else {
        return false;
    };

    let direct_m = graph.edge_length(u, v);
    let path_m: f64 = path
        .iter()
        .tuple_windows()
        .map(|(&a, &b)| haversine_distance(graph.node(a), graph.node(b)))
        .sum();
    if path_m > direct_m * (1.0 + max_extra_ratio) {
        return false;
    }

    let Some(frame) = SegmentFrame::new(graph.node(u), graph.node(v)) else {
        return false;
    };
    path[1..path.len() - 1]
        .iter()
        .all(|&w| frame.locate(graph.node(w)).segment_distance_m <= max_perp_dist_m)
}

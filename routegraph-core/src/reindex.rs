//! Final renumbering of a cleaned graph.

use geo::Point;
use log::debug;

use crate::{
    NodeId,
    geometry::nearest_point_index,
    model::{GraphNode, RouteGraph},
};

/// Renumbers the graph so the start and destination are known in advance.
///
/// The node nearest to `start` receives identifier 1 and the node nearest to
/// `destination` the highest identifier; all other nodes keep their relative
/// order in between. Ties in the nearest-node search go to the lower index.
/// When one node is nearest to both points it is numbered 1. Neighbor lists
/// are remapped and sorted ascending; topology is unchanged.
pub fn reindex(graph: &RouteGraph, start: Point<f64>, destination: Point<f64>) -> Vec<GraphNode> {
    let coords = graph.coords();
    let (Some((start_idx, start_m)), Some((dest_idx, dest_m))) = (
        nearest_point_index(coords.iter().copied(), start),
        nearest_point_index(coords.iter().copied(), destination),
    ) else {
        return Vec::new();
    };
    debug!(
        "Start anchored to node {start_idx} ({start_m:.1} m away), destination to node {dest_idx} ({dest_m:.1} m away)"
    );

    let mut order = Vec::with_capacity(coords.len());
    order.push(start_idx);
    order.extend((0..coords.len()).filter(|&idx| idx != start_idx && idx != dest_idx));
    if dest_idx != start_idx {
        order.push(dest_idx);
    }

    let mut new_id: Vec<NodeId> = vec![0; coords.len()];
    for (position, &old) in order.iter().enumerate() {
        new_id[old] = position + 1;
    }

    order
        .iter()
        .map(|&old| {
            let mut connected_to: Vec<NodeId> =
                graph.neighbors(old).iter().map(|&v| new_id[v]).collect();
            connected_to.sort_unstable();
            let location = graph.node(old);
            GraphNode {
                id: new_id[old],
                lat: location.y(),
                lon: location.x(),
                connected_to,
            }
        })
        .collect()
}

//! In-memory renderings of an exported node list.
//!
//! All formats take the reindexed node list (identifiers `1..=n`, position
//! `k - 1` holds node `k`) and never touch the filesystem.

mod json;
mod kml;
mod to_geojson;

pub use json::{from_json_str, to_json_string};
pub use kml::to_kml_string;
pub use to_geojson::{to_geojson, to_geojson_string};

use itertools::Itertools;

use crate::model::GraphNode;

/// Each undirected edge once, as a pair of list positions with the lower
/// identifier first. Neighbor ids with no matching node are skipped.
pub(crate) fn undirected_edges(nodes: &[GraphNode]) -> Vec<(usize, usize)> {
    nodes
        .iter()
        .enumerate()
        .flat_map(|(i, node)| {
            node.connected_to
                .iter()
                .filter_map(move |&id| id.checked_sub(1).map(|j| (i, j)))
        })
        .filter(|&(i, j)| j < nodes.len() && i != j)
        .map(|(i, j)| (i.min(j), i.max(j)))
        .unique()
        .collect()
}


#[cfg(test)]
mod tests {
    use super::{test_support::path_nodes, *};

    #[test]
    fn edges_are_listed_once() {
        let nodes = path_nodes();
        assert_eq!(undirected_edges(&nodes), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn dangling_references_are_ignored() {
        let mut nodes = path_nodes();
        nodes[2].connected_to.extend([0, 3, 9]);
        assert_eq!(undirected_edges(&nodes), vec![(0, 1), (1, 2)]);
    }
}

use geo::{Centroid, MultiPoint, Point};
use hashbrown::HashMap;
use petgraph::unionfind::UnionFind;

use crate::{model::RouteGraph, spatial::pairs_within};

/// Collapses every cluster of nodes linked by distances `<= merge_dist_m`.
///
/// Clusters are the transitive closure of the pairwise relation, so a chain
/// of close nodes merges even if its ends are far apart. Each cluster becomes
/// one node at the centroid of its members, numbered by its lowest member;
/// edges are remapped and edges inside a cluster disappear.
pub fn merge_close_nodes(graph: &RouteGraph, merge_dist_m: f64) -> RouteGraph {
    let (labels, members) = cluster_nodes(graph, merge_dist_m);

    let mut merged = RouteGraph::with_capacity(members.len());
    for cluster in &members {
        merged.add_node(centroid(cluster.iter().map(|&idx| graph.node(idx)).collect()));
    }
    for (u, v) in graph.edges() {
        merged.add_edge(labels[u], labels[v]);
    }
    merged
}

/// Cluster label of every node plus the members of each cluster.
/// Labels are dense and ordered by each cluster's lowest member.
fn cluster_nodes(graph: &RouteGraph, merge_dist_m: f64) -> (Vec<usize>, Vec<Vec<usize>>) {
    let node_count = graph.node_count();
    let mut sets = UnionFind::<usize>::new(node_count);
    for (i, j) in pairs_within(graph.coords(), merge_dist_m) {
        sets.union(i, j);
    }

    let mut label_of_root: HashMap<usize, usize> = HashMap::new();
    let mut members: Vec<Vec<usize>> = Vec::new();
    let mut labels = Vec::with_capacity(node_count);
    for idx in 0..node_count {
        let root = sets.find_mut(idx);
        let label = *label_of_root.entry(root).or_insert_with(|| {
            members.push(Vec::new());
            members.len() - 1
        });
        members[label].push(idx);
        labels.push(label);
    }
    (labels, members)
}

fn centroid(points: Vec<Point<f64>>) -> Point<f64> {
    if let [single] = points.as_slice() {
        return *single;
    }
    let fallback = points[0];
    MultiPoint::new(points).centroid().unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::haversine_distance;
    use geo::point;

    #[test]
    fn close_nodes_collapse_to_centroid() {
        let mut graph = RouteGraph::new();
        let a = graph.add_node(point!(x: 0.0, y: 0.0));
        let b = graph.add_node(point!(x: 0.000_02, y: 0.0)); // ~2.2 m from a
        let c = graph.add_node(point!(x: 0.001, y: 0.0));
        let d = graph.add_node(point!(x: 0.000_01, y: 0.001));
        graph.add_edge(a, b);
        graph.add_edge(b, c);
        graph.add_edge(a, d);

        let merged = merge_close_nodes(&graph, 4.0);
        assert_eq!(merged.node_count(), 3);
        assert!((merged.node(0).x() - 0.000_01).abs() < 1e-15);
        assert_eq!(merged.node(0).y(), 0.0);
        assert_eq!(merged.node(1), graph.node(c));
        assert_eq!(merged.edges().collect::<Vec<_>>(), vec![(0, 1), (0, 2)]);
    }

    #[test]
    fn chains_merge_transitively() {
        let mut graph = RouteGraph::new();
        for i in 0..4 {
            // 3.3 m steps: neighbors merge, the ends are 10 m apart.
            graph.add_node(point!(x: f64::from(i) * 0.000_03, y: 0.0));
        }
        graph.add_node(point!(x: 0.01, y: 0.0));
        let merged = merge_close_nodes(&graph, 4.0);
        assert_eq!(merged.node_count(), 2);
        assert_eq!(merged.edge_count(), 0);
    }

    #[test]
    fn nodes_within_merge_distance_share_a_cluster() {
        let mut graph = RouteGraph::new();
        for i in 0..40 {
            let i = f64::from(i);
            graph.add_node(point!(
                x: (i * 0.37).sin() * 0.000_2,
                y: (i * 0.73).cos() * 0.000_2
            ));
        }
        for i in 1..40 {
            graph.add_edge(i - 1, i);
        }

        let (labels, members) = cluster_nodes(&graph, 4.0);
        for i in 0..graph.node_count() {
            for j in i + 1..graph.node_count() {
                if haversine_distance(graph.node(i), graph.node(j)) <= 4.0 {
                    assert_eq!(labels[i], labels[j], "nodes {i} and {j} survived separately");
                }
            }
        }

        let merged = merge_close_nodes(&graph, 4.0);
        assert_eq!(merged.node_count(), members.len());
        for i in 0..merged.node_count() {
            assert!(!merged.neighbors(i).contains(&i));
        }
    }
}

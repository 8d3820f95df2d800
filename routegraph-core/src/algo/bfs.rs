use std::collections::VecDeque;

use fixedbitset::FixedBitSet;

use crate::model::RouteGraph;

/// Fewest-hop path from `start` to `end`, both endpoints included.
///
/// Neighbors are expanded in ascending order, so among equally short paths
/// the one through lower indices wins. Returns `None` if `end` is unreachable
/// or either index is out of range.
pub fn bfs_path(graph: &RouteGraph, start: usize, end: usize) -> Option<Vec<usize>> {
    let node_count = graph.node_count();
    if start >= node_count || end >= node_count {
        return None;
    }

    let mut visited = FixedBitSet::with_capacity(node_count);
    let mut parent: Vec<Option<usize>> = vec![None; node_count];
    let mut queue = VecDeque::from([start]);
    visited.insert(start);

    while let Some(u) = queue.pop_front() {
        if u == end {
            break;
        }
        for &v in graph.neighbors(u) {
            if !visited.put(v) {
                parent[v] = Some(u);
                queue.push_back(v);
            }
        }
    }

    if !visited.contains(end) {
        return None;
    }

    let mut path = vec![end];
    let mut current = end;
    while let Some(prev) = parent[current] {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    Some(path)
}
